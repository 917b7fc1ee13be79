//! Turf Booking Client
//!
//! This library talks to a turf / sports-facility booking service. It fetches
//! bookable slots for a date, tracks the user's slot and sport selection,
//! summarises availability across several days and submits bookings with the
//! user's bearer token.
//!
//! # Modules
//!
//! - `client`: `TurfApi` trait and the reqwest-backed `TurfApiClient`
//! - `auth`: credential storage and sign-in notifications
//! - `services`: slot fetching, selection, availability, booking and checkout
//! - `models`: request and response types of the REST service
//!
//! # Authentication
//!
//! Authenticated calls carry an `Authorization: Bearer <token>` header. The
//! token lives in a `CredentialStore`; any 401 clears it and broadcasts
//! `AuthEvent::SessionExpired` so the caller can send the user back to login.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

#[cfg(test)]
mod tests;

// Re-export the main API types for ease of use
pub use auth::{AuthEvent, CredentialStore, Credentials, FileCredentialStore, InMemoryCredentialStore};
pub use client::{TurfApi, TurfApiClient};
pub use config::ClientConfig;
pub use error::{ApiError, AvailabilityUnavailable, FetchFailure, InvalidSelection, SubmitError};
pub use models::slot::SlotRecord;
pub use services::availability::{aggregate, quick_availability, AvailabilitySummary, Period};
pub use services::selection::{Selection, SelectionState};
pub use services::session::BookingSession;
