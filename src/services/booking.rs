use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::Credentials;
use crate::client::TurfApi;
use crate::error::SubmitError;
use crate::models::booking::{BookingConfirmation, BookingRequest};

/// Sends a validated booking request with the caller's bearer token.
/// Exactly one request per call; nothing is retried.
pub struct BookingSubmitter<A> {
    api: Arc<A>,
    credentials: Arc<Credentials>,
}

impl<A: TurfApi> BookingSubmitter<A> {
    pub fn new(api: Arc<A>, credentials: Arc<Credentials>) -> Self {
        Self { api, credentials }
    }

    pub fn credentials(&self) -> &Arc<Credentials> {
        &self.credentials
    }

    pub async fn submit(&self, request: &BookingRequest) -> Result<BookingConfirmation, SubmitError> {
        let token = match self.credentials.token() {
            Some(token) => token,
            None => {
                warn!("Booking attempted without a stored token");
                return Err(SubmitError::Unauthorized);
            }
        };

        let result = self
            .credentials
            .guard(self.api.create_booking(request, &token).await);

        match result {
            Ok(confirmation) => {
                info!(
                    "Booking {} created with status {:?}",
                    confirmation.booking.id, confirmation.booking.status
                );
                Ok(confirmation)
            }
            Err(err) => {
                error!("Failed to create booking: {}", err);
                Err(SubmitError::from(err))
            }
        }
    }
}
