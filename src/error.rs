use std::fmt;

use crate::services::availability::Period;

/// Failure of a single call to the booking REST service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response was received (connection refused, DNS, transport timeout).
    Unreachable(String),
    /// HTTP 401. The caller must clear credentials and ask for a new login.
    Unauthorized,
    /// Any other non-success status. `message` is the server's own text.
    Rejected { status: u16, message: String },
    /// A success status arrived but its body could not be decoded.
    InvalidResponse { status: u16, detail: String },
}

impl ApiError {
    pub fn received_response(&self) -> bool {
        !matches!(self, ApiError::Unreachable(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unreachable(detail) => {
                write!(f, "No response from server. Please check your connection ({})", detail)
            }
            ApiError::Unauthorized => write!(f, "Session expired. Please log in again"),
            ApiError::Rejected { message, .. } => write!(f, "{}", message),
            ApiError::InvalidResponse { status, detail } => {
                write!(f, "Invalid response from server (HTTP {}): {}", status, detail)
            }
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailureKind {
    Network,
    Server,
}

/// Slot fetch failure, classified by whether the server answered at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub kind: FetchFailureKind,
    pub message: String,
}

impl From<ApiError> for FetchFailure {
    fn from(err: ApiError) -> Self {
        let kind = if err.received_response() {
            FetchFailureKind::Server
        } else {
            FetchFailureKind::Network
        };
        FetchFailure {
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            FetchFailureKind::Network => write!(f, "Error fetching available slots: {}", self.message),
            FetchFailureKind::Server => write!(
                f,
                "Error fetching available slots. Please try again. ({})",
                self.message
            ),
        }
    }
}

impl std::error::Error for FetchFailure {}

/// Client-side selection problems. These never reach the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidSelection {
    NoDate,
    DateInPast,
    NoSlot,
    EmptySlot { time_range: String },
    SportNotOffered { sport: String, time_range: String },
    SlotNotFound(usize),
    IncompleteSelection,
    BlankTeamName,
}

impl fmt::Display for InvalidSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidSelection::NoDate => write!(f, "Please select a date first"),
            InvalidSelection::DateInPast => write!(f, "Bookings cannot be made for past dates"),
            InvalidSelection::NoSlot => write!(f, "Please select a time slot first"),
            InvalidSelection::EmptySlot { time_range } => {
                write!(f, "No sports can be booked for {}", time_range)
            }
            InvalidSelection::SportNotOffered { sport, time_range } => {
                write!(f, "{} is not available for {}", sport, time_range)
            }
            InvalidSelection::SlotNotFound(index) => write!(f, "No time slot number {}", index),
            InvalidSelection::IncompleteSelection => {
                write!(f, "Please select both a time slot and sport")
            }
            InvalidSelection::BlankTeamName => write!(f, "Please enter your team name"),
        }
    }
}

impl std::error::Error for InvalidSelection {}

/// Outcome of a failed booking submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    InvalidSelection(InvalidSelection),
    Unauthorized,
    Rejected { status: u16, message: String },
    Unreachable(String),
    /// The server answered with a success status but the reply could not be
    /// read. For a booking request the booking may well exist.
    Unconfirmed { status: u16, detail: String },
}

impl From<ApiError> for SubmitError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => SubmitError::Unauthorized,
            ApiError::Rejected { status, message } => SubmitError::Rejected { status, message },
            ApiError::Unreachable(detail) => SubmitError::Unreachable(detail),
            ApiError::InvalidResponse { status, detail } => SubmitError::Unconfirmed { status, detail },
        }
    }
}

impl From<InvalidSelection> for SubmitError {
    fn from(err: InvalidSelection) -> Self {
        SubmitError::InvalidSelection(err)
    }
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::InvalidSelection(reason) => write!(f, "{}", reason),
            SubmitError::Unauthorized => write!(f, "Please log in to continue with booking"),
            SubmitError::Rejected { message, .. } => write!(f, "{}", message),
            SubmitError::Unreachable(_) => {
                write!(f, "Cannot connect to server. Please ensure the backend is running.")
            }
            SubmitError::Unconfirmed { status, .. } => write!(
                f,
                "The server accepted the request (HTTP {}) but its reply could not be read. Check your bookings before trying again.",
                status
            ),
        }
    }
}

impl std::error::Error for SubmitError {}

/// Login or registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountError {
    Api(ApiError),
    /// Signed in on the server, but the session could not be stored locally.
    Storage(String),
}

impl From<ApiError> for AccountError {
    fn from(err: ApiError) -> Self {
        AccountError::Api(err)
    }
}

impl fmt::Display for AccountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountError::Api(err) => write!(f, "{}", err),
            AccountError::Storage(detail) => write!(f, "Could not save your session: {}", detail),
        }
    }
}

impl std::error::Error for AccountError {}

/// The quick availability view is all-or-nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityUnavailable {
    pub period: Period,
    pub failure: FetchFailure,
}

impl fmt::Display for AvailabilityUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Availability is unavailable right now ({:?} lookup failed: {})",
            self.period, self.failure.message
        )
    }
}

impl std::error::Error for AvailabilityUnavailable {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutError {
    /// Nothing was created on the server.
    NotBooked(SubmitError),
    /// The booking request was accepted but the reply could not be read, so
    /// there is no booking id to pay for.
    BookingUnconfirmed { status: u16, detail: String },
    /// The booking exists as pending but payment could not be started.
    PaymentNotStarted { booking_id: i64, source: ApiError },
}

impl fmt::Display for CheckoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckoutError::NotBooked(err) => write!(f, "{}", err),
            CheckoutError::BookingUnconfirmed { status, .. } => write!(
                f,
                "The booking was accepted (HTTP {}) but its reply could not be read. Check your bookings before paying.",
                status
            ),
            CheckoutError::PaymentNotStarted { booking_id, source } => write!(
                f,
                "Booking {} was created but payment could not be started: {}",
                booking_id, source
            ),
        }
    }
}

impl std::error::Error for CheckoutError {}
