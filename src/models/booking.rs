use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// Request body for POST /bookings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub sport: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub team_name: String,
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<PaymentDetails>,
}

// Attached only by the checkout flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentDetails {
    pub amount: i64,
    pub payment_method: String,
    pub payment_status: String,
}

impl PaymentDetails {
    pub fn pending_upi(amount: i64) -> Self {
        Self {
            amount,
            payment_method: "UPI".to_string(),
            payment_status: "pending".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Rejected,
    Other(String),
}

impl From<String> for BookingStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => BookingStatus::Pending,
            "confirmed" => BookingStatus::Confirmed,
            "cancelled" => BookingStatus::Cancelled,
            "rejected" => BookingStatus::Rejected,
            _ => BookingStatus::Other(value),
        }
    }
}

impl From<BookingStatus> for String {
    fn from(status: BookingStatus) -> Self {
        match status {
            BookingStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl BookingStatus {
    pub fn as_str(&self) -> &str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Rejected => "rejected",
            BookingStatus::Other(value) => value,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Booking as echoed back by the server after creation. Only the id and
// status are guaranteed; the rest is echoed when the server chooses to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookedSlot {
    pub id: i64,
    pub status: BookingStatus,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub booking_date: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    #[serde(default)]
    pub message: String,
    pub booking: BookedSlot,
}

impl BookingConfirmation {
    pub fn booking_id(&self) -> i64 {
        self.booking.id
    }
}

// Entry of GET /bookings/user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserBooking {
    pub id: i64,
    pub sport: String,
    pub booking_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub status: BookingStatus,
    #[serde(default)]
    pub admin_notes: Option<String>,
}
