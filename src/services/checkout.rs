//! Paid booking flow: quote, create the booking, then start a UPI payment.
//!
//! The booking is created before payment starts. A failed payment start
//! therefore leaves a `pending` booking behind; its id is returned in
//! [`CheckoutError::PaymentNotStarted`] and expiring unpaid bookings is left
//! to the server.

use std::sync::Arc;
use tracing::{error, info, warn};

use crate::auth::Credentials;
use crate::client::TurfApi;
use crate::error::{CheckoutError, SubmitError};
use crate::models::booking::{BookingConfirmation, BookingRequest, PaymentDetails};
use crate::models::payment::{
    PaymentBookingDetails, PaymentInitiation, PaymentRequest, PriceQuote, PriceRequest, UpiApp,
};

#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutOutcome {
    pub quote: PriceQuote,
    pub confirmation: BookingConfirmation,
    pub payment: PaymentInitiation,
}

impl CheckoutOutcome {
    pub fn payment_link(&self, app: UpiApp) -> Option<&str> {
        self.payment.link_for(app)
    }
}

pub fn price_request(request: &BookingRequest) -> PriceRequest {
    PriceRequest {
        sport: request.sport.clone(),
        date: request.booking_date,
        time_slot: format!("{} - {}", request.start_time, request.end_time),
        team: request.team_name.clone(),
        start_time: request.start_time.clone(),
    }
}

pub struct Checkout<A> {
    api: Arc<A>,
    credentials: Arc<Credentials>,
}

impl<A: TurfApi> Checkout<A> {
    pub fn new(api: Arc<A>, credentials: Arc<Credentials>) -> Self {
        Self { api, credentials }
    }

    fn token(&self) -> Result<String, SubmitError> {
        self.credentials.token().ok_or_else(|| {
            warn!("Checkout attempted without a stored token");
            SubmitError::Unauthorized
        })
    }

    pub async fn quote(&self, request: &BookingRequest) -> Result<PriceQuote, SubmitError> {
        let token = self.token()?;
        let quote = self
            .credentials
            .guard(self.api.calculate_price(&price_request(request), &token).await)
            .map_err(|err| {
                error!("Error calculating price: {}", err);
                SubmitError::from(err)
            })?;

        info!(
            "Quoted {} {} ({} discounts) for {} on {}",
            quote.final_amount,
            quote.currency,
            quote.discounts.len(),
            request.sport,
            request.booking_date
        );
        Ok(quote)
    }

    pub async fn run(&self, request: &BookingRequest) -> Result<CheckoutOutcome, CheckoutError> {
        let quote = self.quote(request).await.map_err(CheckoutError::NotBooked)?;
        let token = self.token().map_err(CheckoutError::NotBooked)?;

        let mut paid_request = request.clone();
        paid_request.payment_details = Some(PaymentDetails::pending_upi(quote.final_amount));

        let confirmation = self
            .credentials
            .guard(self.api.create_booking(&paid_request, &token).await)
            .map_err(|err| {
                error!("Failed to create booking before payment: {}", err);
                match SubmitError::from(err) {
                    SubmitError::Unconfirmed { status, detail } => {
                        CheckoutError::BookingUnconfirmed { status, detail }
                    }
                    other => CheckoutError::NotBooked(other),
                }
            })?;
        let booking_id = confirmation.booking_id();
        info!("Booking {} created, initiating payment", booking_id);

        let payment_request = PaymentRequest {
            booking_details: PaymentBookingDetails {
                sport: request.sport.clone(),
                date: request.booking_date,
                time_slot: format!("{} - {}", request.start_time, request.end_time),
                team: request.team_name.clone(),
                notes: request.notes.clone(),
                booking_id,
            },
            amount: quote.final_amount,
        };

        let payment = self
            .credentials
            .guard(self.api.initiate_payment(&payment_request, &token).await)
            .map_err(|source| {
                error!(
                    "Error initiating payment for booking {} (left pending): {}",
                    booking_id, source
                );
                CheckoutError::PaymentNotStarted { booking_id, source }
            })?;

        Ok(CheckoutOutcome {
            quote,
            confirmation,
            payment,
        })
    }
}
