use chrono::NaiveDate;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{ClientConfig, ConfigError};
use crate::error::ApiError;
use crate::models::account::{AuthResponse, LoginRequest, RegisterRequest};
use crate::models::booking::{BookingConfirmation, BookingRequest, UserBooking};
use crate::models::payment::{PaymentInitiation, PaymentRequest, PriceQuote, PriceRequest};
use crate::models::slot::SlotRecord;

/// Calls the booking service makes available to the rest of the crate.
///
/// Authenticated calls take the bearer token explicitly; the services layer
/// decides where it comes from and what happens on a 401.
#[allow(async_fn_in_trait)]
#[cfg_attr(test, mockall::automock)]
pub trait TurfApi {
    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<SlotRecord>, ApiError>;

    async fn create_booking(
        &self,
        request: &BookingRequest,
        token: &str,
    ) -> Result<BookingConfirmation, ApiError>;

    async fn user_bookings(&self, token: &str) -> Result<Vec<UserBooking>, ApiError>;

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError>;

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError>;

    async fn calculate_price(
        &self,
        request: &PriceRequest,
        token: &str,
    ) -> Result<PriceQuote, ApiError>;

    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
        token: &str,
    ) -> Result<PaymentInitiation, ApiError>;
}

// Error body shape used by every endpoint
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// HTTP client for the booking REST service
pub struct TurfApiClient {
    client: Client,
    base_url: String,
}

impl TurfApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError {
                variable: "TURF_API_TIMEOUT_SECS".to_string(),
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B, token: Option<&str>) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("POST {}", url);

        let mut request = self
            .client
            .post(&url)
            .header("Accept", "application/json")
            .json(body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await.map_err(transport_error)?;
        read_response(res).await
    }

    async fn get_json<T>(&self, path: &str, query: &[(&str, String)], token: Option<&str>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .query(query);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let res = request.send().await.map_err(transport_error)?;
        read_response(res).await
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    warn!("No response from booking service: {}", err);
    ApiError::Unreachable(err.to_string())
}

async fn read_response<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
    let status = res.status();
    info!("Response received with status: {}", status);

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized);
    }

    if !status.is_success() {
        let body = res.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .map(|b| b.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());
        warn!("Request rejected with {}: {}", status, message);
        return Err(ApiError::Rejected {
            status: status.as_u16(),
            message,
        });
    }

    res.json::<T>().await.map_err(|e| {
        warn!("Undecodable {} response: {}", status, e);
        ApiError::InvalidResponse {
            status: status.as_u16(),
            detail: e.to_string(),
        }
    })
}

impl TurfApi for TurfApiClient {
    async fn available_slots(&self, date: NaiveDate) -> Result<Vec<SlotRecord>, ApiError> {
        let date = date.format("%Y-%m-%d").to_string();
        info!("Requesting available slots for {}", date);
        self.get_json("/available-slots", &[("date", date)], None).await
    }

    async fn create_booking(
        &self,
        request: &BookingRequest,
        token: &str,
    ) -> Result<BookingConfirmation, ApiError> {
        info!(
            "Creating booking: {} on {} {}-{} for team {}",
            request.sport, request.booking_date, request.start_time, request.end_time, request.team_name
        );
        self.post_json("/bookings", request, Some(token)).await
    }

    async fn user_bookings(&self, token: &str) -> Result<Vec<UserBooking>, ApiError> {
        info!("Requesting bookings for the signed-in user");
        self.get_json("/bookings/user", &[], Some(token)).await
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        info!("Logging in as {}", request.username);
        self.post_json("/login", request, None).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        info!("Registering user {}", request.username);
        self.post_json("/register", request, None).await
    }

    async fn calculate_price(
        &self,
        request: &PriceRequest,
        token: &str,
    ) -> Result<PriceQuote, ApiError> {
        info!("Requesting price for {} on {} at {}", request.sport, request.date, request.time_slot);
        self.post_json("/calculate-price", request, Some(token)).await
    }

    async fn initiate_payment(
        &self,
        request: &PaymentRequest,
        token: &str,
    ) -> Result<PaymentInitiation, ApiError> {
        info!(
            "Initiating UPI payment of {} for booking {}",
            request.amount, request.booking_details.booking_id
        );
        self.post_json("/initiate-payment", request, Some(token)).await
    }
}
