use std::sync::Arc;
use tracing::{error, info};

use crate::auth::Credentials;
use crate::client::TurfApi;
use crate::error::{AccountError, SubmitError};
use crate::models::account::{LoginRequest, RegisterRequest, UserProfile};
use crate::models::booking::UserBooking;

/// Sign-in state and the signed-in user's own bookings.
pub struct Account<A> {
    api: Arc<A>,
    credentials: Arc<Credentials>,
}

impl<A: TurfApi> Account<A> {
    pub fn new(api: Arc<A>, credentials: Arc<Credentials>) -> Self {
        Self { api, credentials }
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<UserProfile, AccountError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self.api.login(&request).await.map_err(|err| {
            error!("Login failed for {}: {}", username, err);
            err
        })?;
        let profile = response.user.clone();
        self.credentials
            .sign_in(response)
            .map_err(AccountError::Storage)?;
        Ok(profile)
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AccountError> {
        let response = self.api.register(request).await.map_err(|err| {
            error!("Registration failed for {}: {}", request.username, err);
            err
        })?;
        let profile = response.user.clone();
        self.credentials
            .sign_in(response)
            .map_err(AccountError::Storage)?;
        Ok(profile)
    }

    pub fn logout(&self) {
        self.credentials.sign_out();
    }

    pub async fn my_bookings(&self) -> Result<Vec<UserBooking>, SubmitError> {
        let token = self.credentials.token().ok_or(SubmitError::Unauthorized)?;
        let bookings = self
            .credentials
            .guard(self.api.user_bookings(&token).await)
            .map_err(|err| {
                error!("Failed to fetch bookings: {}", err);
                SubmitError::from(err)
            })?;

        info!("Fetched {} bookings", bookings.len());
        Ok(bookings)
    }
}
