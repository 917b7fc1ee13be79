use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{error, info};

use crate::client::TurfApi;
use crate::error::FetchFailure;
use crate::models::slot::SlotRecord;

/// Looks up bookable slots for one date. Performs no validation or reordering.
pub struct SlotFetcher<A> {
    api: Arc<A>,
}

impl<A> Clone for SlotFetcher<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: TurfApi> SlotFetcher<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub async fn fetch_slots(&self, date: NaiveDate) -> Result<Vec<SlotRecord>, FetchFailure> {
        match self.api.available_slots(date).await {
            Ok(slots) => {
                info!("Fetched {} slots for {}", slots.len(), date);
                Ok(slots)
            }
            Err(err) => {
                let failure = FetchFailure::from(err);
                error!("Failed to fetch slots for {}: {:?}", date, failure);
                Err(failure)
            }
        }
    }

    /// Fetch for display: a failure renders as an empty list plus the failure.
    pub async fn fetch_or_empty(&self, date: NaiveDate) -> (Vec<SlotRecord>, Option<FetchFailure>) {
        match self.fetch_slots(date).await {
            Ok(slots) => (slots, None),
            Err(failure) => (Vec::new(), Some(failure)),
        }
    }
}
