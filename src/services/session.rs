use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::auth::Credentials;
use crate::client::TurfApi;
use crate::error::{CheckoutError, FetchFailure, InvalidSelection, SubmitError};
use crate::models::booking::BookingConfirmation;
use crate::models::slot::SlotRecord;
use crate::services::booking::BookingSubmitter;
use crate::services::checkout::{Checkout, CheckoutOutcome};
use crate::services::selection::Selection;
use crate::services::slot_fetcher::SlotFetcher;

/// Identifies which date (and which request for it) a slot fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTag {
    pub date: NaiveDate,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied { slots: usize },
    /// The fetch failed; the slot list is now empty.
    Failed(FetchFailure),
    /// The selection moved on before the fetch resolved.
    Discarded,
}

/// One booking dialog: the selection, the slots shown for its date and
/// submission of the finished choice.
pub struct BookingSession<A> {
    fetcher: SlotFetcher<A>,
    submitter: BookingSubmitter<A>,
    selection: Selection,
    slots: Vec<SlotRecord>,
    generation: u64,
    dates: watch::Sender<Option<NaiveDate>>,
}

impl<A: TurfApi> BookingSession<A> {
    pub fn new(api: Arc<A>, credentials: Arc<Credentials>) -> Self {
        // Default the team name to the one on the stored profile
        let team_name = credentials
            .profile()
            .and_then(|profile| profile.team_name)
            .unwrap_or_default();
        let (dates, _) = watch::channel(None);

        Self {
            fetcher: SlotFetcher::new(Arc::clone(&api)),
            submitter: BookingSubmitter::new(api, credentials),
            selection: Selection::new(team_name),
            slots: Vec::new(),
            generation: 0,
            dates,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn slots(&self) -> &[SlotRecord] {
        &self.slots
    }

    pub fn fetcher(&self) -> &SlotFetcher<A> {
        &self.fetcher
    }

    /// Notified with the new date every time the selection's date changes.
    pub fn subscribe_dates(&self) -> watch::Receiver<Option<NaiveDate>> {
        self.dates.subscribe()
    }

    /// Move the selection to `date` and load its slots. Observers of
    /// [`subscribe_dates`](Self::subscribe_dates) are notified before the fetch.
    pub async fn set_date(&mut self, date: NaiveDate) -> FetchOutcome {
        self.selection.set_date(date);
        self.slots.clear();
        self.dates.send_replace(Some(date));
        self.fetch_for(date).await
    }

    pub fn set_team_name(&mut self, name: impl Into<String>) {
        self.selection.set_team_name(name);
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.selection.set_notes(notes);
    }

    fn current_tag(&self) -> Option<FetchTag> {
        self.selection.date().map(|date| FetchTag {
            date,
            generation: self.generation,
        })
    }

    /// Start a fetch for the current date. Any fetch begun earlier becomes stale.
    pub fn begin_fetch(&mut self) -> Option<FetchTag> {
        self.selection.date()?;
        self.generation += 1;
        self.current_tag()
    }

    pub fn apply_fetch(
        &mut self,
        tag: FetchTag,
        result: Result<Vec<SlotRecord>, FetchFailure>,
    ) -> FetchOutcome {
        if self.current_tag() != Some(tag) {
            debug!(
                "Discarding stale slots for {} (generation {})",
                tag.date, tag.generation
            );
            return FetchOutcome::Discarded;
        }

        match result {
            Ok(slots) => {
                let count = slots.len();
                self.slots = slots;
                FetchOutcome::Applied { slots: count }
            }
            Err(failure) => {
                self.slots.clear();
                FetchOutcome::Failed(failure)
            }
        }
    }

    pub async fn refresh(&mut self) -> Result<FetchOutcome, InvalidSelection> {
        let date = self.selection.date().ok_or(InvalidSelection::NoDate)?;
        Ok(self.fetch_for(date).await)
    }

    async fn fetch_for(&mut self, date: NaiveDate) -> FetchOutcome {
        self.generation += 1;
        let tag = FetchTag {
            date,
            generation: self.generation,
        };
        let result = self.fetcher.fetch_slots(date).await;
        self.apply_fetch(tag, result)
    }

    pub fn choose_slot(&mut self, index: usize) -> Result<(), InvalidSelection> {
        let slot = self
            .slots
            .get(index)
            .cloned()
            .ok_or(InvalidSelection::SlotNotFound(index))?;
        self.selection.choose_slot(slot)
    }

    pub fn choose_sport(&mut self, sport: &str) -> Result<(), InvalidSelection> {
        self.selection.choose_sport(sport)
    }

    /// Pick slot `index` of the current list together with one of its sports.
    pub fn select(&mut self, index: usize, sport: &str) -> Result<(), InvalidSelection> {
        let slot = self
            .slots
            .get(index)
            .cloned()
            .ok_or(InvalidSelection::SlotNotFound(index))?;
        self.selection.set_slot_and_sport(slot, sport)
    }

    /// Submit the current selection. On success the slot and sport are
    /// cleared and the slot list is refreshed; on failure nothing changes.
    /// An unreadable success reply counts as booked so the same slot is not
    /// submitted twice.
    pub async fn submit(&mut self) -> Result<BookingConfirmation, SubmitError> {
        let request = self.selection.booking_request()?;

        match self.submitter.submit(&request).await {
            Ok(confirmation) => {
                info!("Booking submitted successfully, awaiting confirmation");
                self.after_booking().await;
                Ok(confirmation)
            }
            Err(err @ SubmitError::Unconfirmed { .. }) => {
                warn!("Booking reply unreadable, treating slot as taken");
                self.after_booking().await;
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Paid variant of [`submit`](Self::submit). The slot is cleared whenever
    /// a booking may have been created, even if payment could not be started.
    pub async fn checkout(&mut self, checkout: &Checkout<A>) -> Result<CheckoutOutcome, CheckoutError> {
        let request = self
            .selection
            .booking_request()
            .map_err(|err| CheckoutError::NotBooked(SubmitError::from(err)))?;

        let outcome = checkout.run(&request).await;
        if matches!(
            outcome,
            Ok(_)
                | Err(CheckoutError::PaymentNotStarted { .. })
                | Err(CheckoutError::BookingUnconfirmed { .. })
        ) {
            self.after_booking().await;
        }
        outcome
    }

    async fn after_booking(&mut self) {
        self.selection.clear_slot();

        match self.refresh().await {
            Ok(FetchOutcome::Failed(failure)) => {
                warn!("Slots could not be refreshed after booking: {}", failure)
            }
            Ok(_) => {}
            Err(err) => warn!("Slots could not be refreshed after booking: {}", err),
        }
    }
}
