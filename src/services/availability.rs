use chrono::{Datelike, Duration, NaiveDate, Weekday};
use futures::future::try_join3;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{error, info};

use crate::client::TurfApi;
use crate::error::AvailabilityUnavailable;
use crate::models::slot::{SlotRecord, TimeRange};
use crate::services::slot_fetcher::SlotFetcher;

/// Counts derived from one date's slot list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SlotAggregate {
    /// One per (slot, sport) pair, not one per slot.
    pub total_slots: usize,
    pub sport_counts: BTreeMap<String, usize>,
    pub time_ranges: Vec<TimeRange>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailabilitySummary {
    pub label: String,
    pub date: NaiveDate,
    pub total_slots: usize,
    pub sport_counts: BTreeMap<String, usize>,
    pub time_ranges: Vec<TimeRange>,
}

impl AvailabilitySummary {
    pub fn new(label: String, date: NaiveDate, slots: &[SlotRecord]) -> Self {
        let SlotAggregate {
            total_slots,
            sport_counts,
            time_ranges,
        } = aggregate(slots);

        Self {
            label,
            date,
            total_slots,
            sport_counts,
            time_ranges,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Period {
    Today,
    Tomorrow,
    Weekend,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Today, Period::Tomorrow, Period::Weekend];

    pub fn date_from(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Period::Today => today,
            Period::Tomorrow => today + Duration::days(1),
            Period::Weekend => next_saturday(today),
        }
    }

    pub fn label(&self, date: NaiveDate) -> String {
        match self {
            Period::Today => "Today".to_string(),
            Period::Tomorrow => "Tomorrow".to_string(),
            Period::Weekend => format!("This Weekend ({})", date.format("%d/%m/%Y")),
        }
    }
}

/// Per-period summaries for the landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAvailability {
    pub summaries: BTreeMap<Period, AvailabilitySummary>,
}

impl QuickAvailability {
    pub fn get(&self, period: Period) -> Option<&AvailabilitySummary> {
        self.summaries.get(&period)
    }
}

pub fn aggregate(slots: &[SlotRecord]) -> SlotAggregate {
    let mut sport_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut total_slots = 0;

    for slot in slots {
        for sport in &slot.sports {
            *sport_counts.entry(sport.clone()).or_default() += 1;
            total_slots += 1;
        }
    }

    SlotAggregate {
        total_slots,
        sport_counts,
        time_ranges: slots.iter().map(TimeRange::from).collect(),
    }
}

/// First Saturday strictly after `today`.
pub fn next_saturday(today: NaiveDate) -> NaiveDate {
    let mut day = today + Duration::days(1);
    while day.weekday() != Weekday::Sat {
        day = day + Duration::days(1);
    }
    day
}

/// Fetch today, tomorrow and next Saturday concurrently. Any single failure
/// fails the whole view.
pub async fn quick_availability<A: TurfApi>(
    fetcher: &SlotFetcher<A>,
    today: NaiveDate,
) -> Result<QuickAvailability, AvailabilityUnavailable> {
    let fetch = move |period: Period| async move {
        let date = period.date_from(today);
        match fetcher.fetch_slots(date).await {
            Ok(slots) => Ok(AvailabilitySummary::new(period.label(date), date, &slots)),
            Err(failure) => Err(AvailabilityUnavailable { period, failure }),
        }
    };

    let (today_summary, tomorrow_summary, weekend_summary) = try_join3(
        fetch(Period::Today),
        fetch(Period::Tomorrow),
        fetch(Period::Weekend),
    )
    .await
    .map_err(|err| {
        error!("Error fetching quick availability: {}", err);
        err
    })?;

    info!(
        "Quick availability: today={} tomorrow={} weekend={}",
        today_summary.total_slots, tomorrow_summary.total_slots, weekend_summary.total_slots
    );

    let mut summaries = BTreeMap::new();
    summaries.insert(Period::Today, today_summary);
    summaries.insert(Period::Tomorrow, tomorrow_summary);
    summaries.insert(Period::Weekend, weekend_summary);

    Ok(QuickAvailability { summaries })
}
