use serde::{Deserialize, Serialize};

// One bookable window on a date, as returned by /available-slots
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotRecord {
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub sports: Vec<String>,
}

impl SlotRecord {
    pub fn new(start_time: &str, end_time: &str, sports: &[&str]) -> Self {
        Self {
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            sports: sports.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Display form used by the summary view, e.g. "6:00 AM - 8:00 AM".
    pub fn time_range(&self) -> String {
        format!("{} - {}", self.start_time, self.end_time)
    }

    pub fn offers(&self, sport: &str) -> bool {
        self.sports.iter().any(|s| s == sport)
    }

    // Empty sport lists are legal but cannot be booked
    pub fn is_selectable(&self) -> bool {
        !self.sports.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeRange {
    pub time: String,
    pub sports: Vec<String>,
}

impl From<&SlotRecord> for TimeRange {
    fn from(slot: &SlotRecord) -> Self {
        TimeRange {
            time: slot.time_range(),
            sports: slot.sports.clone(),
        }
    }
}
