use chrono::NaiveDate;
use tracing::debug;

use crate::error::InvalidSelection;
use crate::models::booking::BookingRequest;
use crate::models::slot::SlotRecord;

/// Where the user is in choosing a booking. A sport can only be held
/// together with the slot that offers it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SelectionState {
    #[default]
    NoDate,
    DateChosen {
        date: NaiveDate,
    },
    SlotChosen {
        date: NaiveDate,
        slot: SlotRecord,
    },
    SportChosen {
        date: NaiveDate,
        slot: SlotRecord,
        sport: String,
    },
}

impl SelectionState {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            SelectionState::NoDate => None,
            SelectionState::DateChosen { date }
            | SelectionState::SlotChosen { date, .. }
            | SelectionState::SportChosen { date, .. } => Some(*date),
        }
    }

    pub fn slot(&self) -> Option<&SlotRecord> {
        match self {
            SelectionState::SlotChosen { slot, .. } | SelectionState::SportChosen { slot, .. } => {
                Some(slot)
            }
            _ => None,
        }
    }

    pub fn sport(&self) -> Option<&str> {
        match self {
            SelectionState::SportChosen { sport, .. } => Some(sport),
            _ => None,
        }
    }
}

/// The in-progress booking choice of one dialog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Selection {
    state: SelectionState,
    team_name: String,
    notes: String,
}

impl Selection {
    /// Team name is usually seeded from the signed-in user's profile.
    pub fn new(team_name: impl Into<String>) -> Self {
        Self {
            state: SelectionState::NoDate,
            team_name: team_name.into(),
            notes: String::new(),
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.state.date()
    }

    pub fn slot(&self) -> Option<&SlotRecord> {
        self.state.slot()
    }

    pub fn sport(&self) -> Option<&str> {
        self.state.sport()
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    /// Always drops any slot and sport chosen for the previous date.
    pub fn set_date(&mut self, date: NaiveDate) {
        debug!("Selection date set to {}", date);
        self.state = SelectionState::DateChosen { date };
    }

    pub fn choose_slot(&mut self, slot: SlotRecord) -> Result<(), InvalidSelection> {
        let date = self.date().ok_or(InvalidSelection::NoDate)?;
        if !slot.is_selectable() {
            return Err(InvalidSelection::EmptySlot {
                time_range: slot.time_range(),
            });
        }

        self.state = SelectionState::SlotChosen { date, slot };
        Ok(())
    }

    pub fn choose_sport(&mut self, sport: &str) -> Result<(), InvalidSelection> {
        let slot = self.slot().cloned().ok_or(InvalidSelection::NoSlot)?;
        self.set_slot_and_sport(slot, sport)
    }

    pub fn set_slot_and_sport(&mut self, slot: SlotRecord, sport: &str) -> Result<(), InvalidSelection> {
        let date = self.date().ok_or(InvalidSelection::NoDate)?;
        if !slot.offers(sport) {
            return Err(InvalidSelection::SportNotOffered {
                sport: sport.to_string(),
                time_range: slot.time_range(),
            });
        }

        debug!("Selected {} at {} on {}", sport, slot.time_range(), date);
        self.state = SelectionState::SportChosen {
            date,
            slot,
            sport: sport.to_string(),
        };
        Ok(())
    }

    pub fn set_team_name(&mut self, name: impl Into<String>) {
        self.team_name = name.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    /// Back to the bare date, keeping team name and notes.
    pub fn clear_slot(&mut self) {
        if let Some(date) = self.date() {
            self.state = SelectionState::DateChosen { date };
        }
    }

    pub fn is_ready(&self) -> bool {
        self.booking_request().is_ok()
    }

    /// Submission gate: slot, sport and a non-blank team name are required.
    pub fn booking_request(&self) -> Result<BookingRequest, InvalidSelection> {
        let (date, slot, sport) = match &self.state {
            SelectionState::SportChosen { date, slot, sport } => (*date, slot, sport),
            SelectionState::NoDate => return Err(InvalidSelection::NoDate),
            _ => return Err(InvalidSelection::IncompleteSelection),
        };

        if self.team_name.trim().is_empty() {
            return Err(InvalidSelection::BlankTeamName);
        }

        Ok(BookingRequest {
            sport: sport.clone(),
            booking_date: date,
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            team_name: self.team_name.clone(),
            notes: self.notes.clone(),
            payment_details: None,
        })
    }
}

/// Date-picker boundary: no bookings in the past.
pub fn validate_booking_date(date: NaiveDate, today: NaiveDate) -> Result<(), InvalidSelection> {
    if date < today {
        Err(InvalidSelection::DateInPast)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn morning() -> SlotRecord {
        SlotRecord::new("6:00 AM", "8:00 AM", &["Football", "Cricket"])
    }

    #[test]
    fn test_date_change_resets_slot_and_sport() {
        let mut selection = Selection::new("Eagles");
        selection.set_date(day(15));
        selection.set_slot_and_sport(morning(), "Football").unwrap();
        assert_eq!(selection.sport(), Some("Football"));

        selection.set_date(day(16));
        assert_eq!(selection.date(), Some(day(16)));
        assert!(selection.slot().is_none());
        assert!(selection.sport().is_none());
        assert_eq!(selection.team_name(), "Eagles");
    }

    #[test]
    fn test_same_date_also_resets() {
        let mut selection = Selection::new("Eagles");
        selection.set_date(day(15));
        selection.set_slot_and_sport(morning(), "Cricket").unwrap();

        selection.set_date(day(15));
        assert_eq!(selection.state(), &SelectionState::DateChosen { date: day(15) });
    }

    #[test]
    fn test_sport_outside_slot_is_rejected() {
        let mut selection = Selection::new("Eagles");
        selection.set_date(day(15));
        selection.set_slot_and_sport(morning(), "Cricket").unwrap();
        let before = selection.clone();

        let err = selection.set_slot_and_sport(morning(), "Tennis").unwrap_err();
        assert!(matches!(err, InvalidSelection::SportNotOffered { .. }));
        assert_eq!(selection, before);

        // Sport names are case-sensitive
        assert!(selection.choose_sport("football").is_err());
        assert_eq!(selection, before);
    }

    #[test]
    fn test_slot_requires_date() {
        let mut selection = Selection::new("Eagles");
        assert_eq!(
            selection.set_slot_and_sport(morning(), "Football"),
            Err(InvalidSelection::NoDate)
        );
        assert_eq!(selection.choose_slot(morning()), Err(InvalidSelection::NoDate));
        assert_eq!(selection.state(), &SelectionState::NoDate);
    }

    #[test]
    fn test_step_by_step_selection() {
        let mut selection = Selection::new("");
        selection.set_date(day(15));
        assert_eq!(selection.choose_sport("Football"), Err(InvalidSelection::NoSlot));

        selection.choose_slot(morning()).unwrap();
        assert!(selection.sport().is_none());
        selection.choose_sport("Cricket").unwrap();
        assert_eq!(selection.sport(), Some("Cricket"));

        // Picking another slot drops the sport
        selection
            .choose_slot(SlotRecord::new("6:00 PM", "7:00 PM", &["Basketball"]))
            .unwrap();
        assert!(selection.sport().is_none());
        assert_eq!(selection.slot().unwrap().start_time, "6:00 PM");
    }

    #[test]
    fn test_empty_slot_is_unselectable() {
        let mut selection = Selection::new("Eagles");
        selection.set_date(day(15));
        let empty = SlotRecord::new("9:00 PM", "10:00 PM", &[]);
        assert!(matches!(
            selection.choose_slot(empty),
            Err(InvalidSelection::EmptySlot { .. })
        ));
        assert_eq!(selection.state(), &SelectionState::DateChosen { date: day(15) });
    }

    #[test]
    fn test_booking_request_gate() {
        let mut selection = Selection::new("   ");
        assert_eq!(selection.booking_request(), Err(InvalidSelection::NoDate));

        selection.set_date(day(15));
        assert_eq!(
            selection.booking_request(),
            Err(InvalidSelection::IncompleteSelection)
        );

        selection.choose_slot(morning()).unwrap();
        assert_eq!(
            selection.booking_request(),
            Err(InvalidSelection::IncompleteSelection)
        );

        selection.choose_sport("Football").unwrap();
        assert_eq!(selection.booking_request(), Err(InvalidSelection::BlankTeamName));
        assert!(!selection.is_ready());

        selection.set_team_name("Eagles");
        selection.set_notes("Bring bibs");
        let request = selection.booking_request().unwrap();
        assert_eq!(request.booking_date, day(15));
        assert_eq!(request.start_time, "6:00 AM");
        assert_eq!(request.end_time, "8:00 AM");
        assert_eq!(request.sport, "Football");
        assert_eq!(request.team_name, "Eagles");
        assert_eq!(request.notes, "Bring bibs");
        assert!(request.payment_details.is_none());
    }

    #[test]
    fn test_clear_slot_keeps_team_and_notes() {
        let mut selection = Selection::new("Eagles");
        selection.set_date(day(15));
        selection.set_notes("Late arrival");
        selection.set_slot_and_sport(morning(), "Football").unwrap();

        selection.clear_slot();
        assert_eq!(selection.state(), &SelectionState::DateChosen { date: day(15) });
        assert_eq!(selection.team_name(), "Eagles");
        assert_eq!(selection.notes(), "Late arrival");
    }

    #[test]
    fn test_validate_booking_date() {
        assert_eq!(validate_booking_date(day(14), day(15)), Err(InvalidSelection::DateInPast));
        assert!(validate_booking_date(day(15), day(15)).is_ok());
        assert!(validate_booking_date(day(16), day(15)).is_ok());
    }
}
