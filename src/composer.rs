//! The composer holds the draft of the task being created

use chrono::{DateTime, Utc};

use crate::dates;
use crate::store::feedback::Warning;
use crate::task::{NewTask, Priority};

/// The in-progress input for a new task, before it is submitted to the store.
///
/// A fresh composer starts with empty texts, a deadline of "right now" and a
/// low priority. The deadline is always a valid date: text that cannot be
/// parsed never ends up in here.
pub struct Composer {
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    priority: Priority,
    calendar_open: bool,
}

impl Composer {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            due_date: Utc::now(),
            priority: Priority::default(),
            calendar_open: false,
        }
    }

    pub fn title(&self) -> &str { &self.title }
    pub fn description(&self) -> &str { &self.description }
    pub fn due_date(&self) -> &DateTime<Utc> { &self.due_date }
    pub fn priority(&self) -> Priority { self.priority }

    /// The title as it is being typed
    pub fn title_mut(&mut self) -> &mut String {
        &mut self.title
    }
    /// The description as it is being typed
    pub fn description_mut(&mut self) -> &mut String {
        &mut self.description
    }

    pub fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Whether the date picker is currently shown
    pub fn calendar_open(&self) -> bool {
        self.calendar_open
    }
    pub fn open_calendar(&mut self) {
        self.calendar_open = true;
    }
    pub fn close_calendar(&mut self) {
        self.calendar_open = false;
    }

    /// Take a deadline from the date picker, leniently parsed (see
    /// [`dates::parse_lenient`] for the accepted shapes).
    ///
    /// Text that cannot be parsed resets the deadline to "right now" and
    /// returns the warning to show, so the draft never carries a bogus date.
    pub fn set_due_date(&mut self, raw: &str) -> Result<(), Warning> {
        match dates::parse_lenient(raw) {
            Some(date) => {
                self.due_date = date;
                Ok(())
            }
            None => {
                log::warn!("Cannot parse {:?} as a date, resetting the deadline", raw);
                self.due_date = Utc::now();
                Err(Warning::UnparseableDate)
            }
        }
    }

    /// The creation payload for the current draft
    pub fn draft(&self) -> NewTask {
        NewTask {
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: Some(self.due_date),
            priority: self.priority,
        }
    }

    /// Reset the draft after a successful creation: texts are cleared and the
    /// deadline goes back to "right now", but the selected priority is kept
    /// for the next task.
    pub fn clear(&mut self) {
        self.title.clear();
        self.description.clear();
        self.due_date = Utc::now();
    }
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn a_parseable_deadline_is_stored() {
        let mut composer = Composer::new();
        assert!(composer.set_due_date("2030-06-01T10:30").is_ok());
        assert_eq!(composer.due_date(), &Utc.with_ymd_and_hms(2030, 6, 1, 10, 30, 0).unwrap());
    }

    #[test]
    fn an_unparseable_deadline_resets_to_now() {
        let mut composer = Composer::new();
        composer.set_due_date("2030-06-01T10:30").unwrap();

        let before = Utc::now();
        assert_eq!(composer.set_due_date("whenever"), Err(Warning::UnparseableDate));
        let after = Utc::now();

        // Not the old value, but the current moment
        assert!(composer.due_date() >= &before && composer.due_date() <= &after);
    }

    #[test]
    fn the_draft_carries_every_field() {
        let mut composer = Composer::new();
        composer.title_mut().push_str("Buy milk");
        composer.description_mut().push_str("Semi-skimmed");
        composer.set_priority(Priority::High);
        composer.set_due_date("2030-06-01").unwrap();

        let draft = composer.draft();
        assert_eq!(draft.title, "Buy milk");
        assert_eq!(draft.description, "Semi-skimmed");
        assert_eq!(draft.priority, Priority::High);
        assert_eq!(draft.due_date, Some(Utc.with_ymd_and_hms(2030, 6, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn clearing_keeps_the_selected_priority() {
        let mut composer = Composer::new();
        composer.title_mut().push_str("Buy milk");
        composer.description_mut().push_str("Semi-skimmed");
        composer.set_priority(Priority::High);
        composer.set_due_date("2030-06-01").unwrap();

        let before = Utc::now();
        composer.clear();
        let after = Utc::now();

        assert_eq!(composer.title(), "");
        assert_eq!(composer.description(), "");
        assert_eq!(composer.priority(), Priority::High);
        // The deadline is back to the current moment
        assert!(composer.due_date() >= &before && composer.due_date() <= &after);
    }

    #[test]
    fn the_picker_toggles() {
        let mut composer = Composer::new();
        assert_eq!(composer.calendar_open(), false);
        composer.open_calendar();
        assert!(composer.calendar_open());
        composer.close_calendar();
        assert_eq!(composer.calendar_open(), false);
    }
}
