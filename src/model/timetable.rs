//! Serializable timetable output view.
//!
//! The engine's result surface for the presentation/persistence
//! collaborators: the best chromosome rendered as day → period → entry,
//! with ids resolved to display names. Built by
//! [`Chromosome::to_timetable`](crate::chromosome::Chromosome::to_timetable).

use serde::{Deserialize, Serialize};

use super::grid::Day;
use super::session::SessionType;

/// Content of one timetable cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TimetableEntry {
    /// A break slot with the grid's label.
    Break { label: String },
    /// An unassigned teaching slot.
    Free,
    /// A teaching session.
    Session {
        subject_code: String,
        subject_name: String,
        session_type: SessionType,
        faculty: String,
        room: String,
    },
}

/// One period's cell, with the grid's display times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableSlot {
    /// Period index within the day.
    pub period: usize,
    /// Start time, `HH:MM`.
    pub start: String,
    /// End time, `HH:MM`.
    pub end: String,
    /// Cell content.
    pub entry: TimetableEntry,
}

/// One day's row of slots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableDay {
    /// The day.
    pub day: Day,
    /// Slots in period order.
    pub slots: Vec<TimetableSlot>,
}

/// A complete rendered weekly timetable for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timetable {
    /// Batch display name.
    pub batch: String,
    /// Days in week order.
    pub days: Vec<TimetableDay>,
}

impl Timetable {
    /// Entry at a slot, if the slot exists.
    pub fn entry(&self, day: Day, period: usize) -> Option<&TimetableEntry> {
        self.days
            .iter()
            .find(|d| d.day == day)
            .and_then(|d| d.slots.get(period))
            .map(|s| &s.entry)
    }

    /// Count of assigned session cells across the week.
    pub fn session_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|d| &d.slots)
            .filter(|s| matches!(s.entry, TimetableEntry::Session { .. }))
            .count()
    }
}
