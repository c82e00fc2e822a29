//! Subjects and their weekly session requirements.

use serde::{Deserialize, Serialize};

use super::grid::Day;

/// Kind of teaching session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionType {
    Theory,
    Lab,
    Tutorial,
    Special,
}

impl SessionType {
    /// Whether this is a lab session.
    pub fn is_lab(self) -> bool {
        self == SessionType::Lab
    }
}

/// A subject taught to the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    /// Unique subject identifier.
    pub id: String,
    /// Course code (e.g. "U24EC311").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Heavy subjects should not sit in adjacent periods.
    pub heavy: bool,
}

impl Subject {
    /// Creates a subject.
    pub fn new(id: impl Into<String>, code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            code: code.into(),
            name: name.into(),
            heavy: false,
        }
    }

    /// Marks the subject as heavy.
    pub fn heavy(mut self) -> Self {
        self.heavy = true;
        self
    }
}

/// The need for a subject to occur a fixed number of times per week in a
/// specific mode.
///
/// A lab with `duration_periods = 2` and `weekly_frequency = 2` means two
/// occurrences per week, each spanning two contiguous non-break periods
/// within one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRequirement {
    /// Unique requirement identifier.
    pub id: String,
    /// Owning subject.
    pub subject_id: String,
    /// Session mode.
    pub session_type: SessionType,
    /// Contiguous periods per occurrence.
    pub duration_periods: usize,
    /// Exact occurrences per week.
    pub weekly_frequency: usize,
    /// Days to prefer when placing occurrences (soft bias).
    pub preferred_days: Vec<Day>,
    /// Day to stay away from (soft bias, scored when violated).
    pub avoid_day: Option<Day>,
    /// A lab occurrence must start at least this many days after the
    /// subject's first theory occurrence of the week. Zero disables.
    pub min_days_after_theory: usize,
}

impl SessionRequirement {
    /// Creates a requirement with one single-period occurrence per week.
    pub fn new(
        id: impl Into<String>,
        subject_id: impl Into<String>,
        session_type: SessionType,
    ) -> Self {
        Self {
            id: id.into(),
            subject_id: subject_id.into(),
            session_type,
            duration_periods: 1,
            weekly_frequency: 1,
            preferred_days: Vec::new(),
            avoid_day: None,
            min_days_after_theory: 0,
        }
    }

    /// Sets the contiguous periods per occurrence.
    pub fn with_duration(mut self, periods: usize) -> Self {
        self.duration_periods = periods;
        self
    }

    /// Sets the exact weekly occurrence count.
    pub fn with_frequency(mut self, occurrences: usize) -> Self {
        self.weekly_frequency = occurrences;
        self
    }

    /// Sets the preferred days.
    pub fn with_preferred_days(mut self, days: impl Into<Vec<Day>>) -> Self {
        self.preferred_days = days.into();
        self
    }

    /// Sets the day to avoid.
    pub fn with_avoid_day(mut self, day: Day) -> Self {
        self.avoid_day = Some(day);
        self
    }

    /// Sets the minimum lab lead time after the week's first theory day.
    pub fn with_min_days_after_theory(mut self, days: usize) -> Self {
        self.min_days_after_theory = days;
        self
    }

    /// Total periods this requirement occupies per week.
    pub fn occupied_periods(&self) -> usize {
        self.duration_periods * self.weekly_frequency
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requirement_builder() {
        let req = SessionRequirement::new("r-emf-lab", "s-emf", SessionType::Lab)
            .with_duration(2)
            .with_frequency(2)
            .with_preferred_days([Day::Monday, Day::Wednesday])
            .with_avoid_day(Day::Friday)
            .with_min_days_after_theory(1);

        assert_eq!(req.duration_periods, 2);
        assert_eq!(req.weekly_frequency, 2);
        assert_eq!(req.occupied_periods(), 4);
        assert_eq!(req.avoid_day, Some(Day::Friday));
        assert!(req.session_type.is_lab());
    }

    #[test]
    fn test_defaults() {
        let req = SessionRequirement::new("r-apt", "s-apt", SessionType::Special);
        assert_eq!(req.duration_periods, 1);
        assert_eq!(req.weekly_frequency, 1);
        assert!(req.preferred_days.is_empty());
        assert!(req.avoid_day.is_none());
        assert_eq!(req.min_days_after_theory, 0);
    }

    #[test]
    fn test_heavy_subject() {
        let s = Subject::new("s-emf", "U24EC311", "Electromagnetic Fields").heavy();
        assert!(s.heavy);
        let t = Subject::new("s-apt", "APTITUDE", "Aptitude & Communication");
        assert!(!t.heavy);
    }
}
