//! Faculty members and their constraints.

use serde::{Deserialize, Serialize};

use super::grid::Day;

/// A recurring window in which a faculty member cannot teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    /// Affected day.
    pub day: Day,
    /// First blocked period (inclusive).
    pub from_period: usize,
    /// Last blocked period (inclusive).
    pub to_period: usize,
}

impl UnavailabilityWindow {
    /// Creates a window covering `[from_period, to_period]`.
    pub fn new(day: Day, from_period: usize, to_period: usize) -> Self {
        Self {
            day,
            from_period,
            to_period,
        }
    }

    /// Whether the window blocks the given slot.
    pub fn covers(&self, day: Day, period: usize) -> bool {
        self.day == day && (self.from_period..=self.to_period).contains(&period)
    }
}

/// A faculty member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faculty {
    /// Unique faculty identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Upper bound on assigned occurrences per week.
    pub max_weekly_load: u32,
    /// Requirement IDs this member is qualified to teach.
    pub qualified: Vec<String>,
    /// Recurring blocked windows.
    pub unavailable: Vec<UnavailabilityWindow>,
}

impl Faculty {
    /// Creates a faculty member with the legacy default load bound of 5.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            max_weekly_load: 5,
            qualified: Vec::new(),
            unavailable: Vec::new(),
        }
    }

    /// Sets the weekly load bound.
    pub fn with_max_weekly_load(mut self, load: u32) -> Self {
        self.max_weekly_load = load;
        self
    }

    /// Adds a requirement this member can teach.
    pub fn qualified_for(mut self, requirement_id: impl Into<String>) -> Self {
        self.qualified.push(requirement_id.into());
        self
    }

    /// Adds a blocked window.
    pub fn with_unavailability(mut self, day: Day, from_period: usize, to_period: usize) -> Self {
        self.unavailable
            .push(UnavailabilityWindow::new(day, from_period, to_period));
        self
    }

    /// Whether this member is blocked at the given slot.
    pub fn is_unavailable(&self, day: Day, period: usize) -> bool {
        self.unavailable.iter().any(|w| w.covers(day, period))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faculty_builder() {
        let f = Faculty::new("f-asra", "Ms.H.Asra Jabeen")
            .with_max_weekly_load(6)
            .qualified_for("r-emf-theory")
            .qualified_for("r-apt")
            .with_unavailability(Day::Friday, 6, 10);

        assert_eq!(f.max_weekly_load, 6);
        assert_eq!(f.qualified.len(), 2);
        assert!(f.is_unavailable(Day::Friday, 6));
        assert!(f.is_unavailable(Day::Friday, 10));
        assert!(!f.is_unavailable(Day::Friday, 5));
        assert!(!f.is_unavailable(Day::Monday, 7));
    }

    #[test]
    fn test_window_covers_bounds() {
        let w = UnavailabilityWindow::new(Day::Tuesday, 3, 3);
        assert!(w.covers(Day::Tuesday, 3));
        assert!(!w.covers(Day::Tuesday, 2));
        assert!(!w.covers(Day::Tuesday, 4));
        assert!(!w.covers(Day::Wednesday, 3));
    }
}
