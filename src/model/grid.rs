//! Weekly time grid.
//!
//! The grid is the ordered catalog of daily periods — teaching slots and
//! breaks — shared by all five days of the week. It is built once from
//! configuration and stays immutable for the whole run.
//!
//! Break periods are positionally fixed and identical across days; the
//! count of schedulable (non-break) slots bounds how many session
//! occurrences a week can hold at all.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConfigurationError;

/// A weekday of the five-day teaching week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Day {
    /// All days, in week order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Number of days in the teaching week.
    pub const COUNT: usize = Self::ALL.len();

    /// Zero-based position in the week (Monday = 0).
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day at a zero-based week position.
    pub fn from_index(index: usize) -> Option<Day> {
        Self::ALL.get(index).copied()
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
        };
        f.write_str(name)
    }
}

/// One period of the daily schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// Position within the day (0-based).
    pub index: usize,
    /// Start time in minutes since midnight.
    pub start_min: u16,
    /// End time in minutes since midnight.
    pub end_min: u16,
    /// Display label (e.g. "1st Period", "Lunch Break").
    pub label: String,
    /// Whether this period is a break slot.
    pub is_break: bool,
}

impl Period {
    /// Start time formatted as `HH:MM`.
    pub fn start(&self) -> String {
        format_hhmm(self.start_min)
    }

    /// End time formatted as `HH:MM`.
    pub fn end(&self) -> String {
        format_hhmm(self.end_min)
    }
}

/// Input description of one period, as supplied by the configuration layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSpec {
    /// Start time, `HH:MM`.
    pub start: String,
    /// End time, `HH:MM`.
    pub end: String,
    /// Display label.
    pub label: String,
    /// Break flag.
    pub is_break: bool,
}

impl PeriodSpec {
    /// A teaching period.
    pub fn teaching(start: impl Into<String>, end: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            label: label.into(),
            is_break: false,
        }
    }

    /// A break period.
    pub fn recess(start: impl Into<String>, end: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            label: label.into(),
            is_break: true,
        }
    }
}

/// The immutable weekly time grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeGrid {
    periods: Vec<Period>,
    break_periods: Vec<usize>,
}

impl TimeGrid {
    /// Builds a grid from period specifications.
    ///
    /// Fails if a time string is malformed, a period ends before it
    /// starts, periods overlap or run backwards, or no schedulable
    /// (non-break) period remains.
    pub fn new(specs: &[PeriodSpec]) -> Result<TimeGrid, ConfigurationError> {
        if specs.is_empty() {
            return Err(ConfigurationError::grid("grid has no periods"));
        }

        let mut periods = Vec::with_capacity(specs.len());
        for (index, spec) in specs.iter().enumerate() {
            let start_min = parse_hhmm(&spec.start)?;
            let end_min = parse_hhmm(&spec.end)?;
            if start_min >= end_min {
                return Err(ConfigurationError::grid(format!(
                    "period {index} ('{}') ends at or before its start",
                    spec.label
                )));
            }
            periods.push(Period {
                index,
                start_min,
                end_min,
                label: spec.label.clone(),
                is_break: spec.is_break,
            });
        }

        for pair in periods.windows(2) {
            if pair[1].start_min < pair[0].end_min {
                return Err(ConfigurationError::grid(format!(
                    "period {} ('{}') overlaps period {} ('{}')",
                    pair[1].index, pair[1].label, pair[0].index, pair[0].label
                )));
            }
        }

        let break_periods: Vec<usize> = periods
            .iter()
            .filter(|p| p.is_break)
            .map(|p| p.index)
            .collect();

        if break_periods.len() == periods.len() {
            return Err(ConfigurationError::grid("grid has no schedulable periods"));
        }

        Ok(TimeGrid {
            periods,
            break_periods,
        })
    }

    /// The 11-period layout of the legacy configuration: eight teaching
    /// periods with breaks at positions 2, 5 and 8.
    pub fn standard() -> TimeGrid {
        TimeGrid::new(&[
            PeriodSpec::teaching("09:00", "09:50", "1st Period"),
            PeriodSpec::teaching("09:50", "10:40", "2nd Period"),
            PeriodSpec::recess("10:40", "10:55", "Morning Break"),
            PeriodSpec::teaching("10:55", "11:45", "3rd Period"),
            PeriodSpec::teaching("11:45", "12:35", "4th Period"),
            PeriodSpec::recess("12:35", "13:30", "Lunch Break"),
            PeriodSpec::teaching("13:30", "14:20", "5th Period"),
            PeriodSpec::teaching("14:20", "15:10", "6th Period"),
            PeriodSpec::recess("15:10", "15:20", "Evening Break"),
            PeriodSpec::teaching("15:20", "16:10", "7th Period"),
            PeriodSpec::teaching("16:10", "17:00", "8th Period"),
        ])
        .expect("standard grid is well-formed")
    }

    /// Number of periods per day (breaks included).
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Whether the grid has no periods. Always false for a built grid.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// All periods in day order.
    pub fn periods(&self) -> &[Period] {
        &self.periods
    }

    /// Period at a position.
    pub fn period(&self, index: usize) -> Option<&Period> {
        self.periods.get(index)
    }

    /// Whether the period at `index` is a break.
    pub fn is_break(&self, index: usize) -> bool {
        self.periods.get(index).is_some_and(|p| p.is_break)
    }

    /// Indices of all break periods, ascending.
    pub fn break_periods(&self) -> &[usize] {
        &self.break_periods
    }

    /// Count of schedulable (non-break) periods per day.
    pub fn schedulable_per_day(&self) -> usize {
        self.periods.len() - self.break_periods.len()
    }

    /// Total schedulable slots across the five-day week.
    pub fn weekly_capacity(&self) -> usize {
        self.schedulable_per_day() * Day::COUNT
    }

    /// Index of the last schedulable period of the day.
    pub fn last_schedulable(&self) -> usize {
        self.periods
            .iter()
            .rev()
            .find(|p| !p.is_break)
            .map(|p| p.index)
            .expect("grid has at least one schedulable period")
    }
}

fn parse_hhmm(text: &str) -> Result<u16, ConfigurationError> {
    let malformed = || ConfigurationError::grid(format!("malformed time '{text}', expected HH:MM"));
    let (hh, mm) = text.split_once(':').ok_or_else(malformed)?;
    let hours: u16 = hh.parse().map_err(|_| malformed())?;
    let minutes: u16 = mm.parse().map_err(|_| malformed())?;
    if hours > 23 || minutes > 59 {
        return Err(malformed());
    }
    Ok(hours * 60 + minutes)
}

fn format_hhmm(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationErrorKind;

    #[test]
    fn test_standard_grid_shape() {
        let grid = TimeGrid::standard();
        assert_eq!(grid.len(), 11);
        assert_eq!(grid.break_periods(), &[2, 5, 8]);
        assert_eq!(grid.schedulable_per_day(), 8);
        assert_eq!(grid.weekly_capacity(), 40);
        assert_eq!(grid.last_schedulable(), 10);
    }

    #[test]
    fn test_period_time_formatting() {
        let grid = TimeGrid::standard();
        let first = grid.period(0).unwrap();
        assert_eq!(first.start(), "09:00");
        assert_eq!(first.end(), "09:50");
        let lunch = grid.period(5).unwrap();
        assert!(lunch.is_break);
        assert_eq!(lunch.label, "Lunch Break");
    }

    #[test]
    fn test_rejects_overlap() {
        let err = TimeGrid::new(&[
            PeriodSpec::teaching("09:00", "10:00", "A"),
            PeriodSpec::teaching("09:30", "10:30", "B"),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::InvalidGrid);
    }

    #[test]
    fn test_rejects_backwards_period() {
        let err = TimeGrid::new(&[PeriodSpec::teaching("10:00", "09:00", "A")]).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::InvalidGrid);
    }

    #[test]
    fn test_rejects_non_increasing_sequence() {
        let err = TimeGrid::new(&[
            PeriodSpec::teaching("11:00", "12:00", "A"),
            PeriodSpec::teaching("09:00", "10:00", "B"),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::InvalidGrid);
    }

    #[test]
    fn test_rejects_all_breaks() {
        let err = TimeGrid::new(&[
            PeriodSpec::recess("10:40", "10:55", "Break"),
            PeriodSpec::recess("12:35", "13:30", "Lunch"),
        ])
        .unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::InvalidGrid);
    }

    #[test]
    fn test_rejects_malformed_time() {
        for bad in ["9am", "25:00", "09:61", "0900", ""] {
            let result = TimeGrid::new(&[PeriodSpec::teaching(bad, "10:00", "A")]);
            assert!(result.is_err(), "expected '{bad}' to be rejected");
        }
    }

    #[test]
    fn test_back_to_back_periods_allowed() {
        // Shared boundaries are not overlaps.
        let grid = TimeGrid::new(&[
            PeriodSpec::teaching("09:00", "10:00", "A"),
            PeriodSpec::teaching("10:00", "11:00", "B"),
        ])
        .unwrap();
        assert_eq!(grid.schedulable_per_day(), 2);
    }

    #[test]
    fn test_day_round_trip() {
        for day in Day::ALL {
            assert_eq!(Day::from_index(day.index()), Some(day));
        }
        assert_eq!(Day::from_index(5), None);
        assert_eq!(Day::Friday.to_string(), "Friday");
    }

    #[test]
    fn test_grid_serde_round_trip() {
        let grid = TimeGrid::standard();
        let json = serde_json::to_string(&grid).unwrap();
        let back: TimeGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, grid);
    }
}
