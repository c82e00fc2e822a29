//! Pre-search configuration errors.
//!
//! A [`ConfigurationError`] is fatal to a run: it means the time grid,
//! the domain catalog, or the engine parameters are malformed and no
//! search can start. Constraint violations found *during* search are not
//! errors — they are counted and reported by the fitness evaluator.

use std::fmt;

/// A fatal configuration problem detected before search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    /// Error category.
    pub kind: ConfigurationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationErrorKind {
    /// The time grid is malformed: unparseable times, overlapping or
    /// non-increasing periods, or no schedulable period at all.
    InvalidGrid,
    /// Two catalog entities share the same ID.
    DuplicateId,
    /// A catalog entity references an ID that doesn't exist.
    UnknownReference,
    /// The catalog can never produce a feasible timetable (a requirement
    /// with no qualified faculty or no eligible room, or more pinned
    /// occurrences than the weekly frequency allows).
    Unsatisfiable,
    /// An engine parameter is out of range.
    InvalidParameter,
}

impl ConfigurationError {
    pub(crate) fn new(kind: ConfigurationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn grid(message: impl Into<String>) -> Self {
        Self::new(ConfigurationErrorKind::InvalidGrid, message)
    }

    pub(crate) fn parameter(message: impl Into<String>) -> Self {
        Self::new(ConfigurationErrorKind::InvalidParameter, message)
    }
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ConfigurationErrorKind::InvalidGrid => "invalid time grid",
            ConfigurationErrorKind::DuplicateId => "duplicate id",
            ConfigurationErrorKind::UnknownReference => "unknown reference",
            ConfigurationErrorKind::Unsatisfiable => "unsatisfiable catalog",
            ConfigurationErrorKind::InvalidParameter => "invalid parameter",
        };
        write!(f, "{kind}: {}", self.message)
    }
}

impl std::error::Error for ConfigurationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_kind_and_message() {
        let err = ConfigurationError::grid("periods overlap");
        let text = err.to_string();
        assert!(text.contains("invalid time grid"));
        assert!(text.contains("periods overlap"));
    }

    #[test]
    fn test_error_trait_object() {
        let err: Box<dyn std::error::Error> =
            Box::new(ConfigurationError::parameter("population_size must be at least 2"));
        assert!(err.to_string().contains("invalid parameter"));
    }
}
