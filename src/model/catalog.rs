//! The read-only domain catalog.
//!
//! A [`Catalog`] is the explicitly-linked, id-keyed description of one
//! batch's scheduling problem: subjects, session requirements, faculty,
//! rooms and administratively pinned slots. It is loaded once before a
//! run and never mutated by the engine.

use serde::{Deserialize, Serialize};

use super::faculty::Faculty;
use super::grid::{Day, TimeGrid};
use super::room::Room;
use super::session::{SessionRequirement, Subject};
use crate::error::{ConfigurationError, ConfigurationErrorKind};

/// The student group a timetable is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    /// Unique batch identifier.
    pub id: String,
    /// Display name (e.g. "ECE 3rd Sem A").
    pub name: String,
    /// Number of students.
    pub strength: u32,
}

impl Batch {
    /// Creates a batch with a default strength of 60.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            strength: 60,
        }
    }

    /// Sets the student count.
    pub fn with_strength(mut self, strength: u32) -> Self {
        self.strength = strength;
        self
    }
}

/// An administratively pinned slot that must appear unchanged in every
/// candidate timetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedAssignment {
    /// Pinned day.
    pub day: Day,
    /// Pinned period.
    pub period: usize,
    /// Requirement occupying the slot.
    pub requirement_id: String,
    /// Faculty taking the slot.
    pub faculty_id: String,
    /// Room hosting the slot.
    pub room_id: String,
}

impl FixedAssignment {
    /// Creates a pinned slot.
    pub fn new(
        day: Day,
        period: usize,
        requirement_id: impl Into<String>,
        faculty_id: impl Into<String>,
        room_id: impl Into<String>,
    ) -> Self {
        Self {
            day,
            period,
            requirement_id: requirement_id.into(),
            faculty_id: faculty_id.into(),
            room_id: room_id.into(),
        }
    }
}

/// The complete domain catalog for one batch's run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Target batch.
    pub batch: Batch,
    /// Subjects taught to the batch.
    pub subjects: Vec<Subject>,
    /// Weekly session requirements.
    pub requirements: Vec<SessionRequirement>,
    /// Faculty pool.
    pub faculty: Vec<Faculty>,
    /// Room pool.
    pub rooms: Vec<Room>,
    /// Pinned slots.
    pub fixed: Vec<FixedAssignment>,
}

impl Catalog {
    /// Creates an empty catalog for a batch.
    pub fn new(batch: Batch) -> Self {
        Self {
            batch,
            subjects: Vec::new(),
            requirements: Vec::new(),
            faculty: Vec::new(),
            rooms: Vec::new(),
            fixed: Vec::new(),
        }
    }

    /// Adds a subject.
    pub fn with_subject(mut self, subject: Subject) -> Self {
        self.subjects.push(subject);
        self
    }

    /// Adds a session requirement.
    pub fn with_requirement(mut self, requirement: SessionRequirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: Faculty) -> Self {
        self.faculty.push(faculty);
        self
    }

    /// Adds a room.
    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    /// Adds a pinned slot.
    pub fn with_fixed(mut self, fixed: FixedAssignment) -> Self {
        self.fixed.push(fixed);
        self
    }

    /// Looks up a subject by id.
    pub fn subject(&self, id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Looks up a requirement by id.
    pub fn requirement(&self, id: &str) -> Option<&SessionRequirement> {
        self.requirements.iter().find(|r| r.id == id)
    }

    /// Looks up a faculty member by id.
    pub fn faculty_member(&self, id: &str) -> Option<&Faculty> {
        self.faculty.iter().find(|f| f.id == id)
    }

    /// Looks up a room by id.
    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    /// Faculty qualified for a requirement, in catalog order.
    pub fn qualified_faculty(&self, requirement_id: &str) -> Vec<&Faculty> {
        self.faculty
            .iter()
            .filter(|f| f.qualified.iter().any(|q| q == requirement_id))
            .collect()
    }

    /// Rooms that may host a requirement: type-compatible and large enough
    /// for the batch, in catalog order.
    pub fn eligible_rooms(&self, requirement: &SessionRequirement) -> Vec<&Room> {
        self.rooms
            .iter()
            .filter(|r| {
                r.room_type.hosts(requirement.session_type) && r.capacity >= self.batch.strength
            })
            .collect()
    }

    /// Total occurrence-periods required per week, for the capacity check.
    pub fn required_periods(&self) -> usize {
        self.requirements.iter().map(|r| r.occupied_periods()).sum()
    }

    /// Validates structural integrity against a grid.
    ///
    /// Checks duplicate ids, dangling references, pinned slots landing on
    /// breaks or outside the grid, zero durations/frequencies, and
    /// requirements that no faculty or room can ever serve. Returns the
    /// first problem found, in catalog order.
    pub fn validate(&self, grid: &TimeGrid) -> Result<(), ConfigurationError> {
        self.check_duplicates()?;
        self.check_requirements(grid)?;
        self.check_faculty()?;
        self.check_fixed(grid)?;
        Ok(())
    }

    fn check_duplicates(&self) -> Result<(), ConfigurationError> {
        let dup = |what: &str, id: &str| {
            ConfigurationError::new(
                ConfigurationErrorKind::DuplicateId,
                format!("duplicate {what} id '{id}'"),
            )
        };
        let mut seen: Vec<&str> = Vec::new();
        for s in &self.subjects {
            if seen.contains(&s.id.as_str()) {
                return Err(dup("subject", &s.id));
            }
            seen.push(&s.id);
        }
        seen.clear();
        for r in &self.requirements {
            if seen.contains(&r.id.as_str()) {
                return Err(dup("requirement", &r.id));
            }
            seen.push(&r.id);
        }
        seen.clear();
        for f in &self.faculty {
            if seen.contains(&f.id.as_str()) {
                return Err(dup("faculty", &f.id));
            }
            seen.push(&f.id);
        }
        seen.clear();
        for r in &self.rooms {
            if seen.contains(&r.id.as_str()) {
                return Err(dup("room", &r.id));
            }
            seen.push(&r.id);
        }
        Ok(())
    }

    fn check_requirements(&self, grid: &TimeGrid) -> Result<(), ConfigurationError> {
        for req in &self.requirements {
            if self.subject(&req.subject_id).is_none() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::UnknownReference,
                    format!(
                        "requirement '{}' references unknown subject '{}'",
                        req.id, req.subject_id
                    ),
                ));
            }
            if req.duration_periods == 0 || req.weekly_frequency == 0 {
                return Err(ConfigurationError::parameter(format!(
                    "requirement '{}' has zero duration or frequency",
                    req.id
                )));
            }
            if req.duration_periods > grid.schedulable_per_day() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::Unsatisfiable,
                    format!(
                        "requirement '{}' needs {} contiguous periods but a day has only {} schedulable",
                        req.id,
                        req.duration_periods,
                        grid.schedulable_per_day()
                    ),
                ));
            }
            if self.qualified_faculty(&req.id).is_empty() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::Unsatisfiable,
                    format!("requirement '{}' has no qualified faculty", req.id),
                ));
            }
            if self.eligible_rooms(req).is_empty() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::Unsatisfiable,
                    format!("requirement '{}' has no eligible room", req.id),
                ));
            }
        }
        Ok(())
    }

    fn check_faculty(&self) -> Result<(), ConfigurationError> {
        for f in &self.faculty {
            for q in &f.qualified {
                if self.requirement(q).is_none() {
                    return Err(ConfigurationError::new(
                        ConfigurationErrorKind::UnknownReference,
                        format!("faculty '{}' references unknown requirement '{q}'", f.id),
                    ));
                }
            }
        }
        Ok(())
    }

    fn check_fixed(&self, grid: &TimeGrid) -> Result<(), ConfigurationError> {
        for (i, fx) in self.fixed.iter().enumerate() {
            if fx.period >= grid.len() {
                return Err(ConfigurationError::parameter(format!(
                    "fixed assignment on {} pins period {} outside the grid",
                    fx.day, fx.period
                )));
            }
            if grid.is_break(fx.period) {
                return Err(ConfigurationError::parameter(format!(
                    "fixed assignment on {} pins break period {}",
                    fx.day, fx.period
                )));
            }
            if self.requirement(&fx.requirement_id).is_none() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::UnknownReference,
                    format!(
                        "fixed assignment references unknown requirement '{}'",
                        fx.requirement_id
                    ),
                ));
            }
            if self.faculty_member(&fx.faculty_id).is_none() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::UnknownReference,
                    format!(
                        "fixed assignment references unknown faculty '{}'",
                        fx.faculty_id
                    ),
                ));
            }
            if self.room(&fx.room_id).is_none() {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::UnknownReference,
                    format!("fixed assignment references unknown room '{}'", fx.room_id),
                ));
            }
            for other in &self.fixed[..i] {
                if other.day == fx.day && other.period == fx.period {
                    return Err(ConfigurationError::new(
                        ConfigurationErrorKind::DuplicateId,
                        format!("two fixed assignments pin {} period {}", fx.day, fx.period),
                    ));
                }
            }
        }
        // More pins than the frequency allows can never satisfy the
        // exact-count invariant.
        for req in &self.requirements {
            let pinned = self
                .fixed
                .iter()
                .filter(|fx| fx.requirement_id == req.id)
                .count();
            if pinned > req.weekly_frequency {
                return Err(ConfigurationError::new(
                    ConfigurationErrorKind::Unsatisfiable,
                    format!(
                        "requirement '{}' has {pinned} pinned occurrences but a weekly frequency of {}",
                        req.id, req.weekly_frequency
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::room::RoomType;
    use crate::model::session::SessionType;

    fn sample_catalog() -> Catalog {
        Catalog::new(Batch::new("b-ece3a", "ECE 3rd Sem A").with_strength(60))
            .with_subject(Subject::new("s-emf", "U24EC311", "Electromagnetic Fields").heavy())
            .with_subject(Subject::new("s-sig", "U24EC323", "Signals and Systems"))
            .with_requirement(SessionRequirement::new(
                "r-emf-th",
                "s-emf",
                SessionType::Theory,
            ))
            .with_requirement(
                SessionRequirement::new("r-sig-lab", "s-sig", SessionType::Lab)
                    .with_duration(2)
                    .with_frequency(1),
            )
            .with_faculty(
                Faculty::new("f-asra", "Ms.H.Asra Jabeen").qualified_for("r-emf-th"),
            )
            .with_faculty(
                Faculty::new("f-rubitha", "Ms.K.Rubitha").qualified_for("r-sig-lab"),
            )
            .with_room(Room::new("rm-201", RoomType::Theory).with_capacity(60))
            .with_room(Room::new("lab-1", RoomType::Lab).with_capacity(60))
    }

    #[test]
    fn test_valid_catalog() {
        let grid = TimeGrid::standard();
        assert!(sample_catalog().validate(&grid).is_ok());
    }

    #[test]
    fn test_required_periods() {
        // 1 theory period + 1 lab of 2 contiguous periods.
        assert_eq!(sample_catalog().required_periods(), 3);
    }

    #[test]
    fn test_duplicate_subject_id() {
        let grid = TimeGrid::standard();
        let catalog =
            sample_catalog().with_subject(Subject::new("s-emf", "DUP", "Duplicate"));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::DuplicateId);
    }

    #[test]
    fn test_unknown_subject_reference() {
        let grid = TimeGrid::standard();
        let mut catalog = sample_catalog();
        catalog.requirements.push(SessionRequirement::new(
            "r-ghost",
            "s-missing",
            SessionType::Theory,
        ));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::UnknownReference);
    }

    #[test]
    fn test_requirement_without_faculty() {
        let grid = TimeGrid::standard();
        let catalog = sample_catalog()
            .with_subject(Subject::new("s-orphan", "ORPH", "Orphan"))
            .with_requirement(SessionRequirement::new(
                "r-orphan",
                "s-orphan",
                SessionType::Theory,
            ));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::Unsatisfiable);
        assert!(err.message.contains("no qualified faculty"));
    }

    #[test]
    fn test_lab_without_lab_room() {
        let grid = TimeGrid::standard();
        let mut catalog = sample_catalog();
        catalog.rooms.retain(|r| r.room_type != RoomType::Lab);
        let err = catalog.validate(&grid).unwrap_err();
        assert!(err.message.contains("no eligible room"));
    }

    #[test]
    fn test_undersized_rooms_are_ineligible() {
        let grid = TimeGrid::standard();
        let mut catalog = sample_catalog();
        for room in &mut catalog.rooms {
            room.capacity = 30; // batch strength is 60
        }
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::Unsatisfiable);
    }

    #[test]
    fn test_fixed_on_break_rejected() {
        let grid = TimeGrid::standard();
        let catalog = sample_catalog().with_fixed(FixedAssignment::new(
            Day::Monday,
            5, // lunch break in the standard grid
            "r-emf-th",
            "f-asra",
            "rm-201",
        ));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::InvalidParameter);
    }

    #[test]
    fn test_fixed_unknown_room_rejected() {
        let grid = TimeGrid::standard();
        let catalog = sample_catalog().with_fixed(FixedAssignment::new(
            Day::Monday,
            3,
            "r-emf-th",
            "f-asra",
            "rm-nowhere",
        ));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::UnknownReference);
    }

    #[test]
    fn test_conflicting_fixed_cells_rejected() {
        let grid = TimeGrid::standard();
        let catalog = sample_catalog()
            .with_fixed(FixedAssignment::new(
                Day::Monday,
                3,
                "r-emf-th",
                "f-asra",
                "rm-201",
            ))
            .with_fixed(FixedAssignment::new(
                Day::Monday,
                3,
                "r-sig-lab",
                "f-rubitha",
                "lab-1",
            ));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::DuplicateId);
    }

    #[test]
    fn test_overpinned_requirement_rejected() {
        let grid = TimeGrid::standard();
        // r-emf-th has weekly_frequency 1 but two pins.
        let catalog = sample_catalog()
            .with_fixed(FixedAssignment::new(
                Day::Monday,
                3,
                "r-emf-th",
                "f-asra",
                "rm-201",
            ))
            .with_fixed(FixedAssignment::new(
                Day::Tuesday,
                3,
                "r-emf-th",
                "f-asra",
                "rm-201",
            ));
        let err = catalog.validate(&grid).unwrap_err();
        assert_eq!(err.kind, ConfigurationErrorKind::Unsatisfiable);
    }

    #[test]
    fn test_catalog_serde_round_trip() {
        let catalog = sample_catalog();
        let json = serde_json::to_string(&catalog).unwrap();
        let back: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, catalog);
    }
}
