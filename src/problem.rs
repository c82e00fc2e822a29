//! Problem context shared by seeding, repair, operators and evaluation.
//!
//! [`TimetableProblem`] snapshots the validated catalog and grid together
//! with everything worth precomputing once per run: pinned-cell lookup,
//! per-requirement eligible faculty/rooms, and id → index maps. It is
//! read-only during search, which is what lets the evaluator run across
//! the population in parallel without locking.

use std::collections::HashMap;

use crate::error::ConfigurationError;
use crate::model::{
    Catalog, Day, Faculty, FixedAssignment, Room, SessionRequirement, Subject, TimeGrid,
};

/// Immutable, indexed view of one run's scheduling problem.
#[derive(Debug, Clone)]
pub struct TimetableProblem {
    /// The validated catalog.
    pub catalog: Catalog,
    /// The validated time grid.
    pub grid: TimeGrid,
    fixed_cells: Vec<Option<usize>>,
    eligible_faculty: Vec<Vec<usize>>,
    eligible_rooms: Vec<Vec<usize>>,
    requirement_index: HashMap<String, usize>,
    subject_index: HashMap<String, usize>,
    faculty_index: HashMap<String, usize>,
    room_index: HashMap<String, usize>,
}

impl TimetableProblem {
    /// Validates the inputs and builds the indexed problem.
    pub fn new(catalog: &Catalog, grid: &TimeGrid) -> Result<Self, ConfigurationError> {
        catalog.validate(grid)?;

        let requirement_index: HashMap<String, usize> = catalog
            .requirements
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let subject_index: HashMap<String, usize> = catalog
            .subjects
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.clone(), i))
            .collect();
        let faculty_index: HashMap<String, usize> = catalog
            .faculty
            .iter()
            .enumerate()
            .map(|(i, f)| (f.id.clone(), i))
            .collect();
        let room_index: HashMap<String, usize> = catalog
            .rooms
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();

        let mut fixed_cells = vec![None; Day::COUNT * grid.len()];
        for (i, fx) in catalog.fixed.iter().enumerate() {
            fixed_cells[fx.day.index() * grid.len() + fx.period] = Some(i);
        }

        let eligible_faculty: Vec<Vec<usize>> = catalog
            .requirements
            .iter()
            .map(|req| {
                catalog
                    .faculty
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| f.qualified.iter().any(|q| q == &req.id))
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();
        let eligible_rooms: Vec<Vec<usize>> = catalog
            .requirements
            .iter()
            .map(|req| {
                catalog
                    .rooms
                    .iter()
                    .enumerate()
                    .filter(|(_, r)| {
                        r.room_type.hosts(req.session_type)
                            && r.capacity >= catalog.batch.strength
                    })
                    .map(|(i, _)| i)
                    .collect()
            })
            .collect();

        Ok(Self {
            catalog: catalog.clone(),
            grid: grid.clone(),
            fixed_cells,
            eligible_faculty,
            eligible_rooms,
            requirement_index,
            subject_index,
            faculty_index,
            room_index,
        })
    }

    /// Periods per day.
    pub fn periods(&self) -> usize {
        self.grid.len()
    }

    /// Day-major cell index for a slot.
    pub fn cell(&self, day: usize, period: usize) -> usize {
        day * self.grid.len() + period
    }

    /// The pinned assignment occupying a slot, if any.
    pub fn fixed_at(&self, day: usize, period: usize) -> Option<&FixedAssignment> {
        self.fixed_cells[self.cell(day, period)].map(|i| &self.catalog.fixed[i])
    }

    /// Whether a slot is pinned.
    pub fn is_fixed(&self, day: usize, period: usize) -> bool {
        self.fixed_cells[self.cell(day, period)].is_some()
    }

    /// Requirement position for an id.
    pub fn requirement_index(&self, id: &str) -> Option<usize> {
        self.requirement_index.get(id).copied()
    }

    /// Requirement at a position.
    pub fn requirement_at(&self, index: usize) -> &SessionRequirement {
        &self.catalog.requirements[index]
    }

    /// Subject owning a requirement.
    pub fn subject_of(&self, requirement: &SessionRequirement) -> &Subject {
        let idx = self.subject_index[&requirement.subject_id];
        &self.catalog.subjects[idx]
    }

    /// Faculty at a position.
    pub fn faculty_at(&self, index: usize) -> &Faculty {
        &self.catalog.faculty[index]
    }

    /// Faculty position for an id.
    pub fn faculty_index(&self, id: &str) -> Option<usize> {
        self.faculty_index.get(id).copied()
    }

    /// Room at a position.
    pub fn room_at(&self, index: usize) -> &Room {
        &self.catalog.rooms[index]
    }

    /// Room position for an id.
    pub fn room_index(&self, id: &str) -> Option<usize> {
        self.room_index.get(id).copied()
    }

    /// Faculty eligible for a requirement, in catalog order.
    pub fn eligible_faculty(&self, requirement: usize) -> &[usize] {
        &self.eligible_faculty[requirement]
    }

    /// Rooms eligible for a requirement, in catalog order.
    pub fn eligible_rooms(&self, requirement: usize) -> &[usize] {
        &self.eligible_rooms[requirement]
    }

    /// Whether a faculty member is blocked at a slot.
    pub fn faculty_unavailable(&self, faculty_id: &str, day: usize, period: usize) -> bool {
        let Some(day) = Day::from_index(day) else {
            return false;
        };
        self.faculty_index(faculty_id)
            .map(|i| self.catalog.faculty[i].is_unavailable(day, period))
            .unwrap_or(false)
    }

    /// Whether the catalog demands more occurrence-periods than the week
    /// can hold — the fail-fast infeasibility signal.
    pub fn over_capacity(&self) -> bool {
        self.catalog.required_periods() > self.grid.weekly_capacity()
    }
}
