//! Fitness evaluation.
//!
//! The [`Evaluator`] scores a chromosome into `[0, 1000]`:
//! `1000 − hard_weight × hard_total − Σ soft_weight × soft_count`,
//! floored at zero. It never fails for constraint violations — it only
//! counts them; deciding what to do with an infeasible best candidate is
//! the caller's job.
//!
//! Evaluation reads only the chromosome and the shared read-only
//! [`TimetableProblem`], so the search driver can score a whole
//! population in parallel without locking.

use serde::{Deserialize, Serialize};

use crate::chromosome::{Chromosome, Gene, Occurrence};
use crate::model::{Day, RoomType, SessionType};
use crate::problem::TimetableProblem;

/// Penalty weights for the fitness formula.
///
/// Every hard violation costs the same large `hard` penalty; soft
/// violations carry individual small weights.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintWeights {
    /// Penalty per hard violation.
    pub hard: f64,
    /// Occurrence placed on its subject's avoid day.
    pub avoid_day: f64,
    /// Same subject in two adjacent periods.
    pub back_to_back: f64,
    /// Two heavy subjects in adjacent periods.
    pub heavy_adjacent: f64,
    /// Lab occurrence with no earlier theory that week.
    pub lab_without_theory: f64,
    /// Lab in the last schedulable period on Friday.
    pub friday_lab: f64,
    /// Each occurrence above a faculty's weekly load bound.
    pub overload: f64,
    /// Room-usage variance above threshold, per room type.
    pub room_imbalance: f64,
    /// Usage-count variance above which a room type counts as imbalanced.
    pub room_balance_threshold: f64,
}

impl Default for ConstraintWeights {
    fn default() -> Self {
        Self {
            hard: 50.0,
            avoid_day: 3.0,
            back_to_back: 2.0,
            heavy_adjacent: 2.0,
            lab_without_theory: 3.0,
            friday_lab: 4.0,
            overload: 5.0,
            room_imbalance: 1.0,
            room_balance_threshold: 2.0,
        }
    }
}

/// Toggles for the optional soft rules (all on by default, matching the
/// legacy configuration checkboxes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoftRules {
    /// Penalize the same subject in adjacent periods.
    pub avoid_back_to_back: bool,
    /// Penalize two heavy subjects in adjacent periods.
    pub no_heavy_adjacent: bool,
    /// Penalize labs with no theory earlier in the week.
    pub lab_requires_theory: bool,
    /// Penalize labs in Friday's last schedulable period.
    pub avoid_friday_labs: bool,
}

impl Default for SoftRules {
    fn default() -> Self {
        Self {
            avoid_back_to_back: true,
            no_heavy_adjacent: true,
            lab_requires_theory: true,
            avoid_friday_labs: true,
        }
    }
}

/// Per-rule violation counters for one chromosome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViolationCounts {
    // Hard.
    /// Break or pinned cell overwritten.
    pub slot_violation: u32,
    /// Occurrence count differing from the weekly frequency.
    pub frequency_mismatch: u32,
    /// Multi-period occurrence split short of its duration.
    pub lab_split: u32,
    /// Lab scheduled too soon after the week's first theory day.
    pub lab_spacing: u32,
    /// Faculty booked inside a declared unavailability window.
    pub faculty_unavailable: u32,
    // Soft.
    /// Occurrence on its avoid day.
    pub avoid_day: u32,
    /// Same subject back-to-back.
    pub back_to_back: u32,
    /// Heavy subjects in adjacent periods.
    pub heavy_adjacent: u32,
    /// Lab with no earlier theory that week.
    pub lab_without_theory: u32,
    /// Lab in Friday's last schedulable period.
    pub friday_lab: u32,
    /// Occurrences above a faculty's weekly load bound.
    pub overload: u32,
    /// Room types with usage variance above threshold.
    pub room_imbalance: u32,
}

impl ViolationCounts {
    /// Total hard violations.
    pub fn hard_total(&self) -> u32 {
        self.slot_violation
            + self.frequency_mismatch
            + self.lab_split
            + self.lab_spacing
            + self.faculty_unavailable
    }

    /// Total soft violations.
    pub fn soft_total(&self) -> u32 {
        self.avoid_day
            + self.back_to_back
            + self.heavy_adjacent
            + self.lab_without_theory
            + self.friday_lab
            + self.overload
            + self.room_imbalance
    }

    /// Whether the chromosome satisfies every hard constraint.
    pub fn is_feasible(&self) -> bool {
        self.hard_total() == 0
    }
}

/// Scores chromosomes against the problem's hard and soft constraints.
pub struct Evaluator<'a> {
    problem: &'a TimetableProblem,
    weights: ConstraintWeights,
    rules: SoftRules,
}

impl<'a> Evaluator<'a> {
    /// Creates an evaluator for one run.
    pub fn new(problem: &'a TimetableProblem, weights: ConstraintWeights, rules: SoftRules) -> Self {
        Self {
            problem,
            weights,
            rules,
        }
    }

    /// Scores a chromosome: `(fitness, counts)`.
    pub fn evaluate(&self, chromosome: &Chromosome) -> (f64, ViolationCounts) {
        let counts = self.count(chromosome);
        (self.score(&counts), counts)
    }

    /// Fitness for a set of counts, floored at zero.
    pub fn score(&self, counts: &ViolationCounts) -> f64 {
        let w = &self.weights;
        let penalty = f64::from(counts.hard_total()) * w.hard
            + f64::from(counts.avoid_day) * w.avoid_day
            + f64::from(counts.back_to_back) * w.back_to_back
            + f64::from(counts.heavy_adjacent) * w.heavy_adjacent
            + f64::from(counts.lab_without_theory) * w.lab_without_theory
            + f64::from(counts.friday_lab) * w.friday_lab
            + f64::from(counts.overload) * w.overload
            + f64::from(counts.room_imbalance) * w.room_imbalance;
        (1000.0 - penalty).max(0.0)
    }

    /// Counts every violation in a chromosome.
    pub fn count(&self, chromosome: &Chromosome) -> ViolationCounts {
        let mut counts = ViolationCounts::default();
        let occurrences = chromosome.occurrences(self.problem);

        self.count_cell_violations(chromosome, &mut counts);
        self.count_frequency(&occurrences, &mut counts);
        self.count_occurrence_rules(chromosome, &occurrences, &mut counts);
        self.count_adjacency(&occurrences, &mut counts);
        self.count_loads(&occurrences, &mut counts);
        self.count_room_balance(&occurrences, &mut counts);

        counts
    }

    fn count_cell_violations(&self, chromosome: &Chromosome, counts: &mut ViolationCounts) {
        for day in 0..Day::COUNT {
            for period in 0..self.problem.periods() {
                let gene = chromosome.gene(day, period);
                if self.problem.grid.is_break(period) {
                    if gene != &Gene::Break {
                        counts.slot_violation += 1;
                    }
                    continue;
                }
                if let Some(fx) = self.problem.fixed_at(day, period) {
                    let matches = gene.session().is_some_and(|g| {
                        g.requirement_id == fx.requirement_id
                            && g.faculty_id == fx.faculty_id
                            && g.room_id == fx.room_id
                    });
                    if !matches {
                        counts.slot_violation += 1;
                    }
                }
            }
        }
    }

    fn count_frequency(&self, occurrences: &[Occurrence], counts: &mut ViolationCounts) {
        for (idx, req) in self.problem.catalog.requirements.iter().enumerate() {
            let placed = occurrences.iter().filter(|o| o.requirement == idx).count();
            counts.frequency_mismatch += placed.abs_diff(req.weekly_frequency) as u32;
        }
    }

    fn count_occurrence_rules(
        &self,
        chromosome: &Chromosome,
        occurrences: &[Occurrence],
        counts: &mut ViolationCounts,
    ) {
        let friday = Day::Friday.index();
        let last = self.problem.grid.last_schedulable();

        for occ in occurrences {
            let req = self.problem.requirement_at(occ.requirement);

            if occ.len < req.duration_periods {
                counts.lab_split += 1;
            }

            if req.avoid_day.is_some_and(|d| d.index() == occ.day) {
                counts.avoid_day += 1;
            }

            // Every cell is checked against its own gene's faculty, so a
            // half-mutated block still reports correctly.
            let blocked = (occ.start_period..=occ.end_period()).any(|p| {
                chromosome
                    .gene(occ.day, p)
                    .session()
                    .is_some_and(|g| self.problem.faculty_unavailable(&g.faculty_id, occ.day, p))
            });
            if blocked {
                counts.faculty_unavailable += 1;
            }

            if req.session_type == SessionType::Lab {
                let first_theory = first_theory_day(self.problem, occurrences, &req.subject_id);

                if req.min_days_after_theory > 0 {
                    if let Some(first) = first_theory {
                        if occ.day < first + req.min_days_after_theory {
                            counts.lab_spacing += 1;
                        }
                    }
                }

                if self.rules.lab_requires_theory
                    && subject_has_theory_requirement(self.problem, &req.subject_id)
                {
                    let preceded = occurrences.iter().any(|other| {
                        is_theory_of(self.problem, other, &req.subject_id)
                            && (other.day, other.start_period) < (occ.day, occ.start_period)
                    });
                    if !preceded {
                        counts.lab_without_theory += 1;
                    }
                }

                if self.rules.avoid_friday_labs
                    && occ.day == friday
                    && occ.start_period <= last
                    && last <= occ.end_period()
                {
                    counts.friday_lab += 1;
                }
            }
        }
    }

    fn count_adjacency(&self, occurrences: &[Occurrence], counts: &mut ViolationCounts) {
        if !self.rules.avoid_back_to_back && !self.rules.no_heavy_adjacent {
            return;
        }

        // Cell → occurrence index, to tell adjacent blocks from the
        // inside of one block.
        let periods = self.problem.periods();
        let mut owner = vec![usize::MAX; Day::COUNT * periods];
        for (i, occ) in occurrences.iter().enumerate() {
            for p in occ.start_period..=occ.end_period() {
                owner[occ.day * periods + p] = i;
            }
        }

        for day in 0..Day::COUNT {
            for p in 0..periods.saturating_sub(1) {
                let a = owner[day * periods + p];
                let b = owner[day * periods + p + 1];
                if a == usize::MAX || b == usize::MAX || a == b {
                    continue;
                }
                let subject_a = &self
                    .problem
                    .requirement_at(occurrences[a].requirement)
                    .subject_id;
                let subject_b = &self
                    .problem
                    .requirement_at(occurrences[b].requirement)
                    .subject_id;
                if self.rules.avoid_back_to_back && subject_a == subject_b {
                    counts.back_to_back += 1;
                }
                if self.rules.no_heavy_adjacent && subject_a != subject_b {
                    let heavy_a = self
                        .problem
                        .subject_of(self.problem.requirement_at(occurrences[a].requirement))
                        .heavy;
                    let heavy_b = self
                        .problem
                        .subject_of(self.problem.requirement_at(occurrences[b].requirement))
                        .heavy;
                    if heavy_a && heavy_b {
                        counts.heavy_adjacent += 1;
                    }
                }
            }
        }
    }

    fn count_loads(&self, occurrences: &[Occurrence], counts: &mut ViolationCounts) {
        for faculty in &self.problem.catalog.faculty {
            let load = occurrences
                .iter()
                .filter(|o| o.faculty_id == faculty.id)
                .count() as u32;
            counts.overload += load.saturating_sub(faculty.max_weekly_load);
        }
    }

    fn count_room_balance(&self, occurrences: &[Occurrence], counts: &mut ViolationCounts) {
        for room_type in [
            RoomType::Theory,
            RoomType::Lab,
            RoomType::Common,
            RoomType::Seminar,
        ] {
            let rooms: Vec<&str> = self
                .problem
                .catalog
                .rooms
                .iter()
                .filter(|r| r.room_type == room_type)
                .map(|r| r.id.as_str())
                .collect();
            if rooms.len() < 2 {
                continue;
            }
            let usages: Vec<f64> = rooms
                .iter()
                .map(|id| occurrences.iter().filter(|o| o.room_id == *id).count() as f64)
                .collect();
            let mean = usages.iter().sum::<f64>() / usages.len() as f64;
            let variance =
                usages.iter().map(|u| (u - mean) * (u - mean)).sum::<f64>() / usages.len() as f64;
            if variance > self.weights.room_balance_threshold {
                counts.room_imbalance += 1;
            }
        }
    }
}

fn first_theory_day(
    problem: &TimetableProblem,
    occurrences: &[Occurrence],
    subject_id: &str,
) -> Option<usize> {
    occurrences
        .iter()
        .filter(|o| is_theory_of(problem, o, subject_id))
        .map(|o| o.day)
        .min()
}

fn is_theory_of(problem: &TimetableProblem, occ: &Occurrence, subject_id: &str) -> bool {
    let req = problem.requirement_at(occ.requirement);
    req.session_type == SessionType::Theory && req.subject_id == subject_id
}

fn subject_has_theory_requirement(problem: &TimetableProblem, subject_id: &str) -> bool {
    problem
        .catalog
        .requirements
        .iter()
        .any(|r| r.session_type == SessionType::Theory && r.subject_id == subject_id)
}
