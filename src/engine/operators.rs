//! Chromosome-aware genetic operators.
//!
//! Crossover exchanges one whole day row between two parents — this
//! keeps lab blocks intact far better than cell-wise mixing — and
//! mutation sweeps the grid per gene. Both end in a repair pass so every
//! offspring leaves with exact weekly frequencies.

use rand::Rng;

use crate::chromosome::Chromosome;
use crate::model::Day;
use crate::problem::TimetableProblem;

/// Whole-day crossover: swap one random day row between two parents and
/// repair both children.
///
/// Break cells are identical everywhere and pinned cells are identical
/// in every individual, so the swap preserves both by construction.
pub fn day_swap_crossover<R: Rng>(
    parent1: &Chromosome,
    parent2: &Chromosome,
    problem: &TimetableProblem,
    rng: &mut R,
) -> (Chromosome, Chromosome) {
    let day = rng.random_range(0..Day::COUNT);
    let mut child1 = parent1.clone();
    let mut child2 = parent2.clone();
    Chromosome::swap_day_rows(&mut child1, &mut child2, day);
    child1.repair(problem);
    child2.repair(problem);
    (child1, child2)
}

/// Per-gene mutation sweep followed by one repair pass.
///
/// Each non-break, non-pinned gene mutates with probability `rate`:
/// cleared with probability 0.25, otherwise reassigned to a random
/// eligible (requirement, faculty, room) combination for that slot.
pub fn mutate_genes<R: Rng>(
    chromosome: &mut Chromosome,
    problem: &TimetableProblem,
    rate: f64,
    rng: &mut R,
) {
    if rate <= 0.0 || problem.catalog.requirements.is_empty() {
        return;
    }
    let mut changed = false;
    for day in 0..Day::COUNT {
        for period in 0..problem.periods() {
            if problem.grid.is_break(period) || problem.is_fixed(day, period) {
                continue;
            }
            if rng.random_range(0.0..1.0) >= rate {
                continue;
            }
            changed = true;
            if rng.random_bool(0.25) {
                chromosome.clear_cell(problem, day, period);
            } else {
                let req_idx = rng.random_range(0..problem.catalog.requirements.len());
                let faculty_pool = problem.eligible_faculty(req_idx);
                let room_pool = problem.eligible_rooms(req_idx);
                let faculty = problem
                    .faculty_at(faculty_pool[rng.random_range(0..faculty_pool.len())])
                    .id
                    .clone();
                let room = problem
                    .room_at(room_pool[rng.random_range(0..room_pool.len())])
                    .id
                    .clone();
                let requirement = problem.requirement_at(req_idx).id.clone();
                chromosome.put_session(problem, day, period, &requirement, &faculty, &room);
            }
        }
    }
    if changed {
        chromosome.repair(problem);
    }
}
