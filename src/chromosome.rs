//! Candidate timetable encoding.
//!
//! A [`Chromosome`] is the full `5 × |periods|` grid of [`Gene`]s for one
//! batch — one candidate weekly timetable. Break cells and pinned cells
//! are written once at construction and never touched by seeding, repair
//! or the genetic operators.
//!
//! Session genes carry a `placed` insertion stamp from a per-chromosome
//! clock; the repair pass uses it to drop excess occurrences
//! oldest-inserted-first. Repair itself draws no randomness, which makes
//! it idempotent and keeps the whole run reproducible from the one seed.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::model::{Day, Timetable, TimetableDay, TimetableEntry, TimetableSlot};
use crate::problem::TimetableProblem;

/// One occupied teaching cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionGene {
    /// Requirement occupying the cell.
    pub requirement_id: String,
    /// Assigned faculty.
    pub faculty_id: String,
    /// Assigned room.
    pub room_id: String,
    /// Insertion stamp; 0 for pinned cells.
    pub placed: u64,
}

impl SessionGene {
    /// Whether two genes assign the same requirement, faculty and room,
    /// regardless of when they were inserted.
    pub fn same_assignment(&self, other: &SessionGene) -> bool {
        self.requirement_id == other.requirement_id
            && self.faculty_id == other.faculty_id
            && self.room_id == other.room_id
    }
}

/// One `(day, period)` cell of a candidate timetable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gene {
    /// Unassigned teaching slot.
    Free,
    /// Break slot.
    Break,
    /// Occupied teaching slot.
    Session(SessionGene),
}

impl Gene {
    /// The session occupying this cell, if any.
    pub fn session(&self) -> Option<&SessionGene> {
        match self {
            Gene::Session(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the cell is unassigned.
    pub fn is_free(&self) -> bool {
        matches!(self, Gene::Free)
    }
}

/// One placed occurrence of a requirement: a block of contiguous cells
/// within a single day.
///
/// Runs of same-requirement cells are chunked into blocks of the
/// requirement's `duration_periods`; a trailing short chunk is still an
/// occurrence, flagged incomplete for the contiguity penalty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    /// Requirement position in the catalog.
    pub requirement: usize,
    /// Day index.
    pub day: usize,
    /// First period of the block.
    pub start_period: usize,
    /// Cells in the block.
    pub len: usize,
    /// Oldest insertion stamp in the block.
    pub placed: u64,
    /// Whether any cell of the block is pinned.
    pub pinned: bool,
    /// Faculty of the block's first cell.
    pub faculty_id: String,
    /// Room of the block's first cell.
    pub room_id: String,
}

impl Occurrence {
    /// Last period of the block (inclusive).
    pub fn end_period(&self) -> usize {
        self.start_period + self.len - 1
    }
}

/// One candidate weekly timetable for a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Chromosome {
    pub(crate) genes: Vec<Gene>,
    periods_per_day: usize,
    clock: u64,
    /// Cached fitness in `[0, 1000]`; `NEG_INFINITY` until evaluated.
    pub fitness: f64,
    /// Cached hard-violation total from the last evaluation.
    pub hard_violations: u32,
}

impl Chromosome {
    /// A grid with breaks and pinned cells applied and every other cell free.
    pub(crate) fn blank(problem: &TimetableProblem) -> Self {
        let periods = problem.periods();
        let mut genes = Vec::with_capacity(Day::COUNT * periods);
        for _ in 0..Day::COUNT {
            for p in 0..periods {
                genes.push(if problem.grid.is_break(p) {
                    Gene::Break
                } else {
                    Gene::Free
                });
            }
        }
        let mut chromosome = Self {
            genes,
            periods_per_day: periods,
            clock: 1,
            fitness: f64::NEG_INFINITY,
            hard_violations: 0,
        };
        for fx in &problem.catalog.fixed {
            let cell = problem.cell(fx.day.index(), fx.period);
            chromosome.genes[cell] = Gene::Session(SessionGene {
                requirement_id: fx.requirement_id.clone(),
                faculty_id: fx.faculty_id.clone(),
                room_id: fx.room_id.clone(),
                placed: 0,
            });
        }
        chromosome
    }

    /// Seeds a random candidate.
    ///
    /// Each requirement gets its full weekly frequency of occurrences
    /// (minus any pinned ones), placed into free non-break blocks. Day
    /// choice is biased — preferred days weigh 4.0, the avoid day 0.25,
    /// everything else 1.0 — but never excluded outright. Faculty and
    /// room are drawn uniformly from the eligible sets.
    pub fn seed<R: Rng>(problem: &TimetableProblem, rng: &mut R) -> Self {
        let mut chromosome = Self::blank(problem);
        for req_idx in 0..problem.catalog.requirements.len() {
            let req = problem.requirement_at(req_idx);
            let existing = chromosome.occurrence_count(problem, req_idx);
            for _ in existing..req.weekly_frequency {
                let windows = chromosome.free_windows(problem, req_idx);
                if windows.is_empty() {
                    break;
                }
                let weights: Vec<f64> = windows
                    .iter()
                    .map(|&(day, _)| day_weight(req, day))
                    .collect();
                let (day, start) = windows[weighted_choice(&weights, rng)];

                let eligible = problem.eligible_faculty(req_idx);
                let available: Vec<usize> = eligible
                    .iter()
                    .copied()
                    .filter(|&fi| {
                        let f = problem.faculty_at(fi);
                        (start..start + req.duration_periods)
                            .all(|p| !problem.faculty_unavailable(&f.id, day, p))
                    })
                    .collect();
                let pool: &[usize] = if available.is_empty() {
                    eligible
                } else {
                    &available
                };
                let faculty_id = problem
                    .faculty_at(*pool.choose(rng).expect("eligible faculty is non-empty"))
                    .id
                    .clone();
                let room_id = problem
                    .room_at(
                        *problem
                            .eligible_rooms(req_idx)
                            .choose(rng)
                            .expect("eligible rooms are non-empty"),
                    )
                    .id
                    .clone();
                chromosome.place_block(problem, day, start, req_idx, &faculty_id, &room_id);
            }
        }
        chromosome
    }

    /// All genes, day-major.
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }

    /// Gene at a slot.
    pub fn gene(&self, day: usize, period: usize) -> &Gene {
        &self.genes[day * self.periods_per_day + period]
    }

    /// Periods per day.
    pub fn periods_per_day(&self) -> usize {
        self.periods_per_day
    }

    fn touch(&mut self) {
        self.fitness = f64::NEG_INFINITY;
        self.hard_violations = 0;
    }

    /// Clears a non-break, non-pinned cell.
    pub(crate) fn clear_cell(&mut self, problem: &TimetableProblem, day: usize, period: usize) {
        debug_assert!(!problem.grid.is_break(period));
        debug_assert!(!problem.is_fixed(day, period));
        self.genes[problem.cell(day, period)] = Gene::Free;
        self.touch();
    }

    /// Writes a single session cell with a fresh insertion stamp.
    pub(crate) fn put_session(
        &mut self,
        problem: &TimetableProblem,
        day: usize,
        period: usize,
        requirement_id: &str,
        faculty_id: &str,
        room_id: &str,
    ) {
        debug_assert!(!problem.grid.is_break(period));
        debug_assert!(!problem.is_fixed(day, period));
        let stamp = self.clock;
        self.clock += 1;
        self.genes[problem.cell(day, period)] = Gene::Session(SessionGene {
            requirement_id: requirement_id.to_string(),
            faculty_id: faculty_id.to_string(),
            room_id: room_id.to_string(),
            placed: stamp,
        });
        self.touch();
    }

    /// Exchanges one day's row between two chromosomes.
    pub(crate) fn swap_day_rows(a: &mut Chromosome, b: &mut Chromosome, day: usize) {
        debug_assert_eq!(a.periods_per_day, b.periods_per_day);
        let from = day * a.periods_per_day;
        let to = from + a.periods_per_day;
        for cell in from..to {
            std::mem::swap(&mut a.genes[cell], &mut b.genes[cell]);
        }
        // Stamps from either parent must stay younger than anything the
        // children insert later.
        let clock = a.clock.max(b.clock);
        a.clock = clock;
        b.clock = clock;
        a.touch();
        b.touch();
    }

    fn place_block(
        &mut self,
        problem: &TimetableProblem,
        day: usize,
        start: usize,
        requirement: usize,
        faculty_id: &str,
        room_id: &str,
    ) {
        let req = problem.requirement_at(requirement);
        let stamp = self.clock;
        self.clock += 1;
        for period in start..start + req.duration_periods {
            self.genes[problem.cell(day, period)] = Gene::Session(SessionGene {
                requirement_id: req.id.clone(),
                faculty_id: faculty_id.to_string(),
                room_id: room_id.to_string(),
                placed: stamp,
            });
        }
        self.touch();
    }

    /// Collects all placed occurrences, scanning the week in day/period
    /// order.
    pub fn occurrences(&self, problem: &TimetableProblem) -> Vec<Occurrence> {
        let mut out = Vec::new();
        let periods = self.periods_per_day;
        for day in 0..Day::COUNT {
            let mut p = 0;
            while p < periods {
                let Some(first) = self.gene(day, p).session() else {
                    p += 1;
                    continue;
                };
                let requirement_id = first.requirement_id.clone();
                let mut q = p;
                while q + 1 < periods
                    && self
                        .gene(day, q + 1)
                        .session()
                        .is_some_and(|g| g.requirement_id == requirement_id)
                {
                    q += 1;
                }
                let requirement = problem
                    .requirement_index(&requirement_id)
                    .expect("genes only reference catalog requirements");
                let duration = problem.requirement_at(requirement).duration_periods;
                let mut chunk = p;
                while chunk <= q {
                    let len = duration.min(q - chunk + 1);
                    let cells: Vec<&SessionGene> = (chunk..chunk + len)
                        .map(|period| self.gene(day, period).session().expect("run cell"))
                        .collect();
                    out.push(Occurrence {
                        requirement,
                        day,
                        start_period: chunk,
                        len,
                        placed: cells.iter().map(|g| g.placed).min().unwrap_or(0),
                        pinned: (chunk..chunk + len).any(|period| problem.is_fixed(day, period)),
                        faculty_id: cells[0].faculty_id.clone(),
                        room_id: cells[0].room_id.clone(),
                    });
                    chunk += len;
                }
                p = q + 1;
            }
        }
        out
    }

    /// Number of occurrences of one requirement across the week.
    pub fn occurrence_count(&self, problem: &TimetableProblem, requirement: usize) -> usize {
        self.occurrences(problem)
            .iter()
            .filter(|o| o.requirement == requirement)
            .count()
    }

    /// Restores the exact-weekly-frequency invariant.
    ///
    /// Excess occurrences are removed oldest-inserted first (pinned ones
    /// never); missing occurrences are inserted into the least-violating
    /// free block, ties broken by scan order. Draws no randomness, never
    /// touches break or pinned cells, and is a no-op on a chromosome
    /// whose counts are already exact.
    pub fn repair(&mut self, problem: &TimetableProblem) {
        let mut changed = false;

        for req_idx in 0..problem.catalog.requirements.len() {
            let frequency = problem.requirement_at(req_idx).weekly_frequency;
            loop {
                let mut occs: Vec<Occurrence> = self
                    .occurrences(problem)
                    .into_iter()
                    .filter(|o| o.requirement == req_idx)
                    .collect();
                if occs.len() <= frequency {
                    break;
                }
                occs.retain(|o| !o.pinned);
                let Some(victim) = occs.iter().min_by_key(|o| o.placed).cloned() else {
                    break;
                };
                for period in victim.start_period..victim.start_period + victim.len {
                    self.genes[problem.cell(victim.day, period)] = Gene::Free;
                }
                changed = true;
            }
        }

        for req_idx in 0..problem.catalog.requirements.len() {
            let frequency = problem.requirement_at(req_idx).weekly_frequency;
            while self.occurrence_count(problem, req_idx) < frequency {
                let Some((day, start)) = self.best_window(problem, req_idx) else {
                    break;
                };
                let (faculty_id, room_id) = self.pick_staff(problem, req_idx, day, start);
                self.place_block(problem, day, start, req_idx, &faculty_id, &room_id);
                changed = true;
            }
        }

        if changed {
            self.touch();
        }
    }

    /// All free blocks that could hold one occurrence of a requirement.
    fn free_windows(&self, problem: &TimetableProblem, requirement: usize) -> Vec<(usize, usize)> {
        let duration = problem.requirement_at(requirement).duration_periods;
        let periods = self.periods_per_day;
        let mut windows = Vec::new();
        if duration > periods {
            return windows;
        }
        for day in 0..Day::COUNT {
            for start in 0..=periods - duration {
                let fits = (start..start + duration).all(|p| {
                    !problem.grid.is_break(p) && self.gene(day, p).is_free()
                });
                if fits {
                    windows.push((day, start));
                }
            }
        }
        windows
    }

    /// The least-violating free block for a requirement, or `None` when
    /// nothing fits.
    fn best_window(&self, problem: &TimetableProblem, requirement: usize) -> Option<(usize, usize)> {
        let req = problem.requirement_at(requirement);
        let subject_id = req.subject_id.clone();
        let duration = req.duration_periods;
        let mut best: Option<((usize, usize), f64)> = None;
        for (day, start) in self.free_windows(problem, requirement) {
            let mut score = 0.0;
            if req.avoid_day.is_some_and(|d| d.index() == day) {
                score += 4.0;
            }
            if req.preferred_days.iter().any(|d| d.index() == day) {
                score -= 1.0;
            }
            let neighbors = [start.checked_sub(1), Some(start + duration)];
            for neighbor in neighbors.into_iter().flatten() {
                if neighbor >= self.periods_per_day {
                    continue;
                }
                let same_subject = self.gene(day, neighbor).session().is_some_and(|g| {
                    problem
                        .requirement_index(&g.requirement_id)
                        .map(|i| problem.requirement_at(i).subject_id == subject_id)
                        .unwrap_or(false)
                });
                if same_subject {
                    score += 2.0;
                }
            }
            if best.as_ref().is_none_or(|&(_, b)| score < b) {
                best = Some(((day, start), score));
            }
        }
        best.map(|(window, _)| window)
    }

    /// Deterministic faculty/room choice for a repair insertion: the
    /// least-loaded qualified faculty available over the block, the
    /// least-used eligible room, catalog order on ties.
    fn pick_staff(
        &self,
        problem: &TimetableProblem,
        requirement: usize,
        day: usize,
        start: usize,
    ) -> (String, String) {
        let req = problem.requirement_at(requirement);
        let occs = self.occurrences(problem);

        let eligible = problem.eligible_faculty(requirement);
        let available: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&fi| {
                let f = problem.faculty_at(fi);
                (start..start + req.duration_periods)
                    .all(|p| !problem.faculty_unavailable(&f.id, day, p))
            })
            .collect();
        let pool: &[usize] = if available.is_empty() {
            eligible
        } else {
            &available
        };
        let faculty = pool
            .iter()
            .copied()
            .min_by_key(|&fi| {
                let id = &problem.faculty_at(fi).id;
                occs.iter().filter(|o| &o.faculty_id == id).count()
            })
            .expect("eligible faculty is non-empty");

        let room = problem
            .eligible_rooms(requirement)
            .iter()
            .copied()
            .min_by_key(|&ri| {
                let id = &problem.room_at(ri).id;
                occs.iter().filter(|o| &o.room_id == id).count()
            })
            .expect("eligible rooms are non-empty");

        (
            problem.faculty_at(faculty).id.clone(),
            problem.room_at(room).id.clone(),
        )
    }

    /// Renders the chromosome as the serializable output view.
    pub fn to_timetable(&self, problem: &TimetableProblem) -> Timetable {
        let mut days = Vec::with_capacity(Day::COUNT);
        for day in Day::ALL {
            let mut slots = Vec::with_capacity(self.periods_per_day);
            for (period_idx, period) in problem.grid.periods().iter().enumerate() {
                let entry = match self.gene(day.index(), period_idx) {
                    Gene::Break => TimetableEntry::Break {
                        label: period.label.clone(),
                    },
                    Gene::Free => TimetableEntry::Free,
                    Gene::Session(gene) => {
                        let requirement = problem
                            .requirement_index(&gene.requirement_id)
                            .map(|i| problem.requirement_at(i));
                        let subject = requirement.map(|r| problem.subject_of(r));
                        let faculty = problem
                            .faculty_index(&gene.faculty_id)
                            .map(|i| problem.faculty_at(i).name.clone())
                            .unwrap_or_else(|| gene.faculty_id.clone());
                        let room = problem
                            .room_index(&gene.room_id)
                            .map(|i| {
                                let r = problem.room_at(i);
                                if r.name.is_empty() {
                                    r.id.clone()
                                } else {
                                    r.name.clone()
                                }
                            })
                            .unwrap_or_else(|| gene.room_id.clone());
                        TimetableEntry::Session {
                            subject_code: subject
                                .map(|s| s.code.clone())
                                .unwrap_or_else(|| gene.requirement_id.clone()),
                            subject_name: subject.map(|s| s.name.clone()).unwrap_or_default(),
                            session_type: requirement
                                .map(|r| r.session_type)
                                .unwrap_or(crate::model::SessionType::Theory),
                            faculty,
                            room,
                        }
                    }
                };
                slots.push(TimetableSlot {
                    period: period_idx,
                    start: period.start(),
                    end: period.end(),
                    entry,
                });
            }
            days.push(TimetableDay { day, slots });
        }
        Timetable {
            batch: problem.catalog.batch.name.clone(),
            days,
        }
    }
}

fn day_weight(req: &crate::model::SessionRequirement, day: usize) -> f64 {
    if req.avoid_day.is_some_and(|d| d.index() == day) {
        0.25
    } else if req.preferred_days.iter().any(|d| d.index() == day) {
        4.0
    } else {
        1.0
    }
}

/// Cumulative-weight sampling, the same walk the roulette selector uses.
fn weighted_choice<R: Rng>(weights: &[f64], rng: &mut R) -> usize {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return 0;
    }
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }
    weights.len() - 1
}
