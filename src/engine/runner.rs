//! Search driver.
//!
//! [`TimetableEngine`] orchestrates the evolutionary loop:
//! seeding → evaluation → termination check → selection/breeding → repeat.
//! Elites carry over unchanged, so the tracked best-of-run fitness never
//! decreases. Every stochastic decision draws from one driver-owned RNG
//! seeded from the configuration, making a run reproducible bit-for-bit;
//! evaluation is the only parallel stage and consumes no randomness.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::EngineConfig;
use super::operators::{day_swap_crossover, mutate_genes};
use super::selection::{rank_indices, tournament};
use crate::chromosome::Chromosome;
use crate::error::ConfigurationError;
use crate::fitness::{Evaluator, ViolationCounts};
use crate::model::{Catalog, TimeGrid, Timetable};
use crate::problem::TimetableProblem;

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// The generation budget ran out.
    Exhausted,
    /// No improvement for the configured plateau window.
    Plateau,
    /// External cancellation or the wall-clock deadline.
    Cancelled,
}

/// Result of a timetable search run.
#[derive(Debug, Clone)]
pub struct TimetableResult {
    /// The best chromosome ever observed.
    pub best: Chromosome,
    /// Rendered output view of the best chromosome.
    pub timetable: Timetable,
    /// Fitness of the best chromosome, in `[0, 1000]`.
    pub fitness: f64,
    /// Violation breakdown of the best chromosome.
    pub violations: ViolationCounts,
    /// Generation at which the best was first observed (0 = seeding).
    pub best_generation: usize,
    /// Generations executed.
    pub generations: usize,
    /// Why the run stopped.
    pub termination: Termination,
    /// True when required periods exceed weekly capacity, or hard
    /// violations remain at termination. A warning, not an error: the
    /// best-effort candidate is still returned.
    pub infeasible: bool,
    /// Best-so-far fitness after seeding and after each generation.
    pub fitness_history: Vec<f64>,
}

impl TimetableResult {
    /// Fitness as a percentage, for parity with the legacy score display.
    pub fn fitness_percent(&self) -> f64 {
        self.fitness / 10.0
    }
}

/// Runs the evolutionary timetable search.
///
/// # Usage
///
/// ```no_run
/// use u_timetable::engine::{EngineConfig, TimetableEngine};
/// use u_timetable::model::{Batch, Catalog, TimeGrid};
///
/// let grid = TimeGrid::standard();
/// let catalog = Catalog::new(Batch::new("b1", "ECE 3rd Sem A"));
/// let config = EngineConfig::default().with_seed(42);
/// let result = TimetableEngine::run(&catalog, &grid, &config).unwrap();
/// println!("fitness {:.1}%", result.fitness_percent());
/// ```
pub struct TimetableEngine;

impl TimetableEngine {
    /// Runs the search to termination.
    pub fn run(
        catalog: &Catalog,
        grid: &TimeGrid,
        config: &EngineConfig,
    ) -> Result<TimetableResult, ConfigurationError> {
        Self::run_with_cancel(catalog, grid, config, None)
    }

    /// Runs the search with an optional cancellation token.
    ///
    /// The flag is checked at each generation boundary; once set, the
    /// run stops after the current evaluation and returns the best
    /// candidate found so far.
    pub fn run_with_cancel(
        catalog: &Catalog,
        grid: &TimeGrid,
        config: &EngineConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<TimetableResult, ConfigurationError> {
        config.validate()?;
        let problem = TimetableProblem::new(catalog, grid)?;
        let evaluator = Evaluator::new(&problem, config.weights.clone(), config.rules.clone());
        let mut rng = StdRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));
        let deadline = config
            .time_limit_ms
            .map(|ms| Instant::now() + Duration::from_millis(ms));

        let mut population: Vec<Chromosome> = (0..config.population_size)
            .map(|_| Chromosome::seed(&problem, &mut rng))
            .collect();
        evaluate_population(&evaluator, &mut population, config.parallel);

        let mut best = population[rank_indices(&population)[0]].clone();
        let mut best_generation = 0usize;
        let mut fitness_history = Vec::with_capacity(config.max_generations + 1);
        fitness_history.push(best.fitness);

        // Over-capacity catalogs can never satisfy every frequency, so
        // searching the generation budget away is pointless. Return the
        // seeded best immediately, flagged infeasible.
        if problem.over_capacity() {
            return Ok(finish(
                best,
                &problem,
                &evaluator,
                0,
                best_generation,
                Termination::Exhausted,
                true,
                fitness_history,
            ));
        }

        let mut stagnation = 0usize;
        let mut termination = Termination::Exhausted;
        let mut generations = 0usize;

        for gen in 1..=config.max_generations {
            if cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                termination = Termination::Cancelled;
                break;
            }
            if deadline.is_some_and(|d| Instant::now() >= d) {
                termination = Termination::Cancelled;
                break;
            }

            // Elites first, then tournament offspring.
            let ranked = rank_indices(&population);
            let mut next: Vec<Chromosome> = ranked
                .iter()
                .take(config.elitism_count)
                .map(|&i| population[i].clone())
                .collect();

            while next.len() < config.population_size {
                let p1 = tournament(&population, config.tournament_size, &mut rng);
                let p2 = tournament(&population, config.tournament_size, &mut rng);

                let mut children = if rng.random_range(0.0..1.0) < config.crossover_rate {
                    let (c1, c2) =
                        day_swap_crossover(&population[p1], &population[p2], &problem, &mut rng);
                    vec![c1, c2]
                } else {
                    vec![population[p1].clone()]
                };

                for child in &mut children {
                    mutate_genes(child, &problem, config.mutation_rate, &mut rng);
                }
                for child in children {
                    if next.len() < config.population_size {
                        next.push(child);
                    }
                }
            }

            evaluate_population(&evaluator, &mut next, config.parallel);
            population = next;
            generations = gen;

            let gen_best = rank_indices(&population)[0];
            if population[gen_best].fitness > best.fitness {
                best = population[gen_best].clone();
                best_generation = gen;
                stagnation = 0;
            } else {
                stagnation += 1;
            }
            fitness_history.push(best.fitness);

            if config.plateau_generations > 0 && stagnation >= config.plateau_generations {
                termination = Termination::Plateau;
                break;
            }
        }

        Ok(finish(
            best,
            &problem,
            &evaluator,
            generations,
            best_generation,
            termination,
            false,
            fitness_history,
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn finish(
    best: Chromosome,
    problem: &TimetableProblem,
    evaluator: &Evaluator<'_>,
    generations: usize,
    best_generation: usize,
    termination: Termination,
    over_capacity: bool,
    fitness_history: Vec<f64>,
) -> TimetableResult {
    let (fitness, violations) = evaluator.evaluate(&best);
    let infeasible = over_capacity || violations.hard_total() > 0;
    let timetable = best.to_timetable(problem);
    TimetableResult {
        best,
        timetable,
        fitness,
        violations,
        best_generation,
        generations,
        termination,
        infeasible,
        fitness_history,
    }
}

/// Scores every unevaluated individual; elites and untouched clones keep
/// their cached fitness.
fn evaluate_population(evaluator: &Evaluator<'_>, population: &mut [Chromosome], parallel: bool) {
    let score = |chromosome: &mut Chromosome| {
        if chromosome.fitness == f64::NEG_INFINITY {
            let (fitness, counts) = evaluator.evaluate(chromosome);
            chromosome.fitness = fitness;
            chromosome.hard_violations = counts.hard_total();
        }
    };
    if parallel {
        population.par_iter_mut().for_each(score);
    } else {
        population.iter_mut().for_each(score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Batch, Day, Faculty, FixedAssignment, Room, RoomType, SessionRequirement, SessionType,
        Subject, TimetableEntry,
    };

    /// Five requirements (one lab of duration 2 × frequency 2) against
    /// the standard 8 + 3 grid.
    fn scenario_catalog() -> Catalog {
        Catalog::new(Batch::new("b-ece3a", "ECE 3rd Sem A").with_strength(60))
            .with_subject(Subject::new("s-emf", "U24EC311", "Electromagnetic Fields").heavy())
            .with_subject(Subject::new("s-sig", "U24EC323", "Signals and Systems").heavy())
            .with_subject(Subject::new("s-apt", "APTITUDE", "Aptitude & Communication"))
            .with_requirement(
                SessionRequirement::new("r-emf-th", "s-emf", SessionType::Theory)
                    .with_frequency(3)
                    .with_preferred_days([Day::Monday, Day::Wednesday]),
            )
            .with_requirement(
                SessionRequirement::new("r-sig-th", "s-sig", SessionType::Theory)
                    .with_frequency(3),
            )
            .with_requirement(
                SessionRequirement::new("r-sig-lab", "s-sig", SessionType::Lab)
                    .with_duration(2)
                    .with_frequency(2)
                    .with_avoid_day(Day::Friday),
            )
            .with_requirement(
                SessionRequirement::new("r-emf-tut", "s-emf", SessionType::Tutorial)
                    .with_frequency(1),
            )
            .with_requirement(
                SessionRequirement::new("r-apt", "s-apt", SessionType::Special).with_frequency(1),
            )
            .with_faculty(
                Faculty::new("f-asra", "Ms.H.Asra Jabeen")
                    .with_max_weekly_load(6)
                    .qualified_for("r-emf-th")
                    .qualified_for("r-emf-tut")
                    .qualified_for("r-apt"),
            )
            .with_faculty(
                Faculty::new("f-rubitha", "Ms.K.Rubitha")
                    .with_max_weekly_load(6)
                    .qualified_for("r-sig-th")
                    .qualified_for("r-sig-lab"),
            )
            .with_room(Room::new("rm-201", RoomType::Theory).with_capacity(60))
            .with_room(Room::new("rm-202", RoomType::Theory).with_capacity(60))
            .with_room(Room::new("lab-1", RoomType::Lab).with_capacity(60))
            .with_room(Room::new("hall-1", RoomType::Common).with_capacity(120))
    }

    fn scenario_config() -> EngineConfig {
        EngineConfig::default()
            .with_population_size(20)
            .with_max_generations(30)
            .with_plateau_generations(0)
            .with_seed(42)
            .with_parallel(false)
    }

    #[test]
    fn test_scenario_reaches_zero_hard_violations() {
        let grid = TimeGrid::standard();
        let result = TimetableEngine::run(&scenario_catalog(), &grid, &scenario_config()).unwrap();

        assert_eq!(result.violations.hard_total(), 0, "{:?}", result.violations);
        assert!(!result.infeasible);
        assert_eq!(result.termination, Termination::Exhausted);
        assert_eq!(result.generations, 30);
        assert!(result.fitness > 0.0);
        assert!(result.fitness_percent() <= 100.0);
        // 3 + 3 + 2×2 + 1 + 1 occupied cells.
        assert_eq!(result.timetable.session_count(), 12);
    }

    #[test]
    fn test_determinism_same_seed_same_result() {
        let grid = TimeGrid::standard();
        let catalog = scenario_catalog();
        let config = scenario_config();

        let a = TimetableEngine::run(&catalog, &grid, &config).unwrap();
        let b = TimetableEngine::run(&catalog, &grid, &config).unwrap();

        assert_eq!(a.best.genes(), b.best.genes());
        assert!((a.fitness - b.fitness).abs() < 1e-10);
        assert_eq!(a.best_generation, b.best_generation);
        assert_eq!(a.fitness_history, b.fitness_history);
    }

    #[test]
    fn test_parallel_evaluation_matches_sequential() {
        // Evaluation draws no randomness, so threading must not change
        // the outcome.
        let grid = TimeGrid::standard();
        let catalog = scenario_catalog();

        let sequential =
            TimetableEngine::run(&catalog, &grid, &scenario_config().with_parallel(false)).unwrap();
        let parallel =
            TimetableEngine::run(&catalog, &grid, &scenario_config().with_parallel(true)).unwrap();

        assert_eq!(sequential.best.genes(), parallel.best.genes());
        assert!((sequential.fitness - parallel.fitness).abs() < 1e-10);
    }

    #[test]
    fn test_best_fitness_is_monotone() {
        let grid = TimeGrid::standard();
        let result = TimetableEngine::run(&scenario_catalog(), &grid, &scenario_config()).unwrap();

        assert_eq!(result.fitness_history.len(), result.generations + 1);
        for window in result.fitness_history.windows(2) {
            assert!(
                window[1] >= window[0],
                "best-of-run fitness decreased: {} -> {}",
                window[0],
                window[1]
            );
        }
    }

    #[test]
    fn test_over_capacity_fails_fast() {
        let grid = TimeGrid::standard();
        let mut catalog = scenario_catalog();
        // 35 theory occurrences push the total to 44 against 40 slots.
        catalog.requirements[0].weekly_frequency = 35;

        let result = TimetableEngine::run(&catalog, &grid, &scenario_config()).unwrap();
        assert!(result.infeasible);
        assert_eq!(result.generations, 0);
        assert!(result.violations.hard_total() > 0);
        assert!(result.fitness_history.len() == 1);
    }

    #[test]
    fn test_fixed_assignment_survives_the_run() {
        let grid = TimeGrid::standard();
        let catalog = scenario_catalog().with_fixed(FixedAssignment::new(
            Day::Monday,
            3,
            "r-emf-th",
            "f-asra",
            "rm-201",
        ));

        let result = TimetableEngine::run(&catalog, &grid, &scenario_config()).unwrap();
        let gene = result.best.gene(Day::Monday.index(), 3).session().unwrap();
        assert_eq!(gene.requirement_id, "r-emf-th");
        assert_eq!(gene.faculty_id, "f-asra");
        assert_eq!(gene.room_id, "rm-201");

        match result.timetable.entry(Day::Monday, 3).unwrap() {
            TimetableEntry::Session { subject_code, .. } => assert_eq!(subject_code, "U24EC311"),
            other => panic!("expected pinned session, got {other:?}"),
        }
    }

    #[test]
    fn test_cancellation_returns_best_so_far() {
        let grid = TimeGrid::standard();
        let cancel = Arc::new(AtomicBool::new(true));

        let result = TimetableEngine::run_with_cancel(
            &scenario_catalog(),
            &grid,
            &scenario_config().with_max_generations(10_000),
            Some(cancel),
        )
        .unwrap();

        assert_eq!(result.termination, Termination::Cancelled);
        assert_eq!(result.generations, 0);
        assert!(result.fitness > 0.0);
    }

    #[test]
    fn test_deadline_stops_the_run() {
        let grid = TimeGrid::standard();
        let config = scenario_config()
            .with_max_generations(1_000_000)
            .with_time_limit_ms(1);

        let result = TimetableEngine::run(&scenario_catalog(), &grid, &config).unwrap();
        assert_eq!(result.termination, Termination::Cancelled);
        assert!(result.generations < 1_000_000);
    }

    #[test]
    fn test_plateau_terminates_early() {
        let grid = TimeGrid::standard();
        let config = EngineConfig::default()
            .with_population_size(10)
            .with_max_generations(500)
            .with_plateau_generations(5)
            .with_seed(42)
            .with_parallel(false);

        let result = TimetableEngine::run(&scenario_catalog(), &grid, &config).unwrap();
        assert_eq!(result.termination, Termination::Plateau);
        assert!(result.generations < 500);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let grid = TimeGrid::standard();
        let config = EngineConfig::default().with_population_size(1);
        assert!(TimetableEngine::run(&scenario_catalog(), &grid, &config).is_err());
    }

    #[test]
    fn test_invalid_catalog_is_rejected() {
        let grid = TimeGrid::standard();
        let mut catalog = scenario_catalog();
        catalog.rooms.clear();
        assert!(TimetableEngine::run(&catalog, &grid, &scenario_config()).is_err());
    }
}
