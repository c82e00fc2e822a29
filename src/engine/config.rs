//! Engine configuration.
//!
//! [`EngineConfig`] holds every parameter of one search run. Defaults
//! mirror the legacy configuration surface (population 50, crossover 0.7,
//! mutation 0.1).

use crate::error::ConfigurationError;
use crate::fitness::{ConstraintWeights, SoftRules};

/// Configuration for one timetable search run.
///
/// # Builder Pattern
///
/// ```
/// use u_timetable::engine::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_population_size(80)
///     .with_max_generations(200)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Number of candidate timetables per generation.
    pub population_size: usize,

    /// Maximum generations before termination.
    pub max_generations: usize,

    /// Probability of applying day-swap crossover to a parent pair.
    pub crossover_rate: f64,

    /// Per-gene mutation probability.
    pub mutation_rate: f64,

    /// Individuals carried unchanged into the next generation.
    pub elitism_count: usize,

    /// Generations without improvement before an early stop. Zero
    /// disables plateau termination.
    pub plateau_generations: usize,

    /// Tournament size for parent selection.
    pub tournament_size: usize,

    /// Whether to evaluate the population in parallel using rayon.
    pub parallel: bool,

    /// Random seed for reproducibility. `None` draws one from entropy.
    pub seed: Option<u64>,

    /// Optional wall-clock budget in milliseconds, checked at each
    /// generation boundary.
    pub time_limit_ms: Option<u64>,

    /// Penalty weights.
    pub weights: ConstraintWeights,

    /// Soft-rule toggles.
    pub rules: SoftRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            crossover_rate: 0.7,
            mutation_rate: 0.1,
            elitism_count: 2,
            plateau_generations: 15,
            tournament_size: 3,
            parallel: true,
            seed: None,
            time_limit_ms: None,
            weights: ConstraintWeights::default(),
            rules: SoftRules::default(),
        }
    }
}

impl EngineConfig {
    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the maximum number of generations.
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the per-gene mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate.clamp(0.0, 1.0);
        self
    }

    /// Sets the elite count.
    pub fn with_elitism_count(mut self, count: usize) -> Self {
        self.elitism_count = count;
        self
    }

    /// Sets the plateau window (0 disables early stopping).
    pub fn with_plateau_generations(mut self, generations: usize) -> Self {
        self.plateau_generations = generations;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Enables or disables parallel evaluation.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets the wall-clock budget in milliseconds.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Sets the penalty weights.
    pub fn with_weights(mut self, weights: ConstraintWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Sets the soft-rule toggles.
    pub fn with_rules(mut self, rules: SoftRules) -> Self {
        self.rules = rules;
        self
    }

    /// Preset for quick runs: small population, tight plateau window.
    pub fn fast() -> Self {
        Self {
            population_size: 20,
            max_generations: 40,
            plateau_generations: 8,
            time_limit_ms: Some(5_000),
            ..Self::default()
        }
    }

    /// Preset balancing quality and runtime.
    pub fn balanced() -> Self {
        Self {
            population_size: 50,
            max_generations: 100,
            plateau_generations: 15,
            time_limit_ms: Some(20_000),
            ..Self::default()
        }
    }

    /// Preset for quality: large population, generous budget.
    pub fn quality() -> Self {
        Self {
            population_size: 100,
            max_generations: 300,
            plateau_generations: 30,
            time_limit_ms: Some(60_000),
            ..Self::default()
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.population_size < 2 {
            return Err(ConfigurationError::parameter(
                "population_size must be at least 2",
            ));
        }
        if self.max_generations == 0 {
            return Err(ConfigurationError::parameter(
                "max_generations must be at least 1",
            ));
        }
        if self.elitism_count >= self.population_size {
            return Err(ConfigurationError::parameter(
                "elitism_count must be smaller than population_size",
            ));
        }
        if self.tournament_size == 0 {
            return Err(ConfigurationError::parameter(
                "tournament_size must be at least 1",
            ));
        }
        if self.time_limit_ms == Some(0) {
            return Err(ConfigurationError::parameter(
                "time_limit_ms must be positive or None",
            ));
        }
        Ok(())
    }
}
