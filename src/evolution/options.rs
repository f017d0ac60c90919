//! # EvolutionOptions
//!
//! The `EvolutionOptions` struct holds the run parameters of an evolutionary search over
//! timetables: how many generations to run, how large the population is, how often
//! parents are recombined and offspring mutated, and where snapshots are written.
//!
//! ## Example
//!
//! ```rust
//! use genetic_timetable::breeding::CrossoverMethod;
//! use genetic_timetable::evolution::options::EvolutionOptions;
//!
//! let options = EvolutionOptions::builder()
//!     .num_generations(50)
//!     .population_size(40)
//!     .crossover_rate(0.8)
//!     .mutation_rate(0.1)
//!     .crossover_method(CrossoverMethod::RowBased)
//!     .build();
//! assert!(options.validate().is_ok());
//!
//! let default_options = EvolutionOptions::default();
//! assert_eq!(default_options.get_population_size(), 100);
//! ```
//!
//! ## Fields
//!
//! - `num_generations`: Number of generations `run` performs.
//! - `population_size`: Size of the population; must be even and at least 2.
//! - `crossover_rate`: Probability that a parent pair is recombined.
//! - `mutation_rate`: Probability that an offspring is mutated.
//! - `mutation_points`: Relocation attempts per mutation.
//! - `crossover_method`: Axis along which parents are split.
//! - `evaluation_method`: Fitness used by tournament selection and the single-objective launcher.
//! - `parallel_threshold`: Minimum pool size for parallel evaluation and sorting.
//! - `snapshot_dir`: Directory that receives per-generation snapshots, if any.

use std::path::{Path, PathBuf};

use crate::breeding::{CrossoverMethod, DEFAULT_MUTATION_POINTS};
use crate::error::{GeneticError, Result};
use crate::selection::EvaluationMethod;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionOptions {
    num_generations: usize,
    population_size: usize,
    crossover_rate: f64,
    mutation_rate: f64,
    mutation_points: usize,
    crossover_method: CrossoverMethod,
    evaluation_method: EvaluationMethod,
    /// Minimum number of items to process in parallel
    parallel_threshold: usize,
    snapshot_dir: Option<PathBuf>,
}

impl EvolutionOptions {
    pub fn new(
        num_generations: usize,
        population_size: usize,
        crossover_rate: f64,
        mutation_rate: f64,
    ) -> Self {
        Self {
            num_generations,
            population_size,
            crossover_rate,
            mutation_rate,
            ..Self::default()
        }
    }

    /// Checks the parameters a run depends on.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::Configuration` if the population size is odd or below 2,
    /// or if either rate lies outside `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 2 || self.population_size % 2 != 0 {
            return Err(GeneticError::Configuration(format!(
                "Population size must be even and at least 2, got {}",
                self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.crossover_rate) {
            return Err(GeneticError::Configuration(format!(
                "Crossover rate must be within [0, 1], got {}",
                self.crossover_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(GeneticError::Configuration(format!(
                "Mutation rate must be within [0, 1], got {}",
                self.mutation_rate
            )));
        }
        Ok(())
    }

    pub fn get_num_generations(&self) -> usize {
        self.num_generations
    }

    pub fn get_population_size(&self) -> usize {
        self.population_size
    }

    pub fn get_crossover_rate(&self) -> f64 {
        self.crossover_rate
    }

    pub fn get_mutation_rate(&self) -> f64 {
        self.mutation_rate
    }

    pub fn get_mutation_points(&self) -> usize {
        self.mutation_points
    }

    pub fn get_crossover_method(&self) -> CrossoverMethod {
        self.crossover_method
    }

    pub fn get_evaluation_method(&self) -> EvaluationMethod {
        self.evaluation_method
    }

    /// Returns the minimum number of items to process in parallel.
    pub fn get_parallel_threshold(&self) -> usize {
        self.parallel_threshold
    }

    pub fn get_snapshot_dir(&self) -> Option<&Path> {
        self.snapshot_dir.as_deref()
    }

    /// Sets the number of generations.
    pub fn set_num_generations(&mut self, num_generations: usize) {
        self.num_generations = num_generations;
    }

    /// Sets the population size.
    pub fn set_population_size(&mut self, population_size: usize) {
        self.population_size = population_size;
    }

    pub fn set_crossover_rate(&mut self, rate: f64) {
        self.crossover_rate = rate;
    }

    pub fn set_mutation_rate(&mut self, rate: f64) {
        self.mutation_rate = rate;
    }

    /// Sets the parallel threshold.
    pub fn set_parallel_threshold(&mut self, threshold: usize) {
        self.parallel_threshold = threshold;
    }

    pub fn set_snapshot_dir(&mut self, dir: Option<PathBuf>) {
        self.snapshot_dir = dir;
    }

    /// Returns a builder for creating an `EvolutionOptions` instance.
    ///
    /// # Example
    ///
    /// ```rust
    /// use genetic_timetable::evolution::options::EvolutionOptions;
    /// use genetic_timetable::selection::EvaluationMethod;
    ///
    /// let options = EvolutionOptions::builder()
    ///     .population_size(20)
    ///     .evaluation_method(EvaluationMethod::RoomCount)
    ///     .parallel_threshold(500)
    ///     .snapshot_dir("snapshots")
    ///     .build();
    /// assert_eq!(options.get_parallel_threshold(), 500);
    /// ```
    pub fn builder() -> EvolutionOptionsBuilder {
        EvolutionOptionsBuilder::default()
    }
}

impl Default for EvolutionOptions {
    fn default() -> Self {
        Self {
            num_generations: 100,
            population_size: 100,
            crossover_rate: 0.7,
            mutation_rate: 0.2,
            mutation_points: DEFAULT_MUTATION_POINTS,
            crossover_method: CrossoverMethod::default(),
            evaluation_method: EvaluationMethod::default(),
            parallel_threshold: 64,
            snapshot_dir: None,
        }
    }
}

/// Builder for `EvolutionOptions`.
///
/// Unset fields take the values of `EvolutionOptions::default()`.
#[derive(Debug, Clone, Default)]
pub struct EvolutionOptionsBuilder {
    num_generations: Option<usize>,
    population_size: Option<usize>,
    crossover_rate: Option<f64>,
    mutation_rate: Option<f64>,
    mutation_points: Option<usize>,
    crossover_method: Option<CrossoverMethod>,
    evaluation_method: Option<EvaluationMethod>,
    parallel_threshold: Option<usize>,
    snapshot_dir: Option<PathBuf>,
}

impl EvolutionOptionsBuilder {
    /// Sets the number of generations.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = Some(value);
        self
    }

    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = Some(value);
        self
    }

    pub fn crossover_rate(mut self, value: f64) -> Self {
        self.crossover_rate = Some(value);
        self
    }

    pub fn mutation_rate(mut self, value: f64) -> Self {
        self.mutation_rate = Some(value);
        self
    }

    pub fn mutation_points(mut self, value: usize) -> Self {
        self.mutation_points = Some(value);
        self
    }

    pub fn crossover_method(mut self, value: CrossoverMethod) -> Self {
        self.crossover_method = Some(value);
        self
    }

    pub fn evaluation_method(mut self, value: EvaluationMethod) -> Self {
        self.evaluation_method = Some(value);
        self
    }

    /// Sets the parallel threshold.
    pub fn parallel_threshold(mut self, value: usize) -> Self {
        self.parallel_threshold = Some(value);
        self
    }

    pub fn snapshot_dir(mut self, value: impl Into<PathBuf>) -> Self {
        self.snapshot_dir = Some(value.into());
        self
    }

    /// Builds the `EvolutionOptions` instance.
    pub fn build(self) -> EvolutionOptions {
        let defaults = EvolutionOptions::default();
        EvolutionOptions {
            num_generations: self.num_generations.unwrap_or(defaults.num_generations),
            population_size: self.population_size.unwrap_or(defaults.population_size),
            crossover_rate: self.crossover_rate.unwrap_or(defaults.crossover_rate),
            mutation_rate: self.mutation_rate.unwrap_or(defaults.mutation_rate),
            mutation_points: self.mutation_points.unwrap_or(defaults.mutation_points),
            crossover_method: self.crossover_method.unwrap_or(defaults.crossover_method),
            evaluation_method: self
                .evaluation_method
                .unwrap_or(defaults.evaluation_method),
            parallel_threshold: self
                .parallel_threshold
                .unwrap_or(defaults.parallel_threshold),
            snapshot_dir: self.snapshot_dir,
        }
    }
}
