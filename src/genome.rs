//! # Genome
//!
//! A `Genome` owns one timetable and shares the run's configuration. It memoizes
//! everything derived from the timetable (validity, student views, metrics) in a
//! `MetricCache`, and carries the per-generation bookkeeping of non-dominated
//! sorting (rank, crowding distance, domination count and dominated peers).
//!
//! The timetable of a genome changes only through [`Genome::mutate`], which also
//! clears the cache. Crossover never edits a genome; it builds a new one with
//! [`Genome::offspring`].
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genetic_timetable::genome::Genome;
//! use genetic_timetable::rng::RandomNumberGenerator;
//! use genetic_timetable::timetable::{Configuration, Course, Room};
//!
//! let config = Arc::new(
//!     Configuration::builder()
//!         .time_slots(0..15)
//!         .room(1, Room::new(-6.8915, 107.6107, 40))
//!         .room(2, Room::new(-6.8920, 107.6110, 80))
//!         .course(Course::new(1, 2, 2))
//!         .build()
//!         .unwrap(),
//! );
//!
//! let mut rng = RandomNumberGenerator::from_seed(7);
//! let genome = Genome::from_generator(config, &mut rng).unwrap();
//! assert!(genome.is_valid());
//! let [distance, size] = genome.objectives();
//! assert!(distance >= 0.0);
//! assert!(size == 40.0 || size == 80.0);
//! ```

use std::sync::Arc;

use crate::breeding::MutationOperator;
use crate::caching::MetricCache;
use crate::constraints::{ConstraintChecker, ConstraintViolation};
use crate::decomposition::ParallelClassDecomposer;
use crate::error::Result;
use crate::generator::Generator;
use crate::metrics::{self, Objectives, DISTANCE_SENTINEL, SIZE_SENTINEL};
use crate::rng::RandomNumberGenerator;
use crate::timetable::{Chromosome, Configuration};

/// One candidate timetable with its memoized metrics.
#[derive(Debug, Clone)]
pub struct Genome {
    chromosome: Chromosome,
    config: Arc<Configuration>,
    cache: MetricCache,
    rank: Option<usize>,
    crowding_distance: f64,
    domination_count: usize,
    dominated: Vec<usize>,
}

impl Genome {
    pub fn new(chromosome: Chromosome, config: Arc<Configuration>) -> Self {
        Self {
            chromosome,
            config,
            cache: MetricCache::new(),
            rank: None,
            crowding_distance: 0.0,
            domination_count: 0,
            dominated: Vec::new(),
        }
    }

    /// A genome holding a freshly generated timetable.
    pub fn from_generator(
        config: Arc<Configuration>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        let chromosome = Generator::new(&config).generate(rng)?;
        Ok(Self::new(chromosome, config))
    }

    /// A new genome with the same configuration holding `chromosome`.
    pub fn offspring(&self, chromosome: Chromosome) -> Self {
        Self::new(chromosome, Arc::clone(&self.config))
    }

    pub fn chromosome(&self) -> &Chromosome {
        &self.chromosome
    }

    pub fn into_chromosome(self) -> Chromosome {
        self.chromosome
    }

    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    /// Applies one mutation (all of the operator's points) and clears the cache.
    /// Returns the number of sessions moved.
    pub fn mutate(
        &mut self,
        operator: &MutationOperator<'_>,
        rng: &mut RandomNumberGenerator,
    ) -> usize {
        self.cache.clear();
        operator.mutate(&mut self.chromosome, rng)
    }

    /// Whether the timetable satisfies every constraint. Memoized.
    pub fn is_valid(&self) -> bool {
        self.cache
            .validity(|| ConstraintChecker::new(&self.config).is_valid(&self.chromosome))
    }

    /// The violations of the first failing check, recomputed on each call.
    pub fn violations(&self) -> Vec<ConstraintViolation> {
        ConstraintChecker::new(&self.config).validate(&self.chromosome)
    }

    /// Student views of the timetable. Memoized.
    pub fn decomposition(&self) -> &[Chromosome] {
        self.cache
            .decomposition(|| ParallelClassDecomposer::new(&self.config).decompose(&self.chromosome))
    }

    /// Mean distance between back-to-back classes across all student views, or the
    /// sentinel `1000.0` for an invalid timetable. Memoized.
    pub fn average_distance(&self) -> f64 {
        if !self.is_valid() {
            return DISTANCE_SENTINEL;
        }
        self.cache
            .average_distance(|| metrics::average_distance(self.decomposition(), &self.config))
    }

    /// Mean capacity of the rooms used by the first student view, or the sentinel
    /// `0.0` for an invalid timetable. Memoized.
    ///
    /// Only the first view is considered, not an average over all of them.
    pub fn average_size(&self) -> f64 {
        if !self.is_valid() {
            return SIZE_SENTINEL;
        }
        self.cache.average_size(|| {
            self.decomposition()
                .first()
                .map_or(0.0, |view| metrics::average_size(view, &self.config))
        })
    }

    /// Number of distinct rooms in use. Memoized.
    pub fn room_count(&self) -> usize {
        self.cache
            .room_count(|| metrics::room_count(&self.chromosome))
    }

    /// `[average distance (minimized), average size (maximized)]`.
    pub fn objectives(&self) -> Objectives {
        [self.average_distance(), self.average_size()]
    }

    /// Pareto front index from the last non-dominated sort.
    pub fn rank(&self) -> Option<usize> {
        self.rank
    }

    pub fn crowding_distance(&self) -> f64 {
        self.crowding_distance
    }

    pub fn domination_count(&self) -> usize {
        self.domination_count
    }

    /// Indices (into the last sorted pool) of the genomes this one dominates.
    pub fn dominated(&self) -> &[usize] {
        &self.dominated
    }

    pub(crate) fn reset_sorting_state(&mut self) {
        self.rank = None;
        self.crowding_distance = 0.0;
        self.domination_count = 0;
        self.dominated.clear();
    }

    pub(crate) fn set_sorting_state(
        &mut self,
        rank: Option<usize>,
        domination_count: usize,
        dominated: Vec<usize>,
    ) {
        self.rank = rank;
        self.domination_count = domination_count;
        self.dominated = dominated;
    }

    pub(crate) fn set_crowding_distance(&mut self, distance: f64) {
        self.crowding_distance = distance;
    }

    #[cfg(test)]
    pub(crate) fn cache_is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breeding::DEFAULT_MUTATION_POINTS;
    use crate::timetable::{Course, Room};

    fn config() -> Arc<Configuration> {
        Arc::new(
            Configuration::builder()
                .time_slots(0..15)
                .rooms((1..=7).map(|id| {
                    (
                        id,
                        Room::new(-6.89 + id as f64 * 0.001, 107.61, 20 + 10 * id),
                    )
                }))
                .courses(vec![
                    Course::new(1, 2, 2),
                    Course::new(2, 1, 2),
                    Course::new(3, 3, 1),
                ])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_invalid_genome_gets_sentinels() {
        let config = config();
        let genome = Genome::new(Chromosome::empty(15, 7), config);
        assert!(!genome.is_valid());
        assert!(!genome.violations().is_empty());
        assert_eq!(genome.objectives(), [DISTANCE_SENTINEL, SIZE_SENTINEL]);
    }

    #[test]
    fn test_generated_genome_metrics() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(31);
        let genome = Genome::from_generator(config, &mut rng).unwrap();

        assert!(genome.is_valid());
        assert_eq!(genome.decomposition().len(), 6);
        let [distance, size] = genome.objectives();
        assert!(distance >= 0.0 && distance < DISTANCE_SENTINEL);
        assert!(size >= 30.0 && size <= 90.0);
        assert!(genome.room_count() >= 3);
    }

    #[test]
    fn test_mutation_clears_cache() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut genome = Genome::from_generator(config.clone(), &mut rng).unwrap();
        genome.objectives();
        genome.room_count();
        assert!(!genome.cache_is_empty());

        let operator = MutationOperator::new(DEFAULT_MUTATION_POINTS, &config);
        genome.mutate(&operator, &mut rng);
        assert!(genome.cache_is_empty());
        assert!(genome.is_valid());
    }

    #[test]
    fn test_offspring_starts_fresh() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut parent = Genome::from_generator(config, &mut rng).unwrap();
        parent.set_sorting_state(Some(2), 1, vec![3]);
        parent.objectives();

        let child = parent.offspring(parent.chromosome().clone());
        assert_eq!(child.rank(), None);
        assert!(child.dominated().is_empty());
        assert!(child.cache_is_empty());
        assert!(Arc::ptr_eq(child.config(), parent.config()));
    }
}
