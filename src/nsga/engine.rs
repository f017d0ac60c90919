//! # NSGA-II Engine
//!
//! Generational multi-objective search over timetables. Each generation breeds one
//! offspring per parent, merges parents and offspring, drops duplicate timetables,
//! and keeps the best `population_size` genomes by Pareto rank and crowding
//! distance.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genetic_timetable::evolution::options::EvolutionOptions;
//! use genetic_timetable::nsga::Nsga2;
//! use genetic_timetable::rng::RandomNumberGenerator;
//! use genetic_timetable::timetable::{Configuration, Course, Room};
//!
//! let config = Arc::new(
//!     Configuration::builder()
//!         .time_slots(0..15)
//!         .rooms((1..=7).map(|id| (id, Room::new(-6.89 + id as f64 * 1e-3, 107.61, 20 * id))))
//!         .courses(vec![Course::new(1, 2, 2), Course::new(2, 1, 1), Course::new(3, 3, 2)])
//!         .build()
//!         .unwrap(),
//! );
//! let options = EvolutionOptions::builder()
//!     .population_size(10)
//!     .num_generations(3)
//!     .build();
//!
//! let mut rng = RandomNumberGenerator::from_seed(11);
//! let mut nsga = Nsga2::new(config, options, &mut rng).unwrap();
//! nsga.run(&mut rng).unwrap();
//!
//! assert_eq!(nsga.generation(), 3);
//! assert_eq!(nsga.population().len(), 10);
//! assert!(!nsga.pareto_front().is_empty());
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::breeding::breed_offspring;
use crate::error::{GeneticError, Result};
use crate::evolution::options::EvolutionOptions;
use crate::genome::Genome;
use crate::io;
use crate::nsga::crowding::assign_crowding_distance;
use crate::nsga::selection::select_survivors;
use crate::nsga::sorting::{sort_population, ParetoFronts};
use crate::nsga::stats::GenerationStatistics;
use crate::rng::RandomNumberGenerator;
use crate::timetable::{Chromosome, Configuration};

/// Directory (under the snapshot root) that receives the final rank-0 front.
pub const PARETO_FRONT_DIR: &str = "pareto_front";

/// An NSGA-II run over one configuration.
#[derive(Debug, Clone)]
pub struct Nsga2 {
    config: Arc<Configuration>,
    options: EvolutionOptions,
    population: Vec<Genome>,
    fronts: ParetoFronts,
    generation: usize,
    history: Vec<GenerationStatistics>,
}

impl Nsga2 {
    /// Starts a run from a freshly generated population.
    ///
    /// # Errors
    ///
    /// - `GeneticError::Configuration` if the options are invalid.
    /// - `GeneticError::InfeasibleConfiguration` if the generator cannot place every
    ///   session.
    /// - `GeneticError::Io` if the initial snapshot cannot be written.
    pub fn new(
        config: Arc<Configuration>,
        options: EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Self> {
        options.validate()?;
        let population = (0..options.get_population_size())
            .map(|_| Genome::from_generator(Arc::clone(&config), rng))
            .collect::<Result<Vec<_>>>()?;
        Self::start(config, options, population)
    }

    /// Starts a run from a seed population, for example one loaded with
    /// [`io::import_population`].
    ///
    /// # Errors
    ///
    /// `GeneticError::SeedMismatch` if the seed count differs from the population
    /// size, a seed has the wrong shape, or a seed holds a code that names no
    /// configured course section.
    pub fn with_seed(
        config: Arc<Configuration>,
        options: EvolutionOptions,
        seed: Vec<Chromosome>,
    ) -> Result<Self> {
        options.validate()?;
        config.check_seed(options.get_population_size(), &seed)?;

        let population = seed
            .into_iter()
            .map(|chromosome| Genome::new(chromosome, Arc::clone(&config)))
            .collect();
        Self::start(config, options, population)
    }

    fn start(
        config: Arc<Configuration>,
        options: EvolutionOptions,
        population: Vec<Genome>,
    ) -> Result<Self> {
        let mut nsga = Self {
            config,
            options,
            population,
            fronts: ParetoFronts::new(),
            generation: 0,
            history: Vec::new(),
        };
        nsga.rank_population();
        nsga.record()?;
        Ok(nsga)
    }

    /// Produces the next generation.
    ///
    /// # Errors
    ///
    /// Any fatal error, wrapped as `GeneticError::Generation` with the number of
    /// the generation being produced. Breeding and deduplication failures leave the
    /// population untouched.
    pub fn evolve(&mut self, rng: &mut RandomNumberGenerator) -> Result<()> {
        let next = self.generation + 1;
        self.step(rng).map_err(|err| err.in_generation(next))
    }

    fn step(&mut self, rng: &mut RandomNumberGenerator) -> Result<()> {
        let population_size = self.options.get_population_size();
        let threshold = self.options.get_parallel_threshold();

        let mut parents = self.population.clone();
        rng.shuffle(&mut parents);
        let offspring = breed_offspring(&parents, &self.options, rng)?;

        let mut pool = parents;
        pool.extend(offspring);
        let merged = pool.len();
        let mut seen = HashSet::with_capacity(merged);
        pool.retain(|genome| seen.insert(genome.chromosome().clone()));
        if pool.len() < population_size {
            return Err(GeneticError::DeduplicationShortage {
                unique: pool.len(),
                required: population_size,
            });
        }
        debug!(merged, unique = pool.len(), "merged parents and offspring");

        let fronts = sort_population(&mut pool, threshold);
        let crowding = assign_crowding_distance(&mut pool, &fronts);
        let survivors = select_survivors(&fronts, &crowding, population_size);

        let mut slots: Vec<Option<Genome>> = pool.into_iter().map(Some).collect();
        self.population = survivors
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        self.rank_population();
        self.generation += 1;
        self.record()
    }

    /// Runs `num_generations` generations, then exports the final Pareto front if a
    /// snapshot directory is configured.
    pub fn run(&mut self, rng: &mut RandomNumberGenerator) -> Result<&[Genome]> {
        for _ in 0..self.options.get_num_generations() {
            self.evolve(rng)?;
        }
        if let Some(dir) = self.options.get_snapshot_dir() {
            let front = self.pareto_front();
            io::export_population(&dir.join(PARETO_FRONT_DIR), front.iter().map(|g| g.chromosome()))?;
        }
        Ok(&self.population)
    }

    fn rank_population(&mut self) {
        let threshold = self.options.get_parallel_threshold();
        self.fronts = sort_population(&mut self.population, threshold);
        assign_crowding_distance(&mut self.population, &self.fronts);
    }

    fn record(&mut self) -> Result<()> {
        let stats = GenerationStatistics::collect(self.generation, &self.population, &self.fronts)
            .ok_or(GeneticError::EmptyPopulation)?;
        info!(
            generation = stats.generation,
            fronts = stats.front_count(),
            pareto = stats.pareto_size(),
            valid = stats.valid_count,
            best_distance = stats.average_distance.best,
            best_size = stats.average_size.best,
            "generation complete"
        );
        self.history.push(stats);

        if let Some(dir) = self.options.get_snapshot_dir() {
            self.snapshot(dir)?;
        }
        Ok(())
    }

    fn snapshot(&self, root: &Path) -> Result<()> {
        let dir = root.join(format!("gen_{}", self.generation));
        io::export_population(&dir, self.population.iter().map(Genome::chromosome))?;
        Ok(())
    }

    pub fn config(&self) -> &Arc<Configuration> {
        &self.config
    }

    pub fn options(&self) -> &EvolutionOptions {
        &self.options
    }

    pub fn population(&self) -> &[Genome] {
        &self.population
    }

    /// Fronts of the current population, as indices into [`Nsga2::population`].
    pub fn fronts(&self) -> &ParetoFronts {
        &self.fronts
    }

    /// Number of generations produced so far.
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Statistics per generation, starting with the initial population.
    pub fn statistics(&self) -> &[GenerationStatistics] {
        &self.history
    }

    /// The rank-0 genomes of the current population.
    pub fn pareto_front(&self) -> Vec<&Genome> {
        self.fronts
            .first()
            .map(|front| front.iter().map(|&i| &self.population[i]).collect())
            .unwrap_or_default()
    }
}
