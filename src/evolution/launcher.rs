use std::collections::HashSet;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::breeding::breed_offspring;
use crate::error::{GeneticError, OptionExt, Result};
use crate::evolution::options::EvolutionOptions;
use crate::genome::Genome;
use crate::rng::RandomNumberGenerator;
use crate::selection::SelectionStrategy;
use crate::timetable::Configuration;

/// The best genome of an evolution together with its score under the evaluation
/// method of the run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// The evolved genome.
    pub genome: Genome,
    /// The score of the genome.
    pub score: f64,
}

/// Single-objective evolution driven by a parent selection strategy.
///
/// Each generation selects parents, breeds one offspring per parent, merges
/// parents and offspring, drops duplicate timetables, and keeps the
/// `population_size` best genomes by the options' evaluation method.
#[derive(Debug, Clone)]
pub struct EvolutionLauncher<Selection>
where
    Selection: SelectionStrategy,
{
    selection: Selection,
    config: Arc<Configuration>,
}

impl<Selection> EvolutionLauncher<Selection>
where
    Selection: SelectionStrategy,
{
    /// Creates a new `EvolutionLauncher` instance with the specified selection strategy
    /// and configuration.
    pub fn new(selection: Selection, config: Arc<Configuration>) -> Self {
        Self { selection, config }
    }

    /// Evolves a freshly generated population.
    ///
    /// # Errors
    ///
    /// This method will return an error if:
    /// - The options are invalid
    /// - The generator cannot place every session
    /// - Breeding fails in some generation
    pub fn evolve(
        &self,
        options: &EvolutionOptions,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;
        let population = (0..options.get_population_size())
            .map(|_| Genome::from_generator(Arc::clone(&self.config), rng))
            .collect::<Result<Vec<_>>>()?;
        self.evolve_from(options, population, rng)
    }

    /// Evolves the given starting population.
    ///
    /// # Errors
    ///
    /// - `GeneticError::EmptyPopulation` if `population` is empty.
    /// - `GeneticError::SeedMismatch` if the population size differs from the
    ///   options, or a timetable does not fit the configuration.
    /// - `GeneticError::DeduplicationShortage` (wrapped with the generation) if
    ///   parents and offspring hold fewer than `population_size` distinct timetables.
    ///
    /// # Performance
    ///
    /// Scores are evaluated on the rayon pool once the merged pool reaches the
    /// options' parallel threshold.
    pub fn evolve_from(
        &self,
        options: &EvolutionOptions,
        mut population: Vec<Genome>,
        rng: &mut RandomNumberGenerator,
    ) -> Result<EvolutionResult> {
        options.validate()?;
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        self.config.check_seed(
            options.get_population_size(),
            population.iter().map(Genome::chromosome),
        )?;

        let method = options.get_evaluation_method();
        for generation in 1..=options.get_num_generations() {
            population = self
                .next_generation(options, &population, rng)
                .map_err(|err| err.in_generation(generation))?;

            let best = method.score(&population[0]);
            info!(generation, best, method = ?method, "generation complete");
        }

        let genome = population
            .into_iter()
            .min_by(|a, b| method.compare(a, b))
            .ok_or_else_genetic(|| GeneticError::EmptyPopulation)?;
        let score = method.score(&genome);
        Ok(EvolutionResult { genome, score })
    }

    fn next_generation(
        &self,
        options: &EvolutionOptions,
        population: &[Genome],
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>> {
        let population_size = options.get_population_size();
        let parents = self.selection.select(population, population_size, rng)?;
        let offspring = breed_offspring(&parents, options, rng)?;

        let mut pool: Vec<Genome> = population.to_vec();
        pool.extend(offspring);
        let mut seen = HashSet::with_capacity(pool.len());
        pool.retain(|genome| seen.insert(genome.chromosome().clone()));
        if pool.len() < population_size {
            return Err(GeneticError::DeduplicationShortage {
                unique: pool.len(),
                required: population_size,
            });
        }
        debug!(unique = pool.len(), "merged parents and offspring");

        let method = options.get_evaluation_method();
        if pool.len() >= options.get_parallel_threshold() {
            pool.par_iter().for_each(|genome| {
                method.score(genome);
            });
        }
        pool.sort_by(|a, b| method.compare(a, b));
        pool.truncate(population_size);
        Ok(pool)
    }
}
