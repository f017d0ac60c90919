//! # Breeding
//!
//! Genetic operators for timetables and the offspring step shared by the NSGA-II
//! engine and the single-objective launcher.
//!
//! Parents are paired in the order given. For each pair a draw against the crossover
//! rate decides between recombination (two children, each parent primary once) and
//! plain copies; identical parents are always copied. Every offspring is then
//! mutated with the mutation rate.
//!
//! The operators fail differently: a crossover that cannot restore the
//! parent's sessions is fatal for the run, while a mutation point with no legal
//! destination just leaves the timetable unchanged.

pub mod crossover;
pub mod mutation;

pub use crossover::{CrossoverMethod, CrossoverOperator};
pub use mutation::{MutationOperator, DEFAULT_MUTATION_POINTS};

use tracing::debug;

use crate::error::{GeneticError, Result};
use crate::evolution::options::EvolutionOptions;
use crate::genome::Genome;
use crate::rng::RandomNumberGenerator;

/// Breeds one offspring per parent from consecutive parent pairs.
///
/// # Errors
///
/// - `GeneticError::EmptyPopulation` if `parents` is empty.
/// - Any fatal crossover error, naming the indices in `parents` of the primary
///   and secondary parent.
pub fn breed_offspring(
    parents: &[Genome],
    options: &EvolutionOptions,
    rng: &mut RandomNumberGenerator,
) -> Result<Vec<Genome>> {
    let first = parents.first().ok_or(GeneticError::EmptyPopulation)?;
    let config = first.config().clone();
    let crossover = CrossoverOperator::new(options.get_crossover_method(), &config);
    let mutation = MutationOperator::new(options.get_mutation_points(), &config);

    let mut offspring = Vec::with_capacity(parents.len());
    let mut crossed = 0;

    for (k, pair) in parents.chunks(2).enumerate() {
        match pair {
            [a, b] => {
                let recombine = rng.gen_bool(options.get_crossover_rate())
                    && a.chromosome() != b.chromosome();
                if recombine {
                    let (i, j) = (2 * k, 2 * k + 1);
                    let first_child = crossover
                        .run(a.chromosome(), b.chromosome(), rng)
                        .map_err(|err| err.for_parents(i, j))?;
                    let second_child = crossover
                        .run(b.chromosome(), a.chromosome(), rng)
                        .map_err(|err| err.for_parents(j, i))?;
                    offspring.push(a.offspring(first_child));
                    offspring.push(b.offspring(second_child));
                    crossed += 1;
                } else {
                    offspring.push(a.clone());
                    offspring.push(b.clone());
                }
            }
            // Unpaired trailing parent.
            [single] => offspring.push(single.clone()),
            _ => unreachable!("chunks(2) yields one or two elements"),
        }
    }

    let mut mutated = 0;
    for child in offspring.iter_mut() {
        if rng.gen_bool(options.get_mutation_rate()) {
            child.mutate(&mutation, rng);
            mutated += 1;
        }
    }

    debug!(
        pairs = parents.len() / 2,
        crossed, mutated, "bred offspring"
    );
    Ok(offspring)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::{Chromosome, Configuration, Course, Room};
    use std::sync::Arc;

    fn config() -> Arc<Configuration> {
        Arc::new(
            Configuration::builder()
                .time_slots(0..15)
                .rooms((1..=7).map(|id| (id, Room::new(0.0, 0.0, 30))))
                .courses(vec![Course::new(1, 2, 2), Course::new(2, 1, 1)])
                .build()
                .unwrap(),
        )
    }

    #[test]
    fn test_identical_parents_are_copied() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(5);
        let parent = Genome::from_generator(config, &mut rng).unwrap();
        let parents = vec![parent.clone(), parent.clone()];
        let options = EvolutionOptions::builder()
            .population_size(2)
            .crossover_rate(1.0)
            .mutation_rate(0.0)
            .build();

        let offspring = breed_offspring(&parents, &options, &mut rng).unwrap();
        assert_eq!(offspring.len(), 2);
        assert!(offspring
            .iter()
            .all(|child| child.chromosome() == parent.chromosome()));
    }

    #[test]
    fn test_offspring_count_matches_parents() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(9);
        let parents: Vec<Genome> = (0..6)
            .map(|_| Genome::from_generator(config.clone(), &mut rng).unwrap())
            .collect();
        let options = EvolutionOptions::builder()
            .population_size(6)
            .crossover_rate(1.0)
            .mutation_rate(1.0)
            .build();

        let offspring = breed_offspring(&parents, &options, &mut rng).unwrap();
        assert_eq!(offspring.len(), 6);
        for child in &offspring {
            assert_eq!(child.chromosome().count_nonzero(), config.total_duration());
        }
    }

    #[test]
    fn test_no_crossover_no_mutation_copies_everything() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(2);
        let parents: Vec<Genome> = (0..4)
            .map(|_| Genome::from_generator(config.clone(), &mut rng).unwrap())
            .collect();
        let options = EvolutionOptions::builder()
            .population_size(4)
            .crossover_rate(0.0)
            .mutation_rate(0.0)
            .build();

        let offspring = breed_offspring(&parents, &options, &mut rng).unwrap();
        for (child, parent) in offspring.iter().zip(&parents) {
            assert_eq!(child.chromosome(), parent.chromosome());
        }
    }

    #[test]
    fn test_crossover_failure_names_parents() {
        let config = config();
        let mut rng = RandomNumberGenerator::from_seed(4);
        let mut parents: Vec<Genome> = (0..2)
            .map(|_| Genome::from_generator(config.clone(), &mut rng).unwrap())
            .collect();
        parents.push(Genome::from_generator(config.clone(), &mut rng).unwrap());
        parents.push(Genome::new(Chromosome::empty(10, 7), config));
        let options = EvolutionOptions::builder()
            .population_size(4)
            .crossover_rate(1.0)
            .mutation_rate(0.0)
            .build();

        match breed_offspring(&parents, &options, &mut rng) {
            Err(GeneticError::CrossoverExhaustion(msg)) => {
                assert!(msg.ends_with("(parents 2 and 3)"), "{}", msg);
            }
            other => panic!("Expected CrossoverExhaustion, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_parents() {
        let mut rng = RandomNumberGenerator::from_seed(2);
        let result = breed_offspring(&[], &EvolutionOptions::default(), &mut rng);
        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }
}
