use crate::error::{GeneticError, Result};
use crate::genome::Genome;
use crate::rng::RandomNumberGenerator;
use crate::selection::selection_strategy::SelectionStrategy;

/// Passes the population through as the parent pool.
///
/// The first `num_to_select` genomes are returned in order; when more are requested
/// than exist, the population is repeated from the start.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NoSelection;

impl SelectionStrategy for NoSelection {
    fn select(
        &self,
        population: &[Genome],
        num_to_select: usize,
        _rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        Ok(population
            .iter()
            .cycle()
            .take(num_to_select)
            .cloned()
            .collect())
    }
}
