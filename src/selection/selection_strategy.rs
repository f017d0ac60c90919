use std::fmt::Debug;

use crate::error::Result;
use crate::genome::Genome;
use crate::rng::RandomNumberGenerator;

/// Trait for parent selection strategies.
///
/// Selection strategies choose the parents of the next round of breeding from the
/// current population. The returned genomes are copies; the same genome may be
/// selected several times.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use genetic_timetable::genome::Genome;
/// use genetic_timetable::rng::RandomNumberGenerator;
/// use genetic_timetable::selection::{NoSelection, SelectionStrategy};
/// use genetic_timetable::timetable::{Configuration, Course, Room};
///
/// let config = Arc::new(
///     Configuration::builder()
///         .time_slots(0..10)
///         .room(1, Room::new(0.0, 0.0, 30))
///         .course(Course::new(1, 1, 1))
///         .build()
///         .unwrap(),
/// );
/// let mut rng = RandomNumberGenerator::from_seed(0);
/// let population: Vec<Genome> = (0..4)
///     .map(|_| Genome::from_generator(config.clone(), &mut rng).unwrap())
///     .collect();
///
/// let selected = NoSelection.select(&population, 4, &mut rng).unwrap();
/// assert_eq!(selected.len(), 4);
/// ```
pub trait SelectionStrategy: Debug + Send + Sync {
    /// Selects `num_to_select` parents from `population`.
    ///
    /// # Errors
    ///
    /// Returns an error if the population is empty or too small for the strategy.
    fn select(
        &self,
        population: &[Genome],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>>;
}
