use crate::error::{GeneticError, Result};
use crate::genome::Genome;
use crate::rng::RandomNumberGenerator;
use crate::selection::evaluation::EvaluationMethod;
use crate::selection::selection_strategy::SelectionStrategy;

/// A selection strategy that selects individuals through tournament selection.
///
/// Each draw samples `tournament_size` distinct genomes and keeps the best one by
/// the configured evaluation method. Draws are independent of each other, so a
/// strong genome can win several tournaments.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TournamentSelection {
    tournament_size: usize,
    evaluation_method: EvaluationMethod,
}

impl TournamentSelection {
    /// Creates a new TournamentSelection strategy.
    ///
    /// # Errors
    ///
    /// Returns an error if `tournament_size` is 0.
    pub fn new(tournament_size: usize, evaluation_method: EvaluationMethod) -> Result<Self> {
        if tournament_size < 1 {
            return Err(GeneticError::Configuration(
                "Tournament size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            tournament_size,
            evaluation_method,
        })
    }

    /// A binary tournament judged by `evaluation_method`.
    pub fn binary(evaluation_method: EvaluationMethod) -> Self {
        Self {
            tournament_size: 2,
            evaluation_method,
        }
    }

    pub fn tournament_size(&self) -> usize {
        self.tournament_size
    }

    pub fn evaluation_method(&self) -> EvaluationMethod {
        self.evaluation_method
    }

    /// Runs a single tournament and returns the index of the winner.
    fn run_tournament(&self, population: &[Genome], rng: &mut RandomNumberGenerator) -> usize {
        let competitors = rng.sample_distinct(population.len(), self.tournament_size);
        let direction = self.evaluation_method.direction();

        let mut best_idx = competitors[0];
        let mut best_score = self.evaluation_method.score(&population[best_idx]);
        for &idx in &competitors[1..] {
            let score = self.evaluation_method.score(&population[idx]);
            if direction.is_better(score, best_score) {
                best_idx = idx;
                best_score = score;
            }
        }
        best_idx
    }
}

impl Default for TournamentSelection {
    fn default() -> Self {
        Self::binary(EvaluationMethod::default())
    }
}

impl SelectionStrategy for TournamentSelection {
    fn select(
        &self,
        population: &[Genome],
        num_to_select: usize,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Vec<Genome>> {
        if population.is_empty() {
            return Err(GeneticError::EmptyPopulation);
        }
        if population.len() < self.tournament_size {
            return Err(GeneticError::Configuration(format!(
                "Tournament of size {} needs at least as many genomes, got {}",
                self.tournament_size,
                population.len()
            )));
        }

        let mut selected = Vec::with_capacity(num_to_select);
        while selected.len() < num_to_select {
            let winner = self.run_tournament(population, rng);
            selected.push(population[winner].clone());
        }
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::{Chromosome, Configuration, Course, Room};
    use std::sync::Arc;

    /// Genomes holding course 1 in room column `col`, rooms sized 10, 20, ...
    fn population() -> Vec<Genome> {
        let config = Arc::new(
            Configuration::builder()
                .time_slots(0..5)
                .rooms((1..=5).map(|id| (id, Room::new(0.0, 0.0, 10 * id))))
                .course(Course::new(1, 1, 1))
                .build()
                .unwrap(),
        );
        (0..5)
            .map(|col| {
                let mut grid = Chromosome::empty(5, 5);
                grid.set(0, col, 111);
                Genome::new(grid, config.clone())
            })
            .collect()
    }

    #[test]
    fn test_tournament_selection() {
        let population = population();
        let mut rng = RandomNumberGenerator::from_seed(42);
        let selection = TournamentSelection::default();
        let selected = selection.select(&population, 5, &mut rng).unwrap();
        assert_eq!(selected.len(), 5);
    }

    #[test]
    fn test_worst_never_wins_binary_tournament() {
        let population = population();
        let mut rng = RandomNumberGenerator::from_seed(7);
        let selection = TournamentSelection::binary(EvaluationMethod::AverageSize);
        let selected = selection.select(&population, 200, &mut rng).unwrap();

        // Competitors are distinct, so the smallest room always loses.
        assert!(selected.iter().all(|g| g.average_size() > 10.0));
    }

    #[test]
    fn test_full_tournament_picks_best() {
        let population = population();
        let mut rng = RandomNumberGenerator::from_seed(7);
        let selection = TournamentSelection::new(5, EvaluationMethod::AverageSize).unwrap();
        let selected = selection.select(&population, 3, &mut rng).unwrap();
        assert!(selected.iter().all(|g| g.average_size() == 50.0));
    }

    #[test]
    fn test_tournament_selection_empty_population() {
        let mut rng = RandomNumberGenerator::from_seed(1);
        let result = TournamentSelection::default().select(&[], 3, &mut rng);
        assert!(matches!(result, Err(GeneticError::EmptyPopulation)));
    }

    #[test]
    fn test_tournament_larger_than_population() {
        let population = population();
        let mut rng = RandomNumberGenerator::from_seed(1);
        let selection = TournamentSelection::new(6, EvaluationMethod::RoomCount).unwrap();
        assert!(selection.select(&population, 2, &mut rng).is_err());
    }

    #[test]
    fn test_tournament_selection_invalid_size() {
        assert!(TournamentSelection::new(0, EvaluationMethod::RoomCount).is_err());
    }
}
