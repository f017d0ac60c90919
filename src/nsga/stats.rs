use std::fmt;

use crate::genome::Genome;
use crate::metrics::{Direction, OBJECTIVE_DIRECTIONS};
use crate::nsga::sorting::ParetoFronts;

/// Best, worst and mean value of one objective across a population.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectiveSummary {
    pub best: f64,
    pub worst: f64,
    pub mean: f64,
}

impl ObjectiveSummary {
    /// Summarizes `values` under `direction`. `None` for an empty slice.
    pub fn from_values(values: &[f64], direction: Direction) -> Option<Self> {
        let first = *values.first()?;
        let (mut best, mut worst) = (first, first);
        for &value in &values[1..] {
            if direction.is_better(value, best) {
                best = value;
            }
            if direction.is_better(worst, value) {
                worst = value;
            }
        }
        let mean = values.iter().sum::<f64>() / values.len() as f64;
        Some(Self { best, worst, mean })
    }
}

/// Snapshot of one generation of an NSGA-II run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenerationStatistics {
    pub generation: usize,
    pub population_size: usize,
    pub front_sizes: Vec<usize>,
    pub valid_count: usize,
    pub average_distance: ObjectiveSummary,
    pub average_size: ObjectiveSummary,
}

impl GenerationStatistics {
    /// Collects statistics of a sorted population. `None` if it is empty.
    pub fn collect(generation: usize, population: &[Genome], fronts: &ParetoFronts) -> Option<Self> {
        let objectives: Vec<_> = population.iter().map(Genome::objectives).collect();
        let distances: Vec<f64> = objectives.iter().map(|o| o[0]).collect();
        let sizes: Vec<f64> = objectives.iter().map(|o| o[1]).collect();

        Some(Self {
            generation,
            population_size: population.len(),
            front_sizes: fronts.iter().map(Vec::len).collect(),
            valid_count: population.iter().filter(|g| g.is_valid()).count(),
            average_distance: ObjectiveSummary::from_values(&distances, OBJECTIVE_DIRECTIONS[0])?,
            average_size: ObjectiveSummary::from_values(&sizes, OBJECTIVE_DIRECTIONS[1])?,
        })
    }

    pub fn front_count(&self) -> usize {
        self.front_sizes.len()
    }

    /// Size of the rank-0 front.
    pub fn pareto_size(&self) -> usize {
        self.front_sizes.first().copied().unwrap_or(0)
    }
}

impl fmt::Display for GenerationStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "gen {}: {} fronts, pareto {}, valid {}/{}, distance best {:.2} mean {:.2}, size best {:.2} mean {:.2}",
            self.generation,
            self.front_count(),
            self.pareto_size(),
            self.valid_count,
            self.population_size,
            self.average_distance.best,
            self.average_distance.mean,
            self.average_size.best,
            self.average_size.mean,
        )
    }
}
