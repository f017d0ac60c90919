//! # EvaluationMethod
//!
//! The single-objective fitness used by tournament selection and the
//! single-objective launcher. Each variant fixes both the metric and whether it is
//! minimized or maximized.

use std::cmp::Ordering;

use crate::genome::Genome;
use crate::metrics::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EvaluationMethod {
    /// Number of distinct rooms in use, minimized.
    RoomCount,
    /// Mean distance between back-to-back classes, minimized.
    AverageDistance,
    /// Mean capacity of the rooms in use, maximized.
    #[default]
    AverageSize,
}

impl EvaluationMethod {
    pub fn score(&self, genome: &Genome) -> f64 {
        match self {
            EvaluationMethod::RoomCount => genome.room_count() as f64,
            EvaluationMethod::AverageDistance => genome.average_distance(),
            EvaluationMethod::AverageSize => genome.average_size(),
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            EvaluationMethod::RoomCount | EvaluationMethod::AverageDistance => {
                Direction::Minimize
            }
            EvaluationMethod::AverageSize => Direction::Maximize,
        }
    }

    /// Orders genomes best first.
    pub fn compare(&self, a: &Genome, b: &Genome) -> Ordering {
        let direction = self.direction();
        let (a, b) = (
            direction.normalize(self.score(a)),
            direction.normalize(self.score(b)),
        );
        a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
}
