//! # MutationOperator
//!
//! Random relocation of single sessions. Each mutation point picks a uniformly
//! random cell; an empty cell makes the point a no-op. A session is moved to the
//! first row (in shuffled order) that is on a different day than its twin and is
//! free of other courses, into the first empty room (in shuffled order) of that row.
//! A session with no such destination stays where it is.

use tracing::trace;

use crate::rng::RandomNumberGenerator;
use crate::timetable::{Chromosome, Configuration};

/// Default number of relocation attempts per mutation.
pub const DEFAULT_MUTATION_POINTS: usize = 5;

/// Relocates random sessions of a chromosome.
#[derive(Debug, Clone, Copy)]
pub struct MutationOperator<'a> {
    points: usize,
    config: &'a Configuration,
}

impl<'a> MutationOperator<'a> {
    pub fn new(points: usize, config: &'a Configuration) -> Self {
        Self { points, config }
    }

    pub fn points(&self) -> usize {
        self.points
    }

    /// Runs every mutation point on `chromosome` and returns how many sessions moved.
    pub fn mutate(&self, chromosome: &mut Chromosome, rng: &mut RandomNumberGenerator) -> usize {
        let (rows, cols) = chromosome.shape();
        if rows == 0 || cols == 0 {
            return 0;
        }

        let mut time_order: Vec<usize> = (0..rows).collect();
        let mut room_order: Vec<usize> = (0..cols).collect();
        let mut moved = 0;

        for _ in 0..self.points {
            let row = rng.gen_index(rows);
            let col = rng.gen_index(cols);
            rng.shuffle(&mut time_order);
            rng.shuffle(&mut room_order);

            let Some(code) = chromosome.code_at(row, col) else {
                continue;
            };
            let twin_day = chromosome
                .locate(code.twin())
                .map(|(twin_row, _)| self.config.day_of(twin_row));

            let destination = time_order.iter().find_map(|&dest_row| {
                if twin_day == Some(self.config.day_of(dest_row)) {
                    return None;
                }
                if !chromosome.row_dedicated_to(dest_row, code.subject()) {
                    return None;
                }
                chromosome
                    .empty_col_in(dest_row, room_order.iter().copied())
                    .map(|dest_col| (dest_row, dest_col))
            });

            if let Some((dest_row, dest_col)) = destination {
                chromosome.set(dest_row, dest_col, code.raw());
                chromosome.set(row, col, 0);
                moved += 1;
                trace!(
                    code = code.raw(),
                    from = ?(row, col),
                    to = ?(dest_row, dest_col),
                    "mutation moved session"
                );
            }
        }

        moved
    }
}
