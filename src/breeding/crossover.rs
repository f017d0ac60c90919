//! # CrossoverOperator
//!
//! Recombines two timetables by splitting one grid axis at its midpoint: the child
//! inherits everything before the midpoint from the primary parent and everything
//! from the midpoint on from the secondary parent. The overwritten region is then
//! repaired so the child holds exactly the primary parent's sessions again:
//!
//! 1. sessions the child now holds too often are removed from the overwritten region,
//!    scanning it row-major and keeping the first occurrences;
//! 2. sessions the child lost are shuffled into random empty cells of the overwritten
//!    region;
//! 3. twins that ended up on the same day are pulled apart inside the overwritten
//!    region.
//!
//! The single-course-per-slot rule is not restored here. A child that breaks it
//! fails validation and is scored with the fitness sentinel.

use std::collections::HashMap;

use tracing::debug;

use crate::constraints::ConstraintChecker;
use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::timetable::{Chromosome, Configuration, GridRegion};

/// Which grid axis the crossover splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CrossoverMethod {
    /// Split the room axis: rooms from the midpoint on come from the second parent.
    #[default]
    ColumnBased,
    /// Split the time axis: time slots from the midpoint on come from the second parent.
    RowBased,
}

impl CrossoverMethod {
    /// The region of a `rows × cols` child overwritten by the second parent.
    pub fn overwritten_region(&self, rows: usize, cols: usize) -> GridRegion {
        match self {
            CrossoverMethod::ColumnBased => GridRegion::new(0..rows, cols / 2..cols),
            CrossoverMethod::RowBased => GridRegion::new(rows / 2..rows, 0..cols),
        }
    }
}

/// Recombines chromosomes and repairs the result.
#[derive(Debug, Clone, Copy)]
pub struct CrossoverOperator<'a> {
    method: CrossoverMethod,
    config: &'a Configuration,
}

impl<'a> CrossoverOperator<'a> {
    pub fn new(method: CrossoverMethod, config: &'a Configuration) -> Self {
        Self { method, config }
    }

    pub fn method(&self) -> CrossoverMethod {
        self.method
    }

    /// Produces a child of `primary` and `secondary`. The child holds the same
    /// multiset of sessions as `primary`.
    ///
    /// # Errors
    ///
    /// - `GeneticError::CrossoverExhaustion` if a lost session finds no empty cell or
    ///   the child's sessions differ from the primary parent's after repair.
    /// - `GeneticError::RepairExhaustion` if a same-day twin cannot be moved.
    pub fn run(
        &self,
        primary: &Chromosome,
        secondary: &Chromosome,
        rng: &mut RandomNumberGenerator,
    ) -> Result<Chromosome> {
        if primary.shape() != secondary.shape() {
            return Err(GeneticError::CrossoverExhaustion(format!(
                "parents have different shapes {:?} and {:?}",
                primary.shape(),
                secondary.shape()
            )));
        }

        let (rows, cols) = primary.shape();
        let region = self.method.overwritten_region(rows, cols);
        let target = primary.code_counts();

        let mut child = primary.clone();
        child.overwrite_region(secondary, &region);

        // Sessions inherited from the untouched region count first.
        let mut seen: HashMap<u32, usize> = HashMap::new();
        for (row, col, code) in child.occupied() {
            if !region.contains(row, col) {
                *seen.entry(code.raw()).or_insert(0) += 1;
            }
        }

        let mut removed = 0;
        for (row, col) in region.cells() {
            let value = child.get(row, col);
            if value == 0 {
                continue;
            }
            let count = seen.entry(value).or_insert(0);
            if *count >= target.get(&value).copied().unwrap_or(0) {
                child.set(row, col, 0);
                removed += 1;
            } else {
                *count += 1;
            }
        }

        let mut missing: Vec<u32> = target
            .iter()
            .flat_map(|(&code, &wanted)| {
                let have = seen.get(&code).copied().unwrap_or(0);
                std::iter::repeat(code).take(wanted.saturating_sub(have))
            })
            .collect();
        // HashMap order is unspecified; sort before shuffling so a seed replays.
        missing.sort_unstable();
        rng.shuffle(&mut missing);

        let mut empty: Vec<(usize, usize)> = region
            .cells()
            .filter(|&(row, col)| child.get(row, col) == 0)
            .collect();
        rng.shuffle(&mut empty);

        for &code in &missing {
            let (row, col) = empty.pop().ok_or_else(|| {
                GeneticError::CrossoverExhaustion(format!(
                    "no space left to insert missing session {}",
                    code
                ))
            })?;
            child.set(row, col, code);
        }

        if child.code_counts() != target {
            return Err(GeneticError::CrossoverExhaustion(
                "child sessions differ from the primary parent".to_string(),
            ));
        }

        let checker = ConstraintChecker::with_scope(self.config, region);
        let violations = checker.find_session_per_day_violations(&child);
        checker.session_per_day_fix(&mut child, &violations, rng)?;

        debug!(
            method = ?self.method,
            removed,
            restored = missing.len(),
            relocated = violations.len(),
            "crossover child repaired"
        );
        Ok(child)
    }
}
