//! # Constraints Module
//!
//! Validation and repair of timetable grids.
//!
//! Three rules define a complete timetable:
//!
//! - **Frequency**: the grid holds exactly the curriculum's total duration of sessions.
//! - **Session per day**: the two weekly sessions (twins) of one section never share a day.
//! - **Time constraint**: every occupied cell of a row belongs to the same course.
//!
//! A `ConstraintChecker` works on a configurable `GridRegion` (the full grid unless
//! scoped). Scoping matters for crossover: only the overwritten region of a child is
//! checked and repaired, the inherited region is never touched.
//!
//! The two repairs fail differently. `session_per_day_fix` returns
//! `GeneticError::RepairExhaustion` when a flagged session has nowhere to go, while
//! `time_constraint_fix` drops a session it cannot re-home and only logs it; the
//! resulting genome fails `validate()` and receives the fitness sentinel.
//!
//! ## Basic Usage
//!
//! ```rust
//! use genetic_timetable::constraints::ConstraintChecker;
//! use genetic_timetable::timetable::{Chromosome, Configuration, Course, Room};
//!
//! let config = Configuration::builder()
//!     .time_slots(0..10)
//!     .room(1, Room::new(0.0, 0.0, 30))
//!     .room(2, Room::new(0.0, 0.1, 30))
//!     .course(Course::new(1, 1, 2))
//!     .build()
//!     .unwrap();
//!
//! // Both sessions of course 1 on day 0.
//! let mut grid = Chromosome::empty(10, 2);
//! grid.set(0, 0, 111);
//! grid.set(1, 0, 112);
//!
//! let checker = ConstraintChecker::new(&config);
//! assert!(!checker.is_valid(&grid));
//! assert_eq!(checker.find_session_per_day_violations(&grid).len(), 1);
//! ```

use std::collections::HashSet;
use std::fmt::{self, Display};

use tracing::{debug, warn};

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::timetable::{Chromosome, Configuration, GridRegion, SessionCode};

/// The rule a violation breaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    Frequency,
    SessionPerDay,
    TimeConstraint,
}

impl Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConstraintKind::Frequency => "Frequency",
            ConstraintKind::SessionPerDay => "SessionPerDay",
            ConstraintKind::TimeConstraint => "TimeConstraint",
        };
        f.write_str(name)
    }
}

/// Represents a violation of a constraint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    kind: ConstraintKind,
    /// The offending cell, if the violation is local to one.
    position: Option<(usize, usize)>,
    /// The offending session, if any.
    code: Option<SessionCode>,
    description: String,
}

impl ConstraintViolation {
    pub fn new<D: Into<String>>(kind: ConstraintKind, description: D) -> Self {
        Self {
            kind,
            position: None,
            code: None,
            description: description.into(),
        }
    }

    /// A violation located at one cell.
    pub fn at<D: Into<String>>(
        kind: ConstraintKind,
        row: usize,
        col: usize,
        code: SessionCode,
        description: D,
    ) -> Self {
        Self {
            kind,
            position: Some((row, col)),
            code: Some(code),
            description: description.into(),
        }
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn position(&self) -> Option<(usize, usize)> {
        self.position
    }

    pub fn code(&self) -> Option<SessionCode> {
        self.code
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constraint '{}' violated: {}", self.kind, self.description)?;
        if let Some((row, col)) = self.position {
            write!(f, " at ({}, {})", row, col)?;
        }
        Ok(())
    }
}

/// Validates and repairs grids against a configuration.
#[derive(Debug, Clone)]
pub struct ConstraintChecker<'a> {
    config: &'a Configuration,
    scope: GridRegion,
}

impl<'a> ConstraintChecker<'a> {
    /// A checker over the whole grid.
    pub fn new(config: &'a Configuration) -> Self {
        let (rows, cols) = config.grid_shape();
        Self {
            config,
            scope: GridRegion::full(rows, cols),
        }
    }

    /// A checker restricted to `scope`.
    pub fn with_scope(config: &'a Configuration, scope: GridRegion) -> Self {
        Self { config, scope }
    }

    pub fn scope(&self) -> &GridRegion {
        &self.scope
    }

    /// Whether the grid holds exactly the required number of sessions.
    pub fn check_frequencies(&self, chromosome: &Chromosome) -> bool {
        chromosome.count_nonzero() == self.config.total_duration()
    }

    /// Flags in-scope cells whose twin sits on the same day.
    ///
    /// The twin is looked up anywhere in the grid. When both twins are in scope only
    /// the first one encountered is flagged.
    pub fn find_session_per_day_violations(
        &self,
        chromosome: &Chromosome,
    ) -> Vec<ConstraintViolation> {
        let mut flagged: HashSet<SessionCode> = HashSet::new();
        let mut violations = Vec::new();

        for (row, col) in self.scope.cells() {
            let Some(code) = chromosome.code_at(row, col) else {
                continue;
            };
            let twin = code.twin();
            if flagged.contains(&twin) {
                continue;
            }
            let Some((twin_row, _)) = chromosome.locate(twin) else {
                continue;
            };
            if self.config.day_of(twin_row) == self.config.day_of(row) {
                flagged.insert(code);
                violations.push(ConstraintViolation::at(
                    ConstraintKind::SessionPerDay,
                    row,
                    col,
                    code,
                    format!(
                        "session {} shares day {} with its twin {}",
                        code,
                        self.config.day_of(row),
                        twin
                    ),
                ));
            }
        }

        violations
    }

    /// Moves every flagged session to a random empty in-scope cell on a day other
    /// than its twin's.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::RepairExhaustion` when no such cell exists.
    pub fn session_per_day_fix(
        &self,
        chromosome: &mut Chromosome,
        violations: &[ConstraintViolation],
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        for violation in violations {
            let (Some((row, col)), Some(code)) = (violation.position(), violation.code()) else {
                continue;
            };
            if chromosome.get(row, col) != code.raw() {
                continue;
            }
            let Some((twin_row, _)) = chromosome.locate(code.twin()) else {
                continue;
            };
            let twin_day = self.config.day_of(twin_row);

            let candidates: Vec<(usize, usize)> = self
                .scope
                .cells()
                .filter(|&(r, c)| chromosome.get(r, c) == 0 && self.config.day_of(r) != twin_day)
                .collect();

            let &(dest_row, dest_col) = rng.choose(&candidates).ok_or_else(|| {
                GeneticError::RepairExhaustion(format!(
                    "no space left to move session {} away from day {}",
                    code, twin_day
                ))
            })?;

            chromosome.set(dest_row, dest_col, code.raw());
            chromosome.set(row, col, 0);
            debug!(
                code = code.raw(),
                from = ?(row, col),
                to = ?(dest_row, dest_col),
                "relocated twin session"
            );
        }
        Ok(())
    }

    /// Whether every in-scope row holds at most one course.
    pub fn check_time_constraint(&self, chromosome: &Chromosome) -> bool {
        self.scope.rows.clone().all(|row| {
            let mut subjects = self
                .scope
                .cols
                .clone()
                .filter_map(|col| chromosome.code_at(row, col))
                .map(SessionCode::subject);
            match subjects.next() {
                Some(first) => subjects.all(|subject| subject == first),
                None => true,
            }
        })
    }

    /// Clears every in-scope cell whose row (in its current state) also holds
    /// another course, and returns the cleared sessions.
    pub fn find_time_constraint_violations(
        &self,
        chromosome: &mut Chromosome,
    ) -> Vec<SessionCode> {
        let mut cleared = Vec::new();
        for (row, col) in self.scope.cells() {
            let Some(code) = chromosome.code_at(row, col) else {
                continue;
            };
            let shares_slot = self.scope.cols.clone().any(|other| {
                chromosome
                    .code_at(row, other)
                    .is_some_and(|c| c.subject() != code.subject())
            });
            if shares_slot {
                chromosome.set(row, col, 0);
                cleared.push(code);
            }
        }
        cleared
    }

    /// Re-homes sessions cleared by `find_time_constraint_violations`.
    ///
    /// Rows are visited in random order; a row qualifies when it is on a different
    /// day than the session's twin (if the twin is in the grid) and is empty or
    /// dedicated to the session's course. Sessions with no qualifying row stay
    /// unplaced and are logged. Returns the number of unplaced sessions.
    pub fn time_constraint_fix(
        &self,
        chromosome: &mut Chromosome,
        cleared: &[SessionCode],
        rng: &mut RandomNumberGenerator,
    ) -> usize {
        let mut rows: Vec<usize> = self.scope.rows.clone().collect();
        let mut unplaced = 0;

        for &code in cleared {
            rng.shuffle(&mut rows);
            let twin_day = chromosome
                .locate(code.twin())
                .map(|(twin_row, _)| self.config.day_of(twin_row));

            let destination = rows.iter().find_map(|&row| {
                if twin_day == Some(self.config.day_of(row)) {
                    return None;
                }
                let dedicated = self
                    .scope
                    .cols
                    .clone()
                    .filter_map(|col| chromosome.code_at(row, col))
                    .all(|c| c.subject() == code.subject());
                if !dedicated {
                    return None;
                }
                chromosome
                    .empty_col_in(row, self.scope.cols.clone())
                    .map(|col| (row, col))
            });

            match destination {
                Some((row, col)) => chromosome.set(row, col, code.raw()),
                None => {
                    unplaced += 1;
                    warn!(
                        code = code.raw(),
                        "no time slot left for session, leaving it unplaced"
                    );
                }
            }
        }

        unplaced
    }

    /// Runs the frequency, session-per-day and time-constraint checks in order and
    /// returns the violations of the first failing one. An empty vector means the
    /// grid is a complete timetable.
    pub fn validate(&self, chromosome: &Chromosome) -> Vec<ConstraintViolation> {
        if !self.check_frequencies(chromosome) {
            return vec![ConstraintViolation::new(
                ConstraintKind::Frequency,
                format!(
                    "expected {} sessions, found {}",
                    self.config.total_duration(),
                    chromosome.count_nonzero()
                ),
            )];
        }

        let violations = self.find_session_per_day_violations(chromosome);
        if !violations.is_empty() {
            return violations;
        }

        if !self.check_time_constraint(chromosome) {
            return vec![ConstraintViolation::new(
                ConstraintKind::TimeConstraint,
                "a time slot is shared by different courses",
            )];
        }

        Vec::new()
    }

    /// Checks if the grid satisfies every constraint.
    pub fn is_valid(&self, chromosome: &Chromosome) -> bool {
        self.validate(chromosome).is_empty()
    }
}
