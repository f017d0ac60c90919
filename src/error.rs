//! # Error Types
//!
//! This module defines the error type shared by every stage of the timetable search:
//! configuration checks, the initial generator, the genetic operators and the
//! generational engine.
//!
//! Fatal conditions abort the current run. Recoverable conditions (a mutation point
//! without a destination, a time-constraint repair without a destination) never
//! surface here; they degrade to a no-op or to the fitness sentinel instead.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use genetic_timetable::error::{GeneticError, Result};
//!
//! fn check_population(size: usize) -> Result<()> {
//!     if size % 2 != 0 {
//!         return Err(GeneticError::Configuration(format!(
//!             "population size must be even, got {}",
//!             size
//!         )));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_population(4).is_ok());
//! assert!(check_population(3).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use genetic_timetable::error::{GeneticError, OptionExt};
//!
//! fn first_front(fronts: &[Vec<usize>]) -> genetic_timetable::error::Result<&Vec<usize>> {
//!     fronts.first().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(first_front(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Errors raised while building or evolving timetables.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// The generator cannot place every required session: the grid is too small
    /// for the curriculum load.
    #[error("Infeasible configuration: {0}")]
    InfeasibleConfiguration(String),

    /// Crossover repair found no empty cell for a missing session code, or the
    /// child lost sessions.
    #[error("Crossover exhausted: {0}")]
    CrossoverExhaustion(String),

    /// The session-per-day repair could not find a compliant destination.
    #[error("Repair exhausted: {0}")]
    RepairExhaustion(String),

    /// Too few distinct genomes survived the merge of parents and offspring.
    #[error(
        "Deduplication shortage: only {unique} unique genomes, population requires {required}"
    )]
    DeduplicationShortage { unique: usize, required: usize },

    /// A seed chromosome (or seed population) does not fit the configuration.
    #[error("Seed mismatch: {0}")]
    SeedMismatch(String),

    /// Invalid problem data or evolution options.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An operation that needs genomes received none.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A chromosome text file could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A fatal error raised while producing a given generation.
    #[error("Generation {generation} failed: {source}")]
    Generation {
        generation: usize,
        #[source]
        source: Box<GeneticError>,
    },

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

impl GeneticError {
    /// Wraps the error with the generation it occurred in.
    pub fn in_generation(self, generation: usize) -> Self {
        match self {
            // Already carries context from a nested call.
            err @ GeneticError::Generation { .. } => err,
            err => GeneticError::Generation {
                generation,
                source: Box::new(err),
            },
        }
    }

    /// Names the parent pair a crossover or repair failure occurred for. Other
    /// errors pass through unchanged.
    pub fn for_parents(self, first: usize, second: usize) -> Self {
        match self {
            GeneticError::CrossoverExhaustion(msg) => GeneticError::CrossoverExhaustion(
                format!("{} (parents {} and {})", msg, first, second),
            ),
            GeneticError::RepairExhaustion(msg) => GeneticError::RepairExhaustion(format!(
                "{} (parents {} and {})",
                msg, first, second
            )),
            err => err,
        }
    }
}

impl From<serde_json::Error> for GeneticError {
    fn from(err: serde_json::Error) -> Self {
        GeneticError::Parse(err.to_string())
    }
}

/// A specialized Result type for timetable search operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use genetic_timetable::error::ResultExt;
/// use std::fs::File;
///
/// fn open_snapshot(path: &str) -> genetic_timetable::error::Result<()> {
///     File::open(path).context("Failed to open snapshot")?;
///     Ok(())
/// }
///
/// assert!(open_snapshot("/definitely/not/here.txt").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using `err_fn`
    /// to build the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
