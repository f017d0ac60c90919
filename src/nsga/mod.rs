//! # NSGA-II
//!
//! Multi-objective machinery: non-dominated sorting, crowding distance, elitist
//! environmental selection, the generational engine and its per-generation
//! statistics. The two objectives are average distance (minimized) and average
//! room size (maximized).

pub mod crowding;
pub mod engine;
pub mod selection;
pub mod sorting;
pub mod stats;

pub use crowding::{assign_crowding_distance, crowding_distances};
pub use engine::Nsga2;
pub use selection::select_survivors;
pub use sorting::{dominates, non_dominated_sort, sort_population, ParetoFronts, SortOutcome};
pub use stats::{GenerationStatistics, ObjectiveSummary};
