//! # Caching Module
//!
//! Memoization of the derived values of one genome: validity, student views and
//! the metrics computed from them. Each value is computed on first access, at most
//! once, and may be filled from any thread (the cells are `OnceLock`s), so a whole
//! population can be evaluated in parallel through shared references.
//!
//! The cache is cleared as a unit. Only the genome's mutation entry point does so;
//! partial invalidation is not supported.

use std::sync::OnceLock;

use crate::timetable::Chromosome;

/// Memoized values derived from one chromosome.
#[derive(Debug, Clone, Default)]
pub struct MetricCache {
    validity: OnceLock<bool>,
    decomposition: OnceLock<Vec<Chromosome>>,
    average_distance: OnceLock<f64>,
    average_size: OnceLock<f64>,
    room_count: OnceLock<usize>,
}

impl MetricCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validity<F>(&self, compute: F) -> bool
    where
        F: FnOnce() -> bool,
    {
        *self.validity.get_or_init(compute)
    }

    pub fn decomposition<F>(&self, compute: F) -> &[Chromosome]
    where
        F: FnOnce() -> Vec<Chromosome>,
    {
        self.decomposition.get_or_init(compute)
    }

    pub fn average_distance<F>(&self, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        *self.average_distance.get_or_init(compute)
    }

    pub fn average_size<F>(&self, compute: F) -> f64
    where
        F: FnOnce() -> f64,
    {
        *self.average_size.get_or_init(compute)
    }

    pub fn room_count<F>(&self, compute: F) -> usize
    where
        F: FnOnce() -> usize,
    {
        *self.room_count.get_or_init(compute)
    }

    /// Drops every memoized value.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if nothing has been computed yet.
    pub fn is_empty(&self) -> bool {
        self.validity.get().is_none()
            && self.decomposition.get().is_none()
            && self.average_distance.get().is_none()
            && self.average_size.get().is_none()
            && self.room_count.get().is_none()
    }
}
