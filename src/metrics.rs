//! # Timetable Metrics
//!
//! Scoring functions over student views (see `decomposition`) and the optimization
//! direction of each objective.

use std::collections::BTreeSet;

use crate::timetable::{Chromosome, Configuration};

/// Mean Earth radius used by the haversine formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Average distance reported for timetables that fail validation.
pub const DISTANCE_SENTINEL: f64 = 1000.0;

/// Average room size reported for timetables that fail validation.
pub const SIZE_SENTINEL: f64 = 0.0;

/// The two NSGA-II objectives: `[average distance, average size]`.
pub type Objectives = [f64; 2];

/// Whether lower or higher values of an objective are better.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    Minimize,
    Maximize,
}

impl Direction {
    /// Maps a value so that lower is better regardless of direction.
    pub fn normalize(self, value: f64) -> f64 {
        match self {
            Direction::Minimize => value,
            Direction::Maximize => -value,
        }
    }

    /// Whether `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        self.normalize(a) < self.normalize(b)
    }
}

/// Directions of `Objectives`: distance is minimized, room size maximized.
pub const OBJECTIVE_DIRECTIONS: [Direction; 2] = [Direction::Minimize, Direction::Maximize];

/// Great-circle distance in meters between two `(latitude, longitude)` points in degrees.
pub fn haversine(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, long1) = a;
    let (lat2, long2) = b;

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (long2 - long1).to_radians();

    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Room transitions between back-to-back classes of a student view.
///
/// Consecutive rows of the same day that both hold a class form a transition from
/// each occupied room of the earlier row to each occupied room of the later one.
/// In a valid view every row holds at most one class.
pub fn adjacent_classes(view: &Chromosome, slots_per_day: usize) -> Vec<(usize, usize)> {
    let occupied: Vec<Vec<usize>> = (0..view.rows())
        .map(|row| {
            (0..view.cols())
                .filter(|&col| view.get(row, col) != 0)
                .collect()
        })
        .collect();

    let mut pairs = Vec::new();
    for row in 0..view.rows().saturating_sub(1) {
        // The last slot of a day is not adjacent to the first slot of the next.
        if (row + 1) % slots_per_day == 0 {
            continue;
        }
        for &from in &occupied[row] {
            for &to in &occupied[row + 1] {
                pairs.push((from, to));
            }
        }
    }
    pairs
}

/// Average walking distance between back-to-back classes, averaged per view and then
/// across views. A view without transitions contributes 0.
pub fn average_distance(views: &[Chromosome], config: &Configuration) -> f64 {
    if views.is_empty() {
        return 0.0;
    }

    let total: f64 = views
        .iter()
        .map(|view| {
            let pairs = adjacent_classes(view, config.slots_per_day());
            if pairs.is_empty() {
                return 0.0;
            }
            let sum: f64 = pairs
                .iter()
                .map(|&(from, to)| room_distance(config, from, to))
                .sum();
            sum / pairs.len() as f64
        })
        .sum();

    total / views.len() as f64
}

fn room_distance(config: &Configuration, from: usize, to: usize) -> f64 {
    match (config.room_at(from), config.room_at(to)) {
        (Some(a), Some(b)) => haversine((a.latitude, a.longitude), (b.latitude, b.longitude)),
        _ => 0.0,
    }
}

/// Average capacity of the distinct rooms used in `view`, 0 when none is used.
pub fn average_size(view: &Chromosome, config: &Configuration) -> f64 {
    let used = used_rooms(view);
    if used.is_empty() {
        return 0.0;
    }
    let total: f64 = used
        .iter()
        .filter_map(|&col| config.room_at(col))
        .map(|room| room.size as f64)
        .sum();
    total / used.len() as f64
}

/// Number of distinct rooms holding at least one session.
pub fn room_count(chromosome: &Chromosome) -> usize {
    used_rooms(chromosome).len()
}

fn used_rooms(chromosome: &Chromosome) -> BTreeSet<usize> {
    chromosome.occupied().map(|(_, col, _)| col).collect()
}
