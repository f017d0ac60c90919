//! # Configuration
//!
//! The immutable problem data of a run: rooms with coordinates and capacities, the
//! curriculum (courses with their parallel sections and weekly sessions) and the
//! grid dimensions. A run shares one `Arc<Configuration>` among all genomes.
//!
//! ## Example
//!
//! ```rust
//! use genetic_timetable::timetable::{Configuration, Course, Room};
//!
//! let config = Configuration::builder()
//!     .time_slots(0..15)
//!     .slots_per_day(5)
//!     .room(1, Room::new(-6.890, 107.610, 40))
//!     .room(2, Room::new(-6.891, 107.612, 60))
//!     .course(Course::new(1, 2, 2))
//!     .course(Course::new(2, 1, 1))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.total_duration(), 5);
//! assert_eq!(config.grid_shape(), (15, 2));
//! ```

use std::collections::{HashMap, HashSet};

use crate::error::{GeneticError, Result};

use super::chromosome::Chromosome;
use super::code::SessionCode;

/// Default number of time slots in one day.
pub const DEFAULT_SLOTS_PER_DAY: usize = 5;

/// A lecture room.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub latitude: f64,
    pub longitude: f64,
    /// Seating capacity.
    pub size: u32,
}

impl Room {
    pub fn new(latitude: f64, longitude: f64, size: u32) -> Self {
        Self {
            latitude,
            longitude,
            size,
        }
    }
}

/// A course of the curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Course {
    /// Subject id, the leading digits of every session code of the course.
    pub id: u32,
    /// Number of parallel sections (1..=9).
    pub classes: u32,
    /// Sessions per week (1 or 2).
    pub credits: u32,
}

impl Course {
    pub fn new(id: u32, classes: u32, credits: u32) -> Self {
        Self {
            id,
            classes,
            credits,
        }
    }

    /// Number of grid cells the course occupies.
    pub fn duration(&self) -> usize {
        (self.classes * self.credits) as usize
    }

    /// Every session code of the course, parity-major.
    pub fn session_codes(&self) -> Vec<SessionCode> {
        (1..=self.credits)
            .flat_map(|parity| {
                (1..=self.classes).map(move |class| SessionCode::new(self.id, class, parity))
            })
            .collect()
    }
}

/// Problem data shared by every genome of a run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Configuration {
    rooms: HashMap<u32, Room>,
    courses: Vec<Course>,
    time_slots: Vec<usize>,
    room_ids: Vec<u32>,
    slots_per_day: usize,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn course(&self, subject: u32) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == subject)
    }

    /// Parallel section count of `subject`, 1 when the subject is unknown.
    pub fn classes_of(&self, subject: u32) -> u32 {
        self.course(subject).map_or(1, |course| course.classes)
    }

    /// The room placed at grid column `col`.
    pub fn room_at(&self, col: usize) -> Option<&Room> {
        self.room_ids.get(col).and_then(|id| self.rooms.get(id))
    }

    pub fn room_ids(&self) -> &[u32] {
        &self.room_ids
    }

    pub fn time_slots(&self) -> &[usize] {
        &self.time_slots
    }

    pub fn slots_per_day(&self) -> usize {
        self.slots_per_day
    }

    pub fn days(&self) -> usize {
        self.time_slots.len() / self.slots_per_day
    }

    /// Day index of a grid row.
    pub fn day_of(&self, row: usize) -> usize {
        row / self.slots_per_day
    }

    /// `(T, R)`: time slots by rooms.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.time_slots.len(), self.room_ids.len())
    }

    /// Number of occupied cells every complete timetable holds.
    pub fn total_duration(&self) -> usize {
        self.courses.iter().map(Course::duration).sum()
    }

    /// Whether `code` names an existing section and session of a configured course.
    pub fn is_known_code(&self, code: SessionCode) -> bool {
        self.course(code.subject()).is_some_and(|course| {
            (1..=course.classes).contains(&code.class_number())
                && (1..=course.credits).contains(&code.parity())
        })
    }

    /// Checks that a seed population fits this configuration: exactly `expected`
    /// timetables, each of shape [`grid_shape`](Self::grid_shape), holding only
    /// known session codes.
    ///
    /// # Errors
    ///
    /// `GeneticError::SeedMismatch` naming the first offending seed (1-based).
    pub fn check_seed<'a, I>(&self, expected: usize, seed: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Chromosome>,
        I::IntoIter: ExactSizeIterator,
    {
        let seed = seed.into_iter();
        if seed.len() != expected {
            return Err(GeneticError::SeedMismatch(format!(
                "expected {} seed timetables, got {}",
                expected,
                seed.len()
            )));
        }

        let shape = self.grid_shape();
        for (i, chromosome) in seed.enumerate() {
            if chromosome.shape() != shape {
                return Err(GeneticError::SeedMismatch(format!(
                    "seed {} has shape {:?}, expected {:?}",
                    i + 1,
                    chromosome.shape(),
                    shape
                )));
            }
            if let Some((row, col, code)) = chromosome
                .occupied()
                .find(|&(_, _, code)| !self.is_known_code(code))
            {
                return Err(GeneticError::SeedMismatch(format!(
                    "seed {} holds unknown session code {} at ({}, {})",
                    i + 1,
                    code,
                    row,
                    col
                )));
            }
        }
        Ok(())
    }
}

/// Builder for `Configuration`.
#[derive(Debug, Clone, Default)]
pub struct ConfigurationBuilder {
    rooms: HashMap<u32, Room>,
    courses: Vec<Course>,
    time_slots: Vec<usize>,
    room_ids: Option<Vec<u32>>,
    slots_per_day: Option<usize>,
}

impl ConfigurationBuilder {
    /// Adds a room. Unless `room_ids` is set, rooms become grid columns in
    /// ascending id order.
    pub fn room(mut self, id: u32, room: Room) -> Self {
        self.rooms.insert(id, room);
        self
    }

    pub fn rooms<I>(mut self, rooms: I) -> Self
    where
        I: IntoIterator<Item = (u32, Room)>,
    {
        self.rooms.extend(rooms);
        self
    }

    pub fn course(mut self, course: Course) -> Self {
        self.courses.push(course);
        self
    }

    pub fn courses<I>(mut self, courses: I) -> Self
    where
        I: IntoIterator<Item = Course>,
    {
        self.courses.extend(courses);
        self
    }

    /// Ordered time-slot indices, one grid row each.
    pub fn time_slots<I>(mut self, slots: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        self.time_slots = slots.into_iter().collect();
        self
    }

    /// Ordered room ids, one grid column each.
    pub fn room_ids<I>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        self.room_ids = Some(ids.into_iter().collect());
        self
    }

    pub fn slots_per_day(mut self, value: usize) -> Self {
        self.slots_per_day = Some(value);
        self
    }

    /// Validates and builds the configuration.
    pub fn build(self) -> Result<Configuration> {
        let slots_per_day = self.slots_per_day.unwrap_or(DEFAULT_SLOTS_PER_DAY);
        let room_ids = self.room_ids.unwrap_or_else(|| {
            let mut ids: Vec<u32> = self.rooms.keys().copied().collect();
            ids.sort_unstable();
            ids
        });

        if slots_per_day == 0 {
            return Err(GeneticError::Configuration(
                "Slots per day cannot be zero".to_string(),
            ));
        }
        if self.time_slots.is_empty() || room_ids.is_empty() {
            return Err(GeneticError::Configuration(
                "Grid needs at least one time slot and one room".to_string(),
            ));
        }
        if self.time_slots.len() % slots_per_day != 0 {
            return Err(GeneticError::Configuration(format!(
                "{} time slots cannot be split into days of {} slots",
                self.time_slots.len(),
                slots_per_day
            )));
        }
        if let Some(missing) = room_ids.iter().find(|id| !self.rooms.contains_key(id)) {
            return Err(GeneticError::Configuration(format!(
                "Room {} has no coordinates or size",
                missing
            )));
        }

        let mut seen = HashSet::new();
        for course in &self.courses {
            if course.id == 0 {
                return Err(GeneticError::Configuration(
                    "Course id 0 is reserved for empty cells".to_string(),
                ));
            }
            if !seen.insert(course.id) {
                return Err(GeneticError::Configuration(format!(
                    "Course {} is listed twice",
                    course.id
                )));
            }
            if !(1..=9).contains(&course.classes) {
                return Err(GeneticError::Configuration(format!(
                    "Course {} must have between 1 and 9 parallel classes, got {}",
                    course.id, course.classes
                )));
            }
            if !(1..=2).contains(&course.credits) {
                return Err(GeneticError::Configuration(format!(
                    "Course {} must have 1 or 2 credits, got {}",
                    course.id, course.credits
                )));
            }
        }

        let config = Configuration {
            rooms: self.rooms,
            courses: self.courses,
            time_slots: self.time_slots,
            room_ids,
            slots_per_day,
        };

        let (rows, cols) = config.grid_shape();
        if config.total_duration() > rows * cols {
            return Err(GeneticError::Configuration(format!(
                "Curriculum needs {} cells but the grid only has {}",
                config.total_duration(),
                rows * cols
            )));
        }

        Ok(config)
    }
}
