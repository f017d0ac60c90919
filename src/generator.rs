//! # Generator
//!
//! Builds a complete timetable from scratch. Every course is placed independently
//! with freshly shuffled day, slot and room orders; each weekly session claims one
//! time slot that no other course uses and puts all parallel sections of the course
//! there side by side. Sessions of a two-credit course land on different days.
//!
//! ## Example
//!
//! ```rust
//! use genetic_timetable::constraints::ConstraintChecker;
//! use genetic_timetable::generator::Generator;
//! use genetic_timetable::rng::RandomNumberGenerator;
//! use genetic_timetable::timetable::{Configuration, Course, Room};
//!
//! let config = Configuration::builder()
//!     .time_slots(0..15)
//!     .rooms((1..=7).map(|id| (id, Room::new(0.0, 0.0, 40))))
//!     .course(Course::new(1, 1, 1))
//!     .build()
//!     .unwrap();
//!
//! let mut rng = RandomNumberGenerator::from_seed(1);
//! let grid = Generator::new(&config).generate(&mut rng).unwrap();
//! assert_eq!(grid.count_nonzero(), 1);
//! assert!(ConstraintChecker::new(&config).is_valid(&grid));
//! ```

use tracing::debug;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;
use crate::timetable::{Chromosome, Configuration, Course, SessionCode};

/// Builds initial chromosomes for a configuration.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    config: &'a Configuration,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Generates one complete timetable.
    ///
    /// # Errors
    ///
    /// Returns `GeneticError::InfeasibleConfiguration` when the curriculum does not fit
    /// the grid, either in total or for one course given the placements made so far.
    pub fn generate(&self, rng: &mut RandomNumberGenerator) -> Result<Chromosome> {
        let (rows, cols) = self.config.grid_shape();
        let required = self.config.total_duration();
        if required > rows * cols {
            return Err(GeneticError::InfeasibleConfiguration(format!(
                "not enough slots for all courses: need {}, grid has {}",
                required,
                rows * cols
            )));
        }

        let mut chromosome = Chromosome::empty(rows, cols);
        for course in self.config.courses() {
            self.place_course(&mut chromosome, course, rng)?;
        }

        debug!(sessions = chromosome.count_nonzero(), "generated chromosome");
        Ok(chromosome)
    }

    fn place_course(
        &self,
        chromosome: &mut Chromosome,
        course: &Course,
        rng: &mut RandomNumberGenerator,
    ) -> Result<()> {
        let slots_per_day = self.config.slots_per_day();
        let mut days: Vec<usize> = (0..self.config.days()).collect();
        let mut slots: Vec<usize> = (0..slots_per_day).collect();
        let mut rooms: Vec<usize> = (0..chromosome.cols()).collect();
        rng.shuffle(&mut days);
        rng.shuffle(&mut slots);
        rng.shuffle(&mut rooms);

        let classes = course.classes as usize;
        let mut days = days.into_iter();

        for parity in 1..=course.credits {
            // Each session takes a fresh day, which keeps twins apart.
            let placement = days.by_ref().find_map(|day| {
                slots.iter().find_map(|&slot| {
                    let row = day * slots_per_day + slot;
                    if !chromosome.row_dedicated_to(row, course.id) {
                        return None;
                    }
                    let free: Vec<usize> = rooms
                        .iter()
                        .copied()
                        .filter(|&col| chromosome.get(row, col) == 0)
                        .take(classes)
                        .collect();
                    (free.len() == classes).then_some((row, free))
                })
            });

            let Some((row, cols)) = placement else {
                return Err(GeneticError::InfeasibleConfiguration(format!(
                    "not enough slots for course {} (session {} of {})",
                    course.id, parity, course.credits
                )));
            };

            for (class_number, col) in (1..=course.classes).zip(cols) {
                chromosome.set(row, col, SessionCode::new(course.id, class_number, parity).raw());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::ConstraintChecker;
    use crate::timetable::Room;

    fn config(courses: Vec<Course>, slots: usize, rooms: u32) -> Configuration {
        Configuration::builder()
            .time_slots(0..slots)
            .rooms((1..=rooms).map(|id| (id, Room::new(0.0, 0.0, 30))))
            .courses(courses)
            .build()
            .unwrap()
    }

    #[test]
    fn test_single_course_placed_once() {
        let config = config(vec![Course::new(1, 1, 1)], 15, 7);
        let mut rng = RandomNumberGenerator::from_seed(0);
        let grid = Generator::new(&config).generate(&mut rng).unwrap();

        assert_eq!(grid.count_nonzero(), 1);
        assert!(grid.contains(SessionCode::new(1, 1, 1)));
        assert!(ConstraintChecker::new(&config).is_valid(&grid));
    }

    #[test]
    fn test_parallel_sections_share_a_slot() {
        let config = config(vec![Course::new(3, 3, 2)], 15, 7);
        let mut rng = RandomNumberGenerator::from_seed(4);
        let grid = Generator::new(&config).generate(&mut rng).unwrap();

        let (row_a, _) = grid.locate(SessionCode::new(3, 1, 1)).unwrap();
        for class in 2..=3 {
            let (row, _) = grid.locate(SessionCode::new(3, class, 1)).unwrap();
            assert_eq!(row, row_a);
        }
        let (row_b, _) = grid.locate(SessionCode::new(3, 1, 2)).unwrap();
        assert_ne!(config.day_of(row_a), config.day_of(row_b));
        assert!(ConstraintChecker::new(&config).is_valid(&grid));
    }

    #[test]
    fn test_many_courses_valid() {
        let courses = vec![
            Course::new(1, 2, 2),
            Course::new(2, 1, 2),
            Course::new(3, 3, 1),
            Course::new(4, 1, 1),
            Course::new(5, 2, 2),
        ];
        let config = config(courses, 15, 7);
        let checker = ConstraintChecker::new(&config);
        let mut rng = RandomNumberGenerator::from_seed(21);
        for _ in 0..20 {
            let grid = Generator::new(&config).generate(&mut rng).unwrap();
            assert_eq!(grid.count_nonzero(), config.total_duration());
            assert!(checker.is_valid(&grid));
        }
    }

    #[test]
    fn test_two_credit_course_needs_two_days() {
        // One day only: the twin has nowhere to go.
        let config = config(vec![Course::new(1, 1, 2)], 5, 3);
        let mut rng = RandomNumberGenerator::from_seed(0);
        let result = Generator::new(&config).generate(&mut rng);
        assert!(matches!(
            result,
            Err(GeneticError::InfeasibleConfiguration(_))
        ));
    }

    #[test]
    fn test_too_many_sections_for_rooms() {
        let config = config(vec![Course::new(1, 4, 1)], 5, 3);
        let mut rng = RandomNumberGenerator::from_seed(0);
        assert!(Generator::new(&config).generate(&mut rng).is_err());
    }
}
