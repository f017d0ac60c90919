//! # ParallelClassDecomposer
//!
//! A course with several parallel sections puts them at possibly different times and
//! rooms, but each student attends exactly one section per course. To score a
//! timetable from the students' point of view, it is expanded into student views:
//! with `L = lcm(classes)` over the courses present, view `i` keeps, for every course,
//! only section `(i mod classes) + 1`. Cycling every course through its sections this
//! way covers each section at least once.

use std::collections::BTreeSet;

use crate::timetable::{Chromosome, Configuration};

/// Expands a chromosome into per-combination student views.
#[derive(Debug, Clone, Copy)]
pub struct ParallelClassDecomposer<'a> {
    config: &'a Configuration,
}

impl<'a> ParallelClassDecomposer<'a> {
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Number of student views of `chromosome`: the lcm of the parallel section
    /// counts of every course present. An empty grid has one (empty) view.
    pub fn combination_count(&self, chromosome: &Chromosome) -> usize {
        subjects(chromosome)
            .into_iter()
            .map(|subject| self.config.classes_of(subject) as usize)
            .fold(1, lcm)
    }

    /// Builds every student view of `chromosome`, each a full-size grid.
    pub fn decompose(&self, chromosome: &Chromosome) -> Vec<Chromosome> {
        let (rows, cols) = chromosome.shape();
        let count = self.combination_count(chromosome);

        (0..count)
            .map(|i| {
                let mut view = Chromosome::empty(rows, cols);
                for (row, col, code) in chromosome.occupied() {
                    let classes = self.config.classes_of(code.subject()) as usize;
                    if code.class_number() as usize == i % classes + 1 {
                        view.set(row, col, code.raw());
                    }
                }
                view
            })
            .collect()
    }
}

fn subjects(chromosome: &Chromosome) -> BTreeSet<u32> {
    chromosome.occupied().map(|(_, _, code)| code.subject()).collect()
}

fn gcd(a: usize, b: usize) -> usize {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: usize, b: usize) -> usize {
    a / gcd(a, b) * b
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timetable::{Course, Room, SessionCode};

    fn config() -> Configuration {
        Configuration::builder()
            .time_slots(0..10)
            .rooms((1..=4).map(|id| (id, Room::new(0.0, 0.0, 30))))
            .courses(vec![
                Course::new(1, 2, 1),
                Course::new(2, 3, 1),
                Course::new(3, 1, 2),
            ])
            .build()
            .unwrap()
    }

    fn grid() -> Chromosome {
        let mut grid = Chromosome::empty(10, 4);
        grid.set(0, 0, 111);
        grid.set(0, 1, 121);
        grid.set(1, 0, 211);
        grid.set(1, 1, 221);
        grid.set(1, 2, 231);
        grid.set(2, 3, 311);
        grid.set(7, 3, 312);
        grid
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(2, 3), 6);
        assert_eq!(lcm(4, 6), 12);
        assert_eq!([1, 1, 1].into_iter().fold(1, lcm), 1);
    }

    #[test]
    fn test_combination_count() {
        let config = config();
        let decomposer = ParallelClassDecomposer::new(&config);
        assert_eq!(decomposer.combination_count(&grid()), 6);
        assert_eq!(decomposer.combination_count(&Chromosome::empty(10, 4)), 1);
    }

    #[test]
    fn test_each_view_has_one_section_per_course() {
        let config = config();
        let views = ParallelClassDecomposer::new(&config).decompose(&grid());
        assert_eq!(views.len(), 6);

        for (i, view) in views.iter().enumerate() {
            // One section of course 1, one of course 2, both sessions of course 3.
            assert_eq!(view.count_nonzero(), 4);
            let section_1 = (i % 2 + 1) as u32;
            let section_2 = (i % 3 + 1) as u32;
            assert!(view.contains(SessionCode::new(1, section_1, 1)));
            assert!(view.contains(SessionCode::new(2, section_2, 1)));
            assert!(view.contains(SessionCode::new(3, 1, 1)));
            assert!(view.contains(SessionCode::new(3, 1, 2)));
        }
    }

    #[test]
    fn test_views_keep_positions() {
        let config = config();
        let views = ParallelClassDecomposer::new(&config).decompose(&grid());
        assert_eq!(views[1].get(0, 1), 121);
        assert_eq!(views[1].get(0, 0), 0);
        assert_eq!(views[2].get(1, 2), 231);
    }
}
