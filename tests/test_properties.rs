//! Property-based tests for the timetable invariants and the NSGA-II building blocks.

use genetic_timetable::{
    breeding::{CrossoverMethod, CrossoverOperator, MutationOperator},
    constraints::ConstraintChecker,
    generator::Generator,
    metrics::{Direction, Objectives},
    nsga::{crowding_distances, dominates, non_dominated_sort, select_survivors},
    rng::RandomNumberGenerator,
    timetable::{Configuration, Course, Room, SessionCode},
};
use proptest::prelude::*;

const MIN_MAX: [Direction; 2] = [Direction::Minimize, Direction::Maximize];

/// Up to three courses as `(classes, credits)`.
fn curriculum_strategy() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((1u32..=3, 1u32..=2), 1..=3)
}

fn objectives_strategy() -> impl Strategy<Value = Vec<Objectives>> {
    prop::collection::vec((0u8..20, 0u8..20), 1..40).prop_map(|points| {
        points
            .into_iter()
            .map(|(a, b)| [a as f64, b as f64])
            .collect()
    })
}

fn build_config(curriculum: &[(u32, u32)]) -> Configuration {
    Configuration::builder()
        .time_slots(0..15)
        .rooms((1..=7).map(|id| (id, Room::new(-6.89 + id as f64 * 1e-3, 107.61, 10 * id))))
        .courses(
            curriculum
                .iter()
                .enumerate()
                .map(|(i, &(classes, credits))| Course::new(i as u32 + 1, classes, credits)),
        )
        .build()
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_generator_output_is_valid(curriculum in curriculum_strategy(), seed in any::<u64>()) {
        let config = build_config(&curriculum);
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let chromosome = Generator::new(&config).generate(&mut rng).unwrap();

        prop_assert_eq!(chromosome.count_nonzero(), config.total_duration());
        prop_assert!(ConstraintChecker::new(&config).is_valid(&chromosome));
    }

    #[test]
    fn prop_crossover_conserves_sessions(
        curriculum in curriculum_strategy(),
        seed in any::<u64>(),
        row_based in any::<bool>(),
    ) {
        let config = build_config(&curriculum);
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let generator = Generator::new(&config);
        let a = generator.generate(&mut rng).unwrap();
        let b = generator.generate(&mut rng).unwrap();
        let method = if row_based { CrossoverMethod::RowBased } else { CrossoverMethod::ColumnBased };

        let child = CrossoverOperator::new(method, &config).run(&a, &b, &mut rng).unwrap();
        prop_assert_eq!(child.code_counts(), a.code_counts());
    }

    #[test]
    fn prop_mutation_preserves_validity(
        curriculum in curriculum_strategy(),
        seed in any::<u64>(),
        points in 1usize..10,
    ) {
        let config = build_config(&curriculum);
        let mut rng = RandomNumberGenerator::from_seed(seed);
        let mut chromosome = Generator::new(&config).generate(&mut rng).unwrap();
        let before = chromosome.code_counts();

        MutationOperator::new(points, &config).mutate(&mut chromosome, &mut rng);
        prop_assert_eq!(chromosome.code_counts(), before);
        prop_assert!(ConstraintChecker::new(&config).is_valid(&chromosome));
    }

    #[test]
    fn prop_first_front_is_non_dominated_set(objectives in objectives_strategy()) {
        let outcome = non_dominated_sort(&objectives, &MIN_MAX, usize::MAX);

        let expected: Vec<usize> = (0..objectives.len())
            .filter(|&i| !objectives.iter().any(|o| dominates(o, &objectives[i], &MIN_MAX)))
            .collect();
        prop_assert_eq!(&outcome.fronts[0], &expected);

        // Every later member is dominated by someone exactly one front earlier.
        for (rank, front) in outcome.fronts.iter().enumerate().skip(1) {
            for &i in front {
                prop_assert!(outcome.fronts[rank - 1]
                    .iter()
                    .any(|&j| dominates(&objectives[j], &objectives[i], &MIN_MAX)));
            }
        }
    }

    #[test]
    fn prop_crowding_boundaries_are_infinite(objectives in objectives_strategy()) {
        let distances = crowding_distances(&objectives);
        prop_assert_eq!(distances.len(), objectives.len());
        prop_assert!(distances.iter().all(|&d| d >= 0.0));
        for m in 0..2 {
            let lowest = (0..objectives.len())
                .min_by(|&a, &b| objectives[a][m].total_cmp(&objectives[b][m]))
                .unwrap();
            let highest = (0..objectives.len())
                .max_by(|&a, &b| objectives[a][m].total_cmp(&objectives[b][m]))
                .unwrap();
            prop_assert!(distances[lowest].is_infinite());
            prop_assert!(distances[highest].is_infinite());
        }
    }

    #[test]
    fn prop_survivors_fill_target(objectives in objectives_strategy(), target in 1usize..40) {
        prop_assume!(target <= objectives.len());
        let outcome = non_dominated_sort(&objectives, &MIN_MAX, usize::MAX);
        let mut crowding = vec![0.0; objectives.len()];
        for front in &outcome.fronts {
            let points: Vec<Objectives> = front.iter().map(|&i| objectives[i]).collect();
            for (&i, d) in front.iter().zip(crowding_distances(&points)) {
                crowding[i] = d;
            }
        }

        let mut survivors = select_survivors(&outcome.fronts, &crowding, target);
        prop_assert_eq!(survivors.len(), target);
        survivors.sort_unstable();
        survivors.dedup();
        prop_assert_eq!(survivors.len(), target);
    }

    #[test]
    fn prop_twin_is_an_involution(subject in 1u32..100, class in 1u32..=9, parity in 1u32..=2) {
        let code = SessionCode::new(subject, class, parity);
        prop_assert_eq!(code.twin().twin(), code);
        prop_assert!(code.twin().same_section(code));
        prop_assert_ne!(code.twin().parity(), code.parity());
    }
}
