//! Fast non-dominated sorting over two-objective vectors.
//!
//! Objectives are first normalized under a direction mask so that smaller is always
//! better, then every pair is compared both ways. Front 0 holds the genomes nobody
//! dominates; later fronts are peeled off by decrementing domination counts.

use rayon::prelude::*;

use crate::genome::Genome;
use crate::metrics::{Direction, Objectives, OBJECTIVE_DIRECTIONS};

/// Ordered partition of a pool into fronts of indices, rank 0 first.
pub type ParetoFronts = Vec<Vec<usize>>;

/// Everything one sort learns about a pool.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SortOutcome {
    pub fronts: ParetoFronts,
    /// Front index per pool member.
    pub ranks: Vec<usize>,
    /// Number of pool members dominating each member.
    pub domination_counts: Vec<usize>,
    /// Indices each member dominates, ascending.
    pub dominated: Vec<Vec<usize>>,
}

/// Returns `true` if `a` dominates `b`: no worse in every objective and strictly
/// better in at least one, after normalization by `directions`.
pub fn dominates(a: &[f64], b: &[f64], directions: &[Direction]) -> bool {
    let mut strictly_better = false;
    for ((&x, &y), &direction) in a.iter().zip(b).zip(directions) {
        let (x, y) = (direction.normalize(x), direction.normalize(y));
        if x > y {
            return false;
        }
        if x < y {
            strictly_better = true;
        }
    }
    strictly_better
}

/// Sorts `objectives` into Pareto fronts.
///
/// The pairwise comparison runs on the rayon pool once `objectives.len()` reaches
/// `parallel_threshold`; the outcome is identical either way.
pub fn non_dominated_sort(
    objectives: &[Objectives],
    directions: &[Direction],
    parallel_threshold: usize,
) -> SortOutcome {
    let n = objectives.len();
    if n == 0 {
        return SortOutcome::default();
    }

    let compare = |i: usize| -> (Vec<usize>, usize) {
        let mut dominated = Vec::new();
        let mut count = 0;
        for j in 0..n {
            if i == j {
                continue;
            }
            if dominates(&objectives[i], &objectives[j], directions) {
                dominated.push(j);
            } else if dominates(&objectives[j], &objectives[i], directions) {
                count += 1;
            }
        }
        (dominated, count)
    };

    let relations: Vec<(Vec<usize>, usize)> = if n >= parallel_threshold {
        (0..n).into_par_iter().map(compare).collect()
    } else {
        (0..n).map(compare).collect()
    };
    let (dominated, domination_counts): (Vec<Vec<usize>>, Vec<usize>) =
        relations.into_iter().unzip();

    let mut remaining = domination_counts.clone();
    let mut ranks = vec![0; n];
    let mut current: Vec<usize> = (0..n).filter(|&i| remaining[i] == 0).collect();
    let mut fronts = ParetoFronts::new();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            ranks[i] = fronts.len();
            for &j in &dominated[i] {
                remaining[j] -= 1;
                if remaining[j] == 0 {
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    SortOutcome {
        fronts,
        ranks,
        domination_counts,
        dominated,
    }
}

/// Evaluates every genome's objectives, in parallel once the pool reaches
/// `parallel_threshold`.
pub fn evaluate(population: &[Genome], parallel_threshold: usize) -> Vec<Objectives> {
    if population.len() >= parallel_threshold {
        population.par_iter().map(Genome::objectives).collect()
    } else {
        population.iter().map(Genome::objectives).collect()
    }
}

/// Sorts a population in place: resets each genome's sorting state, then records
/// rank, domination count and dominated peers. Returns the fronts.
pub fn sort_population(population: &mut [Genome], parallel_threshold: usize) -> ParetoFronts {
    for genome in population.iter_mut() {
        genome.reset_sorting_state();
    }

    let objectives = evaluate(population, parallel_threshold);
    let outcome = non_dominated_sort(&objectives, &OBJECTIVE_DIRECTIONS, parallel_threshold);

    let SortOutcome {
        fronts,
        ranks,
        domination_counts,
        dominated,
    } = outcome;
    for (((genome, rank), count), dominated) in population
        .iter_mut()
        .zip(ranks)
        .zip(domination_counts)
        .zip(dominated)
    {
        genome.set_sorting_state(Some(rank), count, dominated);
    }
    fronts
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN_MAX: [Direction; 2] = [Direction::Minimize, Direction::Maximize];

    fn brute_force_front(objectives: &[Objectives]) -> Vec<usize> {
        (0..objectives.len())
            .filter(|&i| {
                !(0..objectives.len())
                    .any(|j| dominates(&objectives[j], &objectives[i], &MIN_MAX))
            })
            .collect()
    }

    #[test]
    fn test_dominates_respects_directions() {
        assert!(dominates(&[1.0, 5.0], &[2.0, 4.0], &MIN_MAX));
        assert!(!dominates(&[2.0, 4.0], &[1.0, 5.0], &MIN_MAX));
        assert!(!dominates(&[1.0, 5.0], &[1.0, 5.0], &MIN_MAX));
        assert!(!dominates(&[3.0, 3.0], &[2.0, 2.0], &MIN_MAX));
    }

    #[test]
    fn test_known_fronts() {
        let objectives = [[1.0, 5.0], [2.0, 4.0], [3.0, 3.0], [2.0, 2.0]];
        let outcome = non_dominated_sort(&objectives, &MIN_MAX, usize::MAX);

        assert_eq!(outcome.fronts, vec![vec![0], vec![1], vec![2, 3]]);
        assert_eq!(outcome.ranks, vec![0, 1, 2, 2]);
        assert_eq!(outcome.domination_counts, vec![0, 1, 2, 2]);
        assert_eq!(outcome.dominated[0], vec![1, 2, 3]);
        assert_eq!(outcome.fronts[0], brute_force_front(&objectives));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let objectives: Vec<Objectives> = (0..40)
            .map(|i| [(i * 7 % 13) as f64, (i * 5 % 11) as f64])
            .collect();
        let sequential = non_dominated_sort(&objectives, &MIN_MAX, usize::MAX);
        let parallel = non_dominated_sort(&objectives, &MIN_MAX, 0);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_fronts_partition_pool() {
        let objectives: Vec<Objectives> = (0..25)
            .map(|i| [(i % 5) as f64, (i / 5) as f64])
            .collect();
        let outcome = non_dominated_sort(&objectives, &MIN_MAX, usize::MAX);

        let mut all: Vec<usize> = outcome.fronts.iter().flatten().copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..25).collect::<Vec<_>>());
        assert!(outcome.fronts.iter().all(|front| !front.is_empty()));
        assert_eq!(outcome.fronts[0], brute_force_front(&objectives));
    }

    #[test]
    fn test_identical_vectors_share_a_front() {
        let objectives = [[1.0, 1.0], [1.0, 1.0], [1.0, 1.0]];
        let outcome = non_dominated_sort(&objectives, &MIN_MAX, usize::MAX);
        assert_eq!(outcome.fronts, vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_empty_pool() {
        let outcome = non_dominated_sort(&[], &MIN_MAX, 1);
        assert!(outcome.fronts.is_empty());
    }
}
