use crate::genome::Genome;
use crate::metrics::Objectives;
use crate::nsga::sorting::ParetoFronts;

/// Lower bound on an objective's range within a front.
pub const MIN_RANGE: f64 = 1e-9;

/// Crowding distances of the members of one front.
///
/// Fronts of at most two members are all boundary points and get infinity. For
/// larger fronts every objective contributes: boundary members become infinite and
/// interior members add the normalized gap between their neighbours.
pub fn crowding_distances(objectives: &[Objectives]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let mut distances = vec![0.0; n];
    let objective_count = objectives[0].len();

    for m in 0..objective_count {
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| objectives[a][m].total_cmp(&objectives[b][m]));

        let min = objectives[order[0]][m];
        let max = objectives[order[n - 1]][m];
        let mut range = max - min;
        if range <= 0.0 {
            range = MIN_RANGE;
        }

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;
        for k in 1..n - 1 {
            let gap = objectives[order[k + 1]][m] - objectives[order[k - 1]][m];
            distances[order[k]] += gap / range;
        }
    }

    distances
}

/// Assigns crowding distances front by front. Returns the distances indexed like
/// `population`.
pub fn assign_crowding_distance(population: &mut [Genome], fronts: &ParetoFronts) -> Vec<f64> {
    let mut all = vec![0.0; population.len()];
    for front in fronts {
        let objectives: Vec<Objectives> =
            front.iter().map(|&i| population[i].objectives()).collect();
        for (&i, distance) in front.iter().zip(crowding_distances(&objectives)) {
            population[i].set_crowding_distance(distance);
            all[i] = distance;
        }
    }
    all
}
