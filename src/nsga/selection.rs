use crate::nsga::sorting::ParetoFronts;

/// Elitist environmental selection.
///
/// Takes whole fronts while they fit into `target`, then fills the remainder from
/// the first overflowing front in order of descending crowding distance. Ties keep
/// their order within the front. Returns pool indices; fewer than `target` only if
/// the fronts hold fewer members.
pub fn select_survivors(fronts: &ParetoFronts, crowding: &[f64], target: usize) -> Vec<usize> {
    let mut survivors = Vec::with_capacity(target);

    for front in fronts {
        let room = target - survivors.len();
        if room == 0 {
            break;
        }
        if front.len() <= room {
            survivors.extend_from_slice(front);
            continue;
        }

        let mut ordered = front.clone();
        ordered.sort_by(|&a, &b| crowding[b].total_cmp(&crowding[a]));
        survivors.extend_from_slice(&ordered[..room]);
        break;
    }

    survivors
}
