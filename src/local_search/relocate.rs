//! Single-node relocation, within a route or between routes.
//!
//! # Algorithm
//!
//! For every node, price its removal
//!
//! ```text
//! removal = t(a, b) - t(a, x) - t(x, b)
//! ```
//!
//! (the whole route value when `x` is alone, so the fixed cost is saved),
//! then every insertion point `(c, e)` in every route
//!
//! ```text
//! insertion = t'(c, x) + t'(x, e) - t'(c, e)
//! ```
//!
//! (plus the fixed cost when the target vehicle was unused). Arc costs are
//! per vehicle, so moving a node between vehicles reprices its arcs.
//!
//! # Complexity
//!
//! O(n² + n × V) per evaluation.
//!
//! # Reference
//!
//! Savelsbergh, M.W.P. (1992). "The Vehicle Routing Problem with Time
//! Windows: Minimizing Route Duration", *ORSA Journal on Computing* 4(2).

use super::moves::{improves, Candidate, Move};
use super::Neighborhood;
use crate::evaluation::ArcObjective;

/// Finds the best improving relocate move, if any.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData, Solution};
/// use u_fleet::evaluation::{CapacityTracker, CostEvaluator};
/// use u_fleet::local_search::{best_relocate, Neighborhood};
///
/// let data = InstanceData::new(
///     vec![
///         vec![0.0, 1.0, 2.0],
///         vec![1.0, 0.0, 1.0],
///         vec![2.0, 1.0, 0.0],
///     ],
///     2,
/// )
/// .with_fixed_costs(vec![0.0, 5.0]);
/// let instance = Instance::new(&data).unwrap();
/// let sol = Solution::from_sequences(vec![vec![1], vec![2]]);
/// let tracker = CapacityTracker::from_solution(&instance, &sol).unwrap();
/// let eval = CostEvaluator::new(&instance);
///
/// // node 2 joins vehicle 0 and vehicle 1's fixed cost is saved
/// let best = best_relocate(&Neighborhood::new(&instance, &sol, &tracker, &eval)).unwrap();
/// assert!(best.delta < 0);
/// ```
pub fn best_relocate<O: ArcObjective>(nb: &Neighborhood<'_, '_, O>) -> Option<Candidate> {
    let depot = nb.depot();
    let routes = nb.solution.routes();
    let mut best: Option<Candidate> = None;

    for from in routes {
        let fv = from.vehicle_id();
        for fp in 0..from.len() {
            let node = from.nodes()[fp];
            let a = from.prev(fp, depot);
            let b = from.at(fp + 1, depot);
            let removal = if from.len() == 1 {
                -nb.route_value(from)
            } else {
                nb.t(fv, a, b) - nb.t(fv, a, node) - nb.t(fv, node, b)
            };

            for to in routes {
                let tv = to.vehicle_id();
                if tv == fv {
                    if from.len() < 2 {
                        continue;
                    }
                    for tp in 0..from.len() {
                        if tp == fp {
                            continue;
                        }
                        let (c, e) = nb.gap(from, fp, 1, tp);
                        let delta =
                            removal + nb.t(fv, c, node) + nb.t(fv, node, e) - nb.t(fv, c, e);
                        if improves(&best, delta) {
                            best = Some(relocate(fv, fp, tv, tp, delta));
                        }
                    }
                    continue;
                }

                if to.is_empty() {
                    let delta = removal
                        + nb.objective.fixed(tv)
                        + nb.t(tv, depot, node)
                        + nb.t(tv, node, depot);
                    if improves(&best, delta) && nb.tracker.can_append(tv, node) {
                        best = Some(relocate(fv, fp, tv, 0, delta));
                    }
                    continue;
                }

                if !nb.tracker.can_append(tv, node) {
                    continue;
                }
                for tp in 0..=to.len() {
                    let c = to.prev(tp, depot);
                    let e = to.at(tp, depot);
                    let delta = removal + nb.t(tv, c, node) + nb.t(tv, node, e) - nb.t(tv, c, e);
                    if improves(&best, delta) {
                        best = Some(relocate(fv, fp, tv, tp, delta));
                    }
                }
            }
        }
    }
    best
}

fn relocate(fv: usize, fp: usize, tv: usize, tp: usize, delta: i128) -> Candidate {
    Candidate::new(
        Move::Relocate {
            from_vehicle: fv,
            from_pos: fp,
            to_vehicle: tv,
            to_pos: tp,
        },
        delta,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::{CapacityTracker, CostEvaluator};
    use crate::models::{Instance, InstanceData, Solution};
    use crate::testing::line_instance;

    fn best(instance: &Instance, sequences: Vec<Vec<usize>>) -> Option<Candidate> {
        let sol = Solution::from_sequences(sequences);
        let tracker = CapacityTracker::from_solution(instance, &sol).expect("fits");
        let eval = CostEvaluator::new(instance);
        best_relocate(&Neighborhood::new(instance, &sol, &tracker, &eval))
    }

    #[test]
    fn test_intra_route_fix() {
        let instance = line_instance(3, 1, 10.0);
        // 0→2→1→3→0 = 8, optimum 6
        let c = best(&instance, vec![vec![2, 1, 3]]).expect("improvable");
        assert_eq!(c.delta, -2_000 * 1_000);
    }

    #[test]
    fn test_respects_capacity() {
        let instance = line_instance(4, 2, 2.0);
        // moving 3 next to 1/2 would help but vehicle 0 is full
        let c = best(&instance, vec![vec![1, 2], vec![3, 4]]);
        assert!(c.is_none_or(|c| match c.mv {
            Move::Relocate {
                from_vehicle,
                to_vehicle,
                ..
            } => from_vehicle == to_vehicle,
            _ => false,
        }));
    }

    #[test]
    fn test_moves_to_cheaper_vehicle() {
        let data = InstanceData::new(vec![vec![0.0, 10.0], vec![10.0, 0.0]], 2)
            .with_per_km_costs(vec![3.0, 1.0]);
        let instance = Instance::new(&data).expect("valid");
        let c = best(&instance, vec![vec![1], vec![]]).expect("improvable");
        assert_eq!(
            c.mv,
            Move::Relocate {
                from_vehicle: 0,
                from_pos: 0,
                to_vehicle: 1,
                to_pos: 0
            }
        );
        // 20 distance at rate 3 → rate 1
        assert_eq!(c.delta, -(3_000 - 1_000) * 20_000);
    }

    #[test]
    fn test_fixed_cost_blocks_opening_vehicle() {
        let data = InstanceData::new(vec![vec![0.0, 10.0], vec![10.0, 0.0]], 2)
            .with_per_km_costs(vec![3.0, 1.0])
            .with_fixed_costs(vec![0.0, 100.0]);
        let instance = Instance::new(&data).expect("valid");
        assert!(best(&instance, vec![vec![1], vec![]]).is_none());
    }
}
