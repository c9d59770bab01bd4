//! Cheapest-feasible-arc insertion.
//!
//! Every vehicle starts with a depot-only route. At each step, over all
//! unassigned nodes, all vehicles and all insertion positions whose vehicle
//! can still carry the node in every dimension, pick the insertion with the
//! smallest distance increase
//!
//! ```text
//! delta = d(prev, node) + d(node, next) - d(prev, next)
//! ```
//!
//! and commit it. Ties go to the lowest vehicle, then the lowest node, then
//! the earliest position, so the result is deterministic.
//!
//! # Complexity
//!
//! O(n² × (V + n)) overall.

use tracing::debug;

use crate::error::{Result, RoutingError};
use crate::evaluation::CapacityTracker;
use crate::models::{Instance, Solution};

#[derive(Debug, Clone, Copy)]
struct Insertion {
    vehicle: usize,
    node: usize,
    pos: usize,
    delta: i64,
}

/// Constructs an initial feasible solution by cheapest-arc insertion.
///
/// Fails with [`RoutingError::InfeasibleInstance`] listing the nodes that
/// could not be placed when no vehicle has room left for any of them.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData};
/// use u_fleet::constructive::cheapest_arc_insertion;
///
/// let data = InstanceData::new(
///     vec![
///         vec![0.0, 1.0, 2.0, 3.0],
///         vec![1.0, 0.0, 1.0, 2.0],
///         vec![2.0, 1.0, 0.0, 1.0],
///         vec![3.0, 2.0, 1.0, 0.0],
///     ],
///     2,
/// )
/// .with_dimension("load", vec![0.0, 1.0, 1.0, 1.0], vec![2.0, 2.0]);
/// let instance = Instance::new(&data).unwrap();
///
/// let solution = cheapest_arc_insertion(&instance).unwrap();
/// assert_eq!(solution.num_served(), 3);
/// assert!(solution.violations(&instance).is_empty());
/// ```
pub fn cheapest_arc_insertion(instance: &Instance) -> Result<Solution> {
    let oversized = oversized_nodes(instance);
    if !oversized.is_empty() {
        debug!(?oversized, "nodes exceed every vehicle capacity");
        return Err(RoutingError::InfeasibleInstance {
            unassigned: oversized,
        });
    }

    let mut solution = Solution::new(instance.num_vehicles());
    let mut tracker = CapacityTracker::new(instance);
    let mut unassigned: Vec<usize> = instance.customers().collect();

    while !unassigned.is_empty() {
        let Some(best) = best_insertion(instance, &solution, &tracker, &unassigned) else {
            debug!(
                remaining = unassigned.len(),
                "construction ran out of capacity"
            );
            return Err(RoutingError::InfeasibleInstance { unassigned });
        };
        tracker.append(best.vehicle, best.node)?;
        solution.route_mut(best.vehicle).insert(best.pos, best.node);
        unassigned.retain(|&n| n != best.node);
    }

    debug!(
        vehicles = solution.used_vehicles().count(),
        "cheapest-arc construction complete"
    );
    Ok(solution)
}

/// Nodes whose demand in some dimension exceeds the largest capacity.
fn oversized_nodes(instance: &Instance) -> Vec<usize> {
    if instance.num_vehicles() == 0 {
        return instance.customers().collect();
    }
    let largest: Vec<i64> = (0..instance.num_dimensions())
        .map(|d| {
            instance
                .vehicles()
                .iter()
                .map(|v| v.capacity(d))
                .max()
                .unwrap_or(0)
        })
        .collect();
    instance
        .customers()
        .filter(|&node| {
            instance
                .demand(node)
                .iter()
                .zip(&largest)
                .any(|(d, cap)| d > cap)
        })
        .collect()
}

fn best_insertion(
    instance: &Instance,
    solution: &Solution,
    tracker: &CapacityTracker<'_>,
    unassigned: &[usize],
) -> Option<Insertion> {
    let depot = instance.depot();
    let mut best: Option<Insertion> = None;

    for route in solution.routes() {
        let vehicle = route.vehicle_id();
        for &node in unassigned {
            if !tracker.can_append(vehicle, node) {
                continue;
            }
            for pos in 0..=route.len() {
                let prev = route.prev(pos, depot);
                let next = route.at(pos, depot);
                let added = instance.distance(prev, node) + instance.distance(node, next);
                let delta = added - instance.distance(prev, next);
                if best.is_none_or(|b| delta < b.delta) {
                    best = Some(Insertion {
                        vehicle,
                        node,
                        pos,
                        delta,
                    });
                }
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceData;
    use crate::testing::{fleet_instance, line_instance};

    #[test]
    fn test_single_vehicle_line() {
        let instance = line_instance(5, 1, 10.0);
        let sol = cheapest_arc_insertion(&instance).expect("feasible");
        assert_eq!(sol.route(0).len(), 5);
        assert!(sol.violations(&instance).is_empty());
        // a line is optimally served out and back: 2 × 5
        let eval = crate::evaluation::CostEvaluator::new(&instance);
        assert_eq!(eval.route_distance(sol.route(0)), 10_000);
    }

    #[test]
    fn test_tie_break_prefers_lowest_vehicle_and_node() {
        let instance = line_instance(2, 3, 1.0);
        let sol = cheapest_arc_insertion(&instance).expect("feasible");
        // node 1 is cheapest and goes to vehicle 0; node 2 no longer fits there
        assert_eq!(sol.route(0).nodes(), &[1]);
        assert_eq!(sol.route(1).nodes(), &[2]);
        assert!(sol.route(2).is_empty());
    }

    #[test]
    fn test_fleet_instance_is_feasible() {
        let instance = fleet_instance();
        let sol = cheapest_arc_insertion(&instance).expect("feasible");
        assert!(sol.violations(&instance).is_empty());
        assert_eq!(sol.num_served(), 7);
    }

    #[test]
    fn test_total_demand_exceeds_fleet() {
        let instance = line_instance(5, 2, 2.0);
        match cheapest_arc_insertion(&instance) {
            Err(RoutingError::InfeasibleInstance { unassigned }) => {
                assert_eq!(unassigned.len(), 1);
            }
            other => panic!("expected infeasible, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_node() {
        let data = InstanceData::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 2)
            .with_dimension("weight", vec![0.0, 5.0], vec![4.0, 3.0]);
        let instance = Instance::new(&data).expect("valid");
        assert_eq!(
            cheapest_arc_insertion(&instance),
            Err(RoutingError::InfeasibleInstance {
                unassigned: vec![1]
            })
        );
    }

    #[test]
    fn test_no_vehicles() {
        let data = InstanceData::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 0);
        let instance = Instance::new(&data).expect("valid");
        assert!(cheapest_arc_insertion(&instance)
            .unwrap_err()
            .is_infeasible());
    }

    #[test]
    fn test_depot_only() {
        let data = InstanceData::new(vec![vec![0.0]], 2);
        let instance = Instance::new(&data).expect("valid");
        let sol = cheapest_arc_insertion(&instance).expect("trivially feasible");
        assert_eq!(sol.num_served(), 0);
    }
}
