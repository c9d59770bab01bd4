//! Solution and violation types.

use super::{Instance, Route};

/// A type of invariant violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Cumulative load of a route exceeds the vehicle capacity in one dimension.
    CapacityExceeded {
        /// Vehicle (and route) index.
        vehicle: usize,
        /// Dimension index.
        dimension: usize,
        /// Scaled load.
        load: i64,
        /// Scaled capacity.
        capacity: i64,
    },
    /// A non-depot node is not served by any route.
    Unserved {
        /// Node ID.
        node: usize,
    },
    /// A node appears more than once across the solution.
    Duplicated {
        /// Node ID.
        node: usize,
    },
    /// A route visits the depot or an unknown node in its interior.
    InvalidNode {
        /// Vehicle (and route) index.
        vehicle: usize,
        /// Offending node ID.
        node: usize,
    },
    /// The number of routes differs from the fleet size.
    FleetMismatch {
        /// Number of routes in the solution.
        routes: usize,
        /// Number of vehicles in the instance.
        vehicles: usize,
    },
}

/// An invariant violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

/// A complete assignment: exactly one route per vehicle, indexed by vehicle.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Solution;
///
/// let mut sol = Solution::new(3);
/// sol.route_mut(1).push(4);
/// assert_eq!(sol.num_routes(), 3);
/// assert_eq!(sol.num_served(), 1);
/// assert_eq!(sol.used_vehicles().collect::<Vec<_>>(), vec![1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    routes: Vec<Route>,
}

impl Solution {
    /// Creates a solution where every vehicle is unused.
    pub fn new(num_vehicles: usize) -> Self {
        Self {
            routes: (0..num_vehicles).map(Route::new).collect(),
        }
    }

    /// Creates a solution from per-vehicle node sequences.
    pub fn from_sequences(sequences: Vec<Vec<usize>>) -> Self {
        Self {
            routes: sequences
                .into_iter()
                .enumerate()
                .map(|(v, nodes)| Route::with_nodes(v, nodes))
                .collect(),
        }
    }

    /// Returns the routes, one per vehicle.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Route of the given vehicle.
    #[inline]
    pub fn route(&self, vehicle: usize) -> &Route {
        &self.routes[vehicle]
    }

    /// Mutable route of the given vehicle.
    #[inline]
    pub fn route_mut(&mut self, vehicle: usize) -> &mut Route {
        &mut self.routes[vehicle]
    }

    /// Returns the number of routes (always the fleet size).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Total number of nodes served (across all routes).
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(|r| r.len()).sum()
    }

    /// Vehicles with a non-empty route.
    pub fn used_vehicles(&self) -> impl Iterator<Item = usize> + '_ {
        self.routes
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.vehicle_id())
    }

    /// Checks the partition and capacity invariants against an instance.
    ///
    /// An empty result means every non-depot node is served exactly once and
    /// every route fits its vehicle in every dimension.
    pub fn violations(&self, instance: &Instance) -> Vec<Violation> {
        let mut violations = Vec::new();
        if self.routes.len() != instance.num_vehicles() {
            violations.push(Violation::new(ViolationType::FleetMismatch {
                routes: self.routes.len(),
                vehicles: instance.num_vehicles(),
            }));
            return violations;
        }

        let n = instance.num_nodes();
        let mut seen = vec![0usize; n];
        for route in &self.routes {
            let vehicle = instance.vehicle(route.vehicle_id());
            let mut load = vec![0i64; instance.num_dimensions()];
            for &node in route.nodes() {
                if node >= n || node == instance.depot() {
                    violations.push(Violation::new(ViolationType::InvalidNode {
                        vehicle: route.vehicle_id(),
                        node,
                    }));
                    continue;
                }
                seen[node] += 1;
                for (l, d) in load.iter_mut().zip(instance.demand(node)) {
                    *l += d;
                }
            }
            for (dimension, &l) in load.iter().enumerate() {
                if l > vehicle.capacity(dimension) {
                    violations.push(Violation::new(ViolationType::CapacityExceeded {
                        vehicle: route.vehicle_id(),
                        dimension,
                        load: l,
                        capacity: vehicle.capacity(dimension),
                    }));
                }
            }
        }

        for node in instance.customers() {
            match seen[node] {
                0 => violations.push(Violation::new(ViolationType::Unserved { node })),
                1 => {}
                _ => violations.push(Violation::new(ViolationType::Duplicated { node })),
            }
        }
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceData;

    fn instance() -> Instance {
        let data = InstanceData::new(
            vec![
                vec![0.0, 1.0, 1.0, 1.0],
                vec![1.0, 0.0, 1.0, 1.0],
                vec![1.0, 1.0, 0.0, 1.0],
                vec![1.0, 1.0, 1.0, 0.0],
            ],
            2,
        )
        .with_dimension("weight", vec![0.0, 2.0, 2.0, 1.0], vec![4.0, 2.0]);
        Instance::new(&data).expect("valid")
    }

    #[test]
    fn test_solution_empty() {
        let sol = Solution::new(2);
        assert_eq!(sol.num_routes(), 2);
        assert_eq!(sol.num_served(), 0);
        assert_eq!(sol.used_vehicles().count(), 0);
        assert_eq!(sol.route(1).vehicle_id(), 1);
    }

    #[test]
    fn test_valid_solution() {
        let sol = Solution::from_sequences(vec![vec![1, 2], vec![3]]);
        assert!(sol.violations(&instance()).is_empty());
        assert_eq!(sol.num_served(), 3);
    }

    #[test]
    fn test_capacity_violation() {
        let sol = Solution::from_sequences(vec![vec![1], vec![2, 3]]);
        assert_eq!(
            sol.violations(&instance()),
            vec![Violation::new(ViolationType::CapacityExceeded {
                vehicle: 1,
                dimension: 0,
                load: 3_000,
                capacity: 2_000,
            })]
        );
    }

    #[test]
    fn test_partition_violations() {
        let sol = Solution::from_sequences(vec![vec![1, 1], vec![0]]);
        let kinds: Vec<_> = sol
            .violations(&instance())
            .into_iter()
            .map(|v| v.kind)
            .collect();
        let invalid = ViolationType::InvalidNode {
            vehicle: 1,
            node: 0,
        };
        assert!(kinds.contains(&invalid));
        assert!(kinds.contains(&ViolationType::Duplicated { node: 1 }));
        assert!(kinds.contains(&ViolationType::Unserved { node: 2 }));
        assert!(kinds.contains(&ViolationType::Unserved { node: 3 }));
    }

    #[test]
    fn test_fleet_mismatch() {
        let sol = Solution::new(3);
        assert_eq!(
            sol.violations(&instance()),
            vec![Violation::new(ViolationType::FleetMismatch {
                routes: 3,
                vehicles: 2
            })]
        );
    }
}
