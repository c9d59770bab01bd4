//! Per-route, per-dimension cumulative load bookkeeping.

use crate::error::{Result, RoutingError};
use crate::models::{Instance, Solution};

/// Tracks the cumulative load of every vehicle's route in every dimension.
///
/// Dimensions are independent: a route fits only if it fits in each one.
/// The tracker never clamps; committing a load that does not fit is a
/// [`RoutingError::CapacityViolation`].
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData};
/// use u_fleet::evaluation::CapacityTracker;
///
/// let data = InstanceData::new(vec![vec![0.0, 1.0], vec![1.0, 0.0]], 1)
///     .with_dimension("weight", vec![0.0, 2.0], vec![3.0]);
/// let instance = Instance::new(&data).unwrap();
///
/// let mut tracker = CapacityTracker::new(&instance);
/// assert!(tracker.can_append(0, 1));
/// tracker.append(0, 1).unwrap();
/// assert!(!tracker.can_append(0, 1));
/// assert!(tracker.append(0, 1).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct CapacityTracker<'a> {
    instance: &'a Instance,
    loads: Vec<i64>,
}

impl<'a> CapacityTracker<'a> {
    /// Creates a tracker with every route empty.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            loads: vec![0; instance.num_vehicles() * instance.num_dimensions()],
        }
    }

    /// Creates a tracker holding the loads of an existing solution.
    pub fn from_solution(instance: &'a Instance, solution: &Solution) -> Result<Self> {
        let mut tracker = Self::new(instance);
        for route in solution.routes() {
            for &node in route.nodes() {
                tracker.append(route.vehicle_id(), node)?;
            }
        }
        Ok(tracker)
    }

    /// Current load of a vehicle's route, one entry per dimension.
    pub fn load(&self, vehicle: usize) -> &[i64] {
        let d = self.instance.num_dimensions();
        &self.loads[vehicle * d..(vehicle + 1) * d]
    }

    /// Returns `true` if `node` fits on top of the vehicle's current load in
    /// every dimension.
    pub fn can_append(&self, vehicle: usize, node: usize) -> bool {
        self.overflowing_dimension(vehicle, node).is_none()
    }

    fn overflowing_dimension(&self, vehicle: usize, node: usize) -> Option<usize> {
        let capacities = self.instance.vehicle(vehicle).capacities();
        self.load(vehicle)
            .iter()
            .zip(self.instance.demand(node))
            .zip(capacities)
            .position(|((load, demand), cap)| load + demand > *cap)
    }

    /// Adds the node's demand to the vehicle's load.
    pub fn append(&mut self, vehicle: usize, node: usize) -> Result<()> {
        if let Some(dimension) = self.overflowing_dimension(vehicle, node) {
            return Err(RoutingError::CapacityViolation {
                vehicle,
                node: Some(node),
                dimension: self.instance.dimensions()[dimension].name().to_string(),
            });
        }
        let d = self.instance.num_dimensions();
        let demand = self.instance.demand(node);
        for (load, dem) in self.loads[vehicle * d..(vehicle + 1) * d]
            .iter_mut()
            .zip(demand)
        {
            *load += dem;
        }
        Ok(())
    }

    /// Subtracts the node's demand from the vehicle's load.
    ///
    /// Fails with [`RoutingError::EngineError`] if the load would become
    /// negative, which means the node was never appended to that vehicle.
    pub fn remove(&mut self, vehicle: usize, node: usize) -> Result<()> {
        let demand = self.instance.demand(node);
        if self.load(vehicle).iter().zip(demand).any(|(l, d)| l < d) {
            return Err(RoutingError::engine(format!(
                "node {node} is not loaded on vehicle {vehicle}"
            )));
        }
        let d = self.instance.num_dimensions();
        for (load, dem) in self.loads[vehicle * d..(vehicle + 1) * d]
            .iter_mut()
            .zip(demand)
        {
            *load -= dem;
        }
        Ok(())
    }

    /// Returns `true` if the vehicle's route still fits after taking out
    /// `removed` and adding `added`, in every dimension.
    pub fn can_exchange(&self, vehicle: usize, removed: &[usize], added: &[usize]) -> bool {
        self.exchange_overflow(vehicle, removed, added).is_none()
    }

    /// Like [`can_exchange`](Self::can_exchange) but reports the first
    /// overflowing dimension as a [`RoutingError::CapacityViolation`].
    ///
    /// The violation names a node only when exactly one node is added;
    /// otherwise it is the added nodes together that overflow.
    pub fn check_exchange(&self, vehicle: usize, removed: &[usize], added: &[usize]) -> Result<()> {
        let Some(dimension) = self.exchange_overflow(vehicle, removed, added) else {
            return Ok(());
        };
        let node = match added {
            [node] => Some(*node),
            _ => None,
        };
        Err(RoutingError::CapacityViolation {
            vehicle,
            node,
            dimension: self.instance.dimensions()[dimension].name().to_string(),
        })
    }

    fn exchange_overflow(
        &self,
        vehicle: usize,
        removed: &[usize],
        added: &[usize],
    ) -> Option<usize> {
        let capacities = self.instance.vehicle(vehicle).capacities();
        self.load(vehicle)
            .iter()
            .zip(capacities)
            .enumerate()
            .position(|(dim, (&load, &cap))| {
                let out: i64 = removed.iter().map(|&n| self.instance.demand(n)[dim]).sum();
                let inn: i64 = added.iter().map(|&n| self.instance.demand(n)[dim]).sum();
                load - out + inn > cap
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::InstanceData;
    use crate::testing::fleet_instance;

    fn two_dim() -> Instance {
        let data = InstanceData::new(
            vec![
                vec![0.0, 1.0, 1.0],
                vec![1.0, 0.0, 1.0],
                vec![1.0, 1.0, 0.0],
            ],
            2,
        )
        .with_dimension("volume", vec![0.0, 1.0, 5.0], vec![10.0, 5.0])
        .with_dimension("weight", vec![0.0, 4.0, 1.0], vec![4.0, 10.0]);
        Instance::new(&data).expect("valid")
    }

    #[test]
    fn test_dimensions_are_independent() {
        let instance = two_dim();
        let mut t = CapacityTracker::new(&instance);
        t.append(0, 1).expect("fits");
        // plenty of volume left, weight is full
        assert!(!t.can_append(0, 2));
        match t.append(0, 2) {
            Err(RoutingError::CapacityViolation { dimension, node, .. }) => {
                assert_eq!(dimension, "weight");
                assert_eq!(node, Some(2));
            }
            other => panic!("expected capacity violation, got {other:?}"),
        }
        assert_eq!(t.load(0), &[1_000, 4_000]);
    }

    #[test]
    fn test_remove() {
        let instance = two_dim();
        let mut t = CapacityTracker::new(&instance);
        t.append(1, 2).expect("fits");
        t.remove(1, 2).expect("loaded");
        assert_eq!(t.load(1), &[0, 0]);
        assert!(matches!(
            t.remove(1, 2),
            Err(RoutingError::EngineError { .. })
        ));
    }

    #[test]
    fn test_can_exchange() {
        let instance = two_dim();
        let mut t = CapacityTracker::new(&instance);
        t.append(1, 2).expect("fits");
        assert!(t.can_exchange(1, &[2], &[1]));
        assert!(!t.can_exchange(1, &[], &[1, 1]));
        assert!(t.can_exchange(0, &[], &[1]));
        assert!(!t.can_exchange(0, &[], &[1, 2]));
        assert!(t.check_exchange(1, &[2], &[1]).is_ok());
    }

    #[test]
    fn test_check_exchange_names_node_only_when_unambiguous() {
        let instance = two_dim();
        let mut t = CapacityTracker::new(&instance);
        t.append(1, 2).expect("fits");
        // node 1 alone overflows volume on vehicle 1
        assert_eq!(
            t.check_exchange(1, &[], &[1]),
            Err(RoutingError::CapacityViolation {
                vehicle: 1,
                node: Some(1),
                dimension: "volume".into(),
            })
        );
        // neither node 1 nor node 2 overflows vehicle 0 on its own
        assert!(t.can_exchange(0, &[], &[1]));
        assert!(t.can_exchange(0, &[], &[2]));
        assert_eq!(
            t.check_exchange(0, &[], &[1, 2]),
            Err(RoutingError::CapacityViolation {
                vehicle: 0,
                node: None,
                dimension: "weight".into(),
            })
        );
    }

    #[test]
    fn test_from_solution() {
        let instance = fleet_instance();
        let mut sequences = vec![Vec::new(); 6];
        sequences[0] = vec![1, 2];
        sequences[5] = vec![6];
        let sol = Solution::from_sequences(sequences.clone());
        assert!(CapacityTracker::from_solution(&instance, &sol).is_err());

        sequences.swap(1, 5);
        let sol = Solution::from_sequences(sequences);
        let t = CapacityTracker::from_solution(&instance, &sol).expect("fits");
        assert_eq!(t.load(1), &[544_000, 258_000]);
    }
}
