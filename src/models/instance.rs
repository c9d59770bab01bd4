//! Input boundary and the validated, immutable instance model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Vehicle;
use crate::distance::DistanceMatrix;
use crate::error::{Result, RoutingError};
use crate::evaluation::Scale;

/// Raw problem description as handed over by whatever loads it.
///
/// Field names follow the usual JSON shape of a fleet problem, so a loader
/// can deserialize it directly. Dimensions are matched by name between
/// `demands` and `vehicle_capacities`.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData};
///
/// let data = InstanceData::new(
///     vec![vec![0.0, 4.0, 6.0], vec![4.0, 0.0, 3.0], vec![6.0, 3.0, 0.0]],
///     2,
/// )
/// .with_dimension("weight", vec![0.0, 1.5, 2.0], vec![3.0, 3.0])
/// .with_fixed_costs(vec![100.0, 80.0])
/// .with_per_km_costs(vec![1.0, 2.0]);
///
/// let instance = Instance::new(&data).unwrap();
/// assert_eq!(instance.num_nodes(), 3);
/// assert_eq!(instance.num_vehicles(), 2);
/// assert_eq!(instance.demand(2), &[2_000]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceData {
    /// Square matrix of non-negative distances, `[from][to]`.
    pub distance_matrix: Vec<Vec<f64>>,
    /// Dimension name → demand of every node.
    pub demands: BTreeMap<String, Vec<f64>>,
    /// Dimension name → capacity of every vehicle.
    pub vehicle_capacities: BTreeMap<String, Vec<f64>>,
    /// Flat cost of using each vehicle.
    pub fixed_costs: Vec<f64>,
    /// Cost per distance unit of each vehicle.
    pub per_km_costs: Vec<f64>,
    /// Fleet size.
    pub num_vehicles: usize,
    /// Depot node index.
    #[serde(default)]
    pub depot: usize,
}

impl InstanceData {
    /// Creates input with no dimensions, zero fixed costs and unit per-distance costs.
    pub fn new(distance_matrix: Vec<Vec<f64>>, num_vehicles: usize) -> Self {
        Self {
            distance_matrix,
            demands: BTreeMap::new(),
            vehicle_capacities: BTreeMap::new(),
            fixed_costs: vec![0.0; num_vehicles],
            per_km_costs: vec![1.0; num_vehicles],
            num_vehicles,
            depot: 0,
        }
    }

    /// Adds a named dimension.
    pub fn with_dimension(
        mut self,
        name: impl Into<String>,
        demands: Vec<f64>,
        capacities: Vec<f64>,
    ) -> Self {
        let name = name.into();
        self.demands.insert(name.clone(), demands);
        self.vehicle_capacities.insert(name, capacities);
        self
    }

    /// Sets the fixed cost of every vehicle.
    pub fn with_fixed_costs(mut self, costs: Vec<f64>) -> Self {
        self.fixed_costs = costs;
        self
    }

    /// Sets the per-distance cost of every vehicle.
    pub fn with_per_km_costs(mut self, costs: Vec<f64>) -> Self {
        self.per_km_costs = costs;
        self
    }

    /// Sets the depot node.
    pub fn with_depot(mut self, depot: usize) -> Self {
        self.depot = depot;
        self
    }
}

/// A named resource axis, kept in real units for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    name: String,
    demands: Vec<f64>,
    capacities: Vec<f64>,
}

impl Dimension {
    /// Dimension name, e.g. `"weight"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Real-valued demand of a node.
    pub fn demand(&self, node: usize) -> f64 {
        self.demands[node]
    }

    /// Real-valued capacity of a vehicle.
    pub fn capacity(&self, vehicle: usize) -> f64 {
        self.capacities[vehicle]
    }
}

/// Validated, read-only routing instance in scaled units.
///
/// Built once from [`InstanceData`]; nothing mutates it afterwards, so it can
/// be shared by reference or cloned into independent restarts.
#[derive(Debug, Clone)]
pub struct Instance {
    depot: usize,
    distances: DistanceMatrix,
    dimensions: Vec<Dimension>,
    demands: Vec<Vec<i64>>,
    vehicles: Vec<Vehicle>,
    fixed_costs: Vec<f64>,
    per_km_costs: Vec<f64>,
    scale: Scale,
}

impl Instance {
    /// Validates and scales the input with [`Scale::DEFAULT`].
    pub fn new(data: &InstanceData) -> Result<Self> {
        Self::with_scale(data, Scale::DEFAULT)
    }

    /// Validates and scales the input with the given scale factor.
    ///
    /// Fails with [`RoutingError::InvalidInstance`] on shape or value errors
    /// and with [`RoutingError::EngineError`] if scaled costs could overflow.
    pub fn with_scale(data: &InstanceData, scale: Scale) -> Result<Self> {
        let n = data.distance_matrix.len();
        let v = data.num_vehicles;
        if n == 0 {
            return Err(RoutingError::invalid("distance matrix is empty"));
        }
        if data.depot >= n {
            return Err(RoutingError::invalid(format!(
                "depot {} is outside 0..{n}",
                data.depot
            )));
        }
        let distances = DistanceMatrix::from_rows(&data.distance_matrix, scale)?;

        if data.demands.len() != data.vehicle_capacities.len()
            || data
                .demands
                .keys()
                .any(|k| !data.vehicle_capacities.contains_key(k))
        {
            return Err(RoutingError::invalid("demand and capacity dimensions do not match"));
        }

        let mut dimensions = Vec::with_capacity(data.demands.len());
        let mut demands = vec![Vec::with_capacity(data.demands.len()); n];
        let mut capacities = vec![Vec::with_capacity(data.demands.len()); v];
        for (name, node_demands) in &data.demands {
            let vehicle_caps = &data.vehicle_capacities[name];
            check_len(name, "demand", node_demands.len(), n)?;
            check_len(name, "capacity", vehicle_caps.len(), v)?;
            for (node, &d) in node_demands.iter().enumerate() {
                check_amount(name, "demand", node, d)?;
                if node == data.depot && d != 0.0 {
                    return Err(RoutingError::invalid(format!(
                        "depot demand in '{name}' must be zero, got {d}"
                    )));
                }
                demands[node].push(scale.to_fixed(d)?);
            }
            for (vehicle, &c) in vehicle_caps.iter().enumerate() {
                check_amount(name, "capacity", vehicle, c)?;
                capacities[vehicle].push(scale.to_fixed(c)?);
            }
            dimensions.push(Dimension {
                name: name.clone(),
                demands: node_demands.clone(),
                capacities: vehicle_caps.clone(),
            });
        }

        check_len("fixed", "cost", data.fixed_costs.len(), v)?;
        check_len("per-distance", "cost", data.per_km_costs.len(), v)?;
        let mut vehicles = Vec::with_capacity(v);
        for (id, caps) in capacities.into_iter().enumerate() {
            let fixed = data.fixed_costs[id];
            let rate = data.per_km_costs[id];
            check_amount("fixed", "cost", id, fixed)?;
            check_amount("per-distance", "cost", id, rate)?;
            vehicles.push(
                Vehicle::new(id, caps)
                    .with_fixed_cost(scale.to_fixed_cost(fixed)?)
                    .with_cost_per_distance(scale.to_fixed(rate)?),
            );
        }

        let instance = Self {
            depot: data.depot,
            distances,
            dimensions,
            demands,
            vehicles,
            fixed_costs: data.fixed_costs.clone(),
            per_km_costs: data.per_km_costs.clone(),
            scale,
        };
        instance.check_cost_bound()?;
        Ok(instance)
    }

    /// Every route visits at most n+1 arcs, so the fleet cost is bounded by
    /// Σ (fixed + rate × max_distance × (n + 1)). Rejecting instances where
    /// that bound overflows keeps every true-cost sum in range.
    fn check_cost_bound(&self) -> Result<()> {
        let legs = self.num_nodes() as i64 + 1;
        let longest = self
            .distances
            .max_entry()
            .checked_mul(legs)
            .ok_or_else(|| RoutingError::engine("route distance bound overflows"))?;
        self.vehicles.iter().try_fold(0i64, |acc, vehicle| {
            vehicle
                .cost_per_distance()
                .checked_mul(longest)
                .and_then(|c| c.checked_add(vehicle.fixed_cost()))
                .and_then(|c| c.checked_add(acc))
                .ok_or_else(|| RoutingError::engine("fleet cost bound overflows"))
        })?;
        Ok(())
    }

    /// Number of nodes including the depot.
    pub fn num_nodes(&self) -> usize {
        self.distances.size()
    }

    /// Fleet size.
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    /// Number of capacity dimensions.
    pub fn num_dimensions(&self) -> usize {
        self.dimensions.len()
    }

    /// Depot node index.
    pub fn depot(&self) -> usize {
        self.depot
    }

    /// Non-depot nodes in ascending order.
    pub fn customers(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_nodes()).filter(move |&n| n != self.depot)
    }

    /// Scaled distance from `from` to `to`.
    #[inline]
    pub fn distance(&self, from: usize, to: usize) -> i64 {
        self.distances.get(from, to)
    }

    /// The scaled distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Scaled demand of a node, one entry per dimension.
    #[inline]
    pub fn demand(&self, node: usize) -> &[i64] {
        &self.demands[node]
    }

    /// Vehicle by index.
    #[inline]
    pub fn vehicle(&self, vehicle: usize) -> &Vehicle {
        &self.vehicles[vehicle]
    }

    /// All vehicles.
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    /// Dimensions in name order.
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Fixed cost of a vehicle as given, in real units.
    pub fn fixed_cost(&self, vehicle: usize) -> f64 {
        self.fixed_costs[vehicle]
    }

    /// Per-distance cost of a vehicle as given, in real units.
    ///
    /// The search prices arcs with the truncated scaled rate; reports use
    /// this one.
    pub fn per_km_cost(&self, vehicle: usize) -> f64 {
        self.per_km_costs[vehicle]
    }

    /// Fixed-point scale used for every scaled quantity.
    pub fn scale(&self) -> Scale {
        self.scale
    }
}

fn check_len(name: &str, what: &str, actual: usize, expected: usize) -> Result<()> {
    if actual != expected {
        return Err(RoutingError::invalid(format!(
            "'{name}' {what} sequence has {actual} entries, expected {expected}"
        )));
    }
    Ok(())
}

fn check_amount(name: &str, what: &str, index: usize, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(RoutingError::invalid(format!(
            "'{name}' {what} at {index} must be finite and non-negative, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fleet_data;

    fn small() -> InstanceData {
        InstanceData::new(
            vec![
                vec![0.0, 1.0, 2.0],
                vec![1.0, 0.0, 1.0],
                vec![2.0, 1.0, 0.0],
            ],
            2,
        )
        .with_dimension("weight", vec![0.0, 1.0, 1.0], vec![2.0, 1.0])
    }

    #[test]
    fn test_fleet_instance() {
        let instance = Instance::new(&fleet_data()).expect("valid");
        assert_eq!(instance.num_nodes(), 8);
        assert_eq!(instance.num_vehicles(), 6);
        assert_eq!(instance.num_dimensions(), 2);
        assert_eq!(instance.dimensions()[0].name(), "volumes");
        assert_eq!(instance.dimensions()[1].name(), "weights");
        let customers: Vec<usize> = instance.customers().collect();
        assert_eq!(customers, (1..8).collect::<Vec<_>>());
        assert_eq!(instance.vehicle(0).capacities(), &[777_000, 5_500_000]);
        assert_eq!(instance.vehicle(5).fixed_cost(), 40_000_000_000);
        assert!(instance.distances().is_symmetric());
        assert!((instance.distance(3, 5) - 4_425).abs() <= 1);
    }

    #[test]
    fn test_depot_not_zero() {
        let data = small()
            .with_dimension("volume", vec![1.0, 0.0, 1.0], vec![5.0, 5.0])
            .with_depot(1);
        // "weight" still has demand 1.0 at node 1
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());

        let data = InstanceData::new(small().distance_matrix, 1)
            .with_dimension("weight", vec![1.0, 0.0, 1.0], vec![5.0])
            .with_depot(1);
        let instance = Instance::new(&data).expect("valid");
        assert_eq!(instance.customers().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_length_mismatch() {
        let mut data = small();
        data.demands.insert("weight".into(), vec![0.0, 1.0]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());

        let mut data = small();
        data.vehicle_capacities.insert("weight".into(), vec![1.0]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());

        let data = small().with_fixed_costs(vec![1.0]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_dimension_names_must_match() {
        let mut data = small();
        data.vehicle_capacities.remove("weight");
        data.vehicle_capacities.insert("volume".into(), vec![1.0, 1.0]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_negative_values() {
        let mut data = small();
        data.demands.insert("weight".into(), vec![0.0, -1.0, 1.0]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());

        let mut data = small();
        data.vehicle_capacities.insert("weight".into(), vec![2.0, -0.5]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());

        let data = small().with_per_km_costs(vec![1.0, f64::INFINITY]);
        assert!(Instance::new(&data).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_bad_depot_and_empty() {
        assert!(Instance::new(&small().with_depot(3))
            .unwrap_err()
            .is_invalid_input());
        assert!(Instance::new(&InstanceData::new(vec![], 1))
            .unwrap_err()
            .is_invalid_input());
    }

    #[test]
    fn test_cost_bound_overflow() {
        let data = small().with_per_km_costs(vec![1e12, 1.0]);
        let mut big = data.clone();
        big.distance_matrix[0][2] = 1e9;
        assert!(matches!(
            Instance::new(&big),
            Err(RoutingError::EngineError { .. })
        ));
        assert!(Instance::new(&data).is_ok());
    }

    #[test]
    fn test_deserialize() {
        let json = r#"{
            "distance_matrix": [[0, 2], [3, 0]],
            "demands": {"weight": [0, 1.5]},
            "vehicle_capacities": {"weight": [2]},
            "fixed_costs": [10],
            "per_km_costs": [1.5],
            "num_vehicles": 1
        }"#;
        let data: InstanceData = serde_json::from_str(json).expect("parses");
        assert_eq!(data.depot, 0);
        let instance = Instance::new(&data).expect("valid");
        assert_eq!(instance.demand(1), &[1_500]);
        assert_eq!(instance.vehicle(0).cost_per_distance(), 1_500);
        assert_eq!(instance.per_km_cost(0), 1.5);
        assert_eq!(instance.fixed_cost(0), 10.0);
        assert_eq!(instance.distance(1, 0), 3_000);
    }
}
