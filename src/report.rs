//! Solution extraction into a reportable structure.
//!
//! Scaled integers are converted back to real units here and nowhere else.
//! Per-dimension totals are summed from the original real demands, and a
//! route's cost is `fixed + distance × per_km_cost` with the real costs as
//! given, so only the scaled distance carries truncation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RoutingError};
use crate::evaluation::CostEvaluator;
use crate::local_search::SearchState;
use crate::models::{Instance, Solution};

/// One vehicle's route in real units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteReport {
    /// 1-based route number (`vehicle_id + 1`).
    pub route_id: usize,
    /// Vehicle serving the route.
    pub vehicle_id: usize,
    /// Visited nodes, starting and ending at the depot.
    pub nodes: Vec<usize>,
    /// Load of the route per dimension name.
    pub totals: BTreeMap<String, f64>,
    /// Vehicle capacity per dimension name.
    pub capacities: BTreeMap<String, f64>,
    /// Distance driven.
    pub distance: f64,
    /// Fixed cost (if used) plus per-distance cost.
    pub route_cost: f64,
}

impl RouteReport {
    /// Returns `true` if the vehicle is used.
    pub fn is_used(&self) -> bool {
        self.nodes.len() > 2
    }
}

/// Every vehicle's route plus aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionReport {
    /// One entry per vehicle, in vehicle order.
    pub routes: Vec<RouteReport>,
    /// Distance over all routes.
    pub total_distance: f64,
    /// Cost over all routes.
    pub total_cost: f64,
    /// Outer search iterations that produced this solution.
    pub iterations: usize,
    /// How the search ended, if one ran.
    pub final_state: Option<SearchState>,
}

impl SolutionReport {
    /// Routes of vehicles that are used.
    pub fn used_routes(&self) -> impl Iterator<Item = &RouteReport> {
        self.routes.iter().filter(|r| r.is_used())
    }
}

/// Builds the report of a solution.
///
/// Unused vehicles appear with the route `[depot, depot]`, zero totals and
/// zero cost. Fails with [`RoutingError::EngineError`] if the solution does
/// not have one route per vehicle or its distance overflows.
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData, Solution};
/// use u_fleet::report::extract;
///
/// let data = InstanceData::new(vec![vec![0.0, 2.5], vec![2.5, 0.0]], 2)
///     .with_dimension("weight", vec![0.0, 1.25], vec![2.0, 2.0])
///     .with_fixed_costs(vec![10.0, 10.0])
///     .with_per_km_costs(vec![2.0, 1.0]);
/// let instance = Instance::new(&data).unwrap();
/// let solution = Solution::from_sequences(vec![vec![], vec![1]]);
///
/// let report = extract(&instance, &solution).unwrap();
/// assert_eq!(report.routes[0].nodes, vec![0, 0]);
/// assert_eq!(report.routes[1].nodes, vec![0, 1, 0]);
/// assert_eq!(report.routes[1].route_id, 2);
/// assert_eq!(report.routes[1].totals["weight"], 1.25);
/// assert!((report.total_cost - 15.0).abs() < 1e-9);
/// ```
pub fn extract(instance: &Instance, solution: &Solution) -> Result<SolutionReport> {
    if solution.num_routes() != instance.num_vehicles() {
        return Err(RoutingError::engine(format!(
            "solution has {} routes for {} vehicles",
            solution.num_routes(),
            instance.num_vehicles()
        )));
    }

    let evaluator = CostEvaluator::new(instance);
    let scale = instance.scale();
    let depot = instance.depot();
    let mut routes = Vec::with_capacity(solution.num_routes());
    let mut total_distance = 0i64;
    let mut total_cost = 0.0;

    for route in solution.routes() {
        let vehicle = route.vehicle_id();
        let mut nodes = Vec::with_capacity(route.len() + 2);
        nodes.push(depot);
        nodes.extend_from_slice(route.nodes());
        nodes.push(depot);

        let mut totals = BTreeMap::new();
        let mut capacities = BTreeMap::new();
        for dimension in instance.dimensions() {
            let load: f64 = route.nodes().iter().map(|&n| dimension.demand(n)).sum();
            totals.insert(dimension.name().to_string(), load);
            capacities.insert(dimension.name().to_string(), dimension.capacity(vehicle));
        }

        let distance = evaluator.route_distance(route);
        total_distance = total_distance
            .checked_add(distance)
            .ok_or_else(|| RoutingError::engine("total distance overflows"))?;
        let distance = scale.to_real(distance);
        let route_cost = if route.is_empty() {
            0.0
        } else {
            instance.fixed_cost(vehicle) + distance * instance.per_km_cost(vehicle)
        };
        total_cost += route_cost;

        routes.push(RouteReport {
            route_id: vehicle + 1,
            vehicle_id: vehicle,
            nodes,
            totals,
            capacities,
            distance,
            route_cost,
        });
    }

    Ok(SolutionReport {
        routes,
        total_distance: scale.to_real(total_distance),
        total_cost,
        iterations: 0,
        final_state: None,
    })
}
