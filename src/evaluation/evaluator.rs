//! Arc, route and solution cost evaluation.

use crate::error::{Result, RoutingError};
use crate::models::{Instance, Route, Solution};

/// Cost callbacks used by the search to value arcs and vehicle usage.
///
/// The true cost is provided by [`CostEvaluator`]; guided local search plugs
/// in a penalized variant so move selection sees `cost + penalty` while the
/// incumbent is still compared on true cost.
///
/// Values are `i128`: a true arc cost fits `i64` once the instance is
/// validated, but `λ × penalty` on top of it may not, and move deltas sum
/// several of them.
pub trait ArcObjective {
    /// Cost of vehicle `vehicle` driving from `from` to `to`.
    fn transit(&self, vehicle: usize, from: usize, to: usize) -> i128;

    /// Cost incurred once if the vehicle's route is non-empty.
    fn fixed(&self, vehicle: usize) -> i128;

    /// Cost of a whole route, zero when the route is empty.
    fn route_value(&self, route: &Route, depot: usize) -> i128 {
        if route.is_empty() {
            return 0;
        }
        let vehicle = route.vehicle_id();
        route
            .arcs(depot)
            .map(|(from, to)| self.transit(vehicle, from, to))
            .sum::<i128>()
            + self.fixed(vehicle)
    }
}

/// Evaluates true costs over an instance, in cost units (`scale²`).
///
/// # Examples
///
/// ```
/// use u_fleet::models::{Instance, InstanceData, Route};
/// use u_fleet::evaluation::CostEvaluator;
///
/// let data = InstanceData::new(
///     vec![vec![0.0, 2.0, 3.0], vec![2.0, 0.0, 1.0], vec![4.0, 1.0, 0.0]],
///     1,
/// )
/// .with_fixed_costs(vec![10.0])
/// .with_per_km_costs(vec![2.0]);
/// let instance = Instance::new(&data).unwrap();
/// let eval = CostEvaluator::new(&instance);
///
/// let route = Route::with_nodes(0, vec![1, 2]);
/// assert_eq!(eval.route_distance(&route), 7_000); // 2 + 1 + 4
/// let cost = eval.route_cost(&route).unwrap();
/// assert!((instance.scale().cost_to_real(cost) - 24.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct CostEvaluator<'a> {
    instance: &'a Instance,
}

impl<'a> CostEvaluator<'a> {
    /// Creates an evaluator over the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self { instance }
    }

    /// The instance being evaluated.
    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    /// Scaled distance of an arc.
    #[inline]
    pub fn arc_cost(&self, from: usize, to: usize) -> i64 {
        self.instance.distance(from, to)
    }

    /// Scaled distance of a route including both depot legs.
    pub fn route_distance(&self, route: &Route) -> i64 {
        route
            .arcs(self.instance.depot())
            .map(|(from, to)| self.arc_cost(from, to))
            .sum()
    }

    /// Fixed cost if the route is used plus rate × distance.
    pub fn route_cost(&self, route: &Route) -> Result<i64> {
        if route.is_empty() {
            return Ok(0);
        }
        let vehicle = self.instance.vehicle(route.vehicle_id());
        vehicle
            .distance_cost(self.route_distance(route))
            .and_then(|c| c.checked_add(vehicle.fixed_cost()))
            .ok_or_else(|| {
                RoutingError::engine(format!(
                    "cost of vehicle {} route overflows",
                    route.vehicle_id()
                ))
            })
    }

    /// Sum of route costs over all vehicles.
    pub fn solution_cost(&self, solution: &Solution) -> Result<i64> {
        solution.routes().iter().try_fold(0i64, |acc, route| {
            acc.checked_add(self.route_cost(route)?)
                .ok_or_else(|| RoutingError::engine("solution cost overflows"))
        })
    }

    /// Sum of route distances over all vehicles.
    pub fn solution_distance(&self, solution: &Solution) -> i64 {
        solution
            .routes()
            .iter()
            .map(|r| self.route_distance(r))
            .sum()
    }
}

impl ArcObjective for CostEvaluator<'_> {
    #[inline]
    fn transit(&self, vehicle: usize, from: usize, to: usize) -> i128 {
        let rate = self.instance.vehicle(vehicle).cost_per_distance();
        i128::from(rate) * i128::from(self.instance.distance(from, to))
    }

    #[inline]
    fn fixed(&self, vehicle: usize) -> i128 {
        i128::from(self.instance.vehicle(vehicle).fixed_cost())
    }
}
