//! Vehicle type with per-dimension capacities and cost parameters.

/// A vehicle of the fleet, in scaled units.
///
/// Capacities are indexed like the instance's dimensions. The fixed cost is
/// in cost units (`scale²`) and the per-distance rate in scaled units, so a
/// rate times a scaled distance is also in cost units.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Vehicle;
///
/// let v = Vehicle::new(0, vec![5_500_000, 777_000])
///     .with_fixed_cost(10_000_000_000)
///     .with_cost_per_distance(37_333);
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(1), 777_000);
/// assert_eq!(v.distance_cost(2_000), Some(74_666_000));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Vehicle {
    id: usize,
    capacities: Vec<i64>,
    fixed_cost: i64,
    cost_per_distance: i64,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacities.
    ///
    /// Default: no fixed cost, zero per-distance rate.
    pub fn new(id: usize, capacities: Vec<i64>) -> Self {
        Self {
            id,
            capacities,
            fixed_cost: 0,
            cost_per_distance: 0,
        }
    }

    /// Sets the cost of using this vehicle at all.
    pub fn with_fixed_cost(mut self, cost: i64) -> Self {
        self.fixed_cost = cost;
        self
    }

    /// Sets the cost per scaled distance unit.
    pub fn with_cost_per_distance(mut self, cost: i64) -> Self {
        self.cost_per_distance = cost;
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Capacity in the given dimension.
    #[inline]
    pub fn capacity(&self, dimension: usize) -> i64 {
        self.capacities[dimension]
    }

    /// Capacities of all dimensions.
    pub fn capacities(&self) -> &[i64] {
        &self.capacities
    }

    /// Fixed cost incurred when the route is non-empty.
    pub fn fixed_cost(&self) -> i64 {
        self.fixed_cost
    }

    /// Cost per scaled distance unit.
    pub fn cost_per_distance(&self) -> i64 {
        self.cost_per_distance
    }

    /// Variable cost of driving `distance` scaled units, `None` on overflow.
    #[inline]
    pub fn distance_cost(&self, distance: i64) -> Option<i64> {
        self.cost_per_distance.checked_mul(distance)
    }
}
