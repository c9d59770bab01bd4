//! Route type.

/// An ordered sequence of nodes served by a single vehicle.
///
/// A route starts and ends at the depot; the depot is not stored in
/// `nodes`. An empty route means the vehicle is unused.
///
/// # Examples
///
/// ```
/// use u_fleet::models::Route;
///
/// let mut route = Route::new(2);
/// route.push(4);
/// route.insert(0, 1);
/// assert_eq!(route.nodes(), &[1, 4]);
/// assert_eq!(route.arcs(0).collect::<Vec<_>>(), vec![(0, 1), (1, 4), (4, 0)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    vehicle_id: usize,
    nodes: Vec<usize>,
}

impl Route {
    /// Creates an empty route for the given vehicle.
    pub fn new(vehicle_id: usize) -> Self {
        Self {
            vehicle_id,
            nodes: Vec::new(),
        }
    }

    /// Creates a route visiting `nodes` in order.
    pub fn with_nodes(vehicle_id: usize, nodes: Vec<usize>) -> Self {
        Self { vehicle_id, nodes }
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle_id(&self) -> usize {
        self.vehicle_id
    }

    /// Returns the visited nodes in order (depot excluded).
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut Vec<usize> {
        &mut self.nodes
    }

    /// Number of visited nodes (depot excluded).
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the vehicle is unused.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Appends a node to the end of the route.
    pub fn push(&mut self, node: usize) {
        self.nodes.push(node);
    }

    /// Inserts a node before position `pos`.
    pub fn insert(&mut self, pos: usize, node: usize) {
        self.nodes.insert(pos, node);
    }

    /// Removes and returns the node at position `pos`.
    pub fn remove(&mut self, pos: usize) -> usize {
        self.nodes.remove(pos)
    }

    /// Node preceding position `pos`, the depot for `pos == 0`.
    #[inline]
    pub fn prev(&self, pos: usize, depot: usize) -> usize {
        if pos == 0 {
            depot
        } else {
            self.nodes[pos - 1]
        }
    }

    /// Node at position `pos`, the depot past the end.
    #[inline]
    pub fn at(&self, pos: usize, depot: usize) -> usize {
        self.nodes.get(pos).copied().unwrap_or(depot)
    }

    /// Directed arcs driven by the vehicle, including both depot legs.
    ///
    /// Empty routes have no arcs.
    pub fn arcs(&self, depot: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        let legs = if self.nodes.is_empty() {
            0
        } else {
            self.nodes.len() + 1
        };
        (0..legs).map(move |i| (self.prev(i, depot), self.at(i, depot)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_empty() {
        let r = Route::new(0);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.vehicle_id(), 0);
        assert_eq!(r.arcs(0).count(), 0);
    }

    #[test]
    fn test_route_edit() {
        let mut r = Route::with_nodes(1, vec![5, 3]);
        r.insert(1, 7);
        assert_eq!(r.nodes(), &[5, 7, 3]);
        assert_eq!(r.remove(0), 5);
        assert_eq!(r.nodes(), &[7, 3]);
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn test_neighbours() {
        let r = Route::with_nodes(0, vec![4, 2]);
        assert_eq!(r.prev(0, 9), 9);
        assert_eq!(r.prev(2, 9), 2);
        assert_eq!(r.at(1, 9), 2);
        assert_eq!(r.at(2, 9), 9);
    }

    #[test]
    fn test_arcs_with_non_zero_depot() {
        let r = Route::with_nodes(0, vec![0, 2]);
        assert_eq!(r.arcs(1).collect::<Vec<_>>(), vec![(1, 0), (0, 2), (2, 1)]);
    }
}
