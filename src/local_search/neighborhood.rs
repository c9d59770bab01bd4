//! Read-only view of the current solution used by the move operators.

use super::moves::Candidate;
use super::{best_cross, best_or_opt, best_relocate, best_swap, best_two_opt};
use crate::evaluation::{ArcObjective, CapacityTracker};
use crate::models::{Instance, Route, Solution};

/// Everything a move operator needs to price and screen moves.
///
/// Operators only read through this view; the engine commits the chosen
/// move afterwards.
pub struct Neighborhood<'n, 'a, O> {
    pub(crate) instance: &'a Instance,
    pub(crate) solution: &'n Solution,
    pub(crate) tracker: &'n CapacityTracker<'a>,
    pub(crate) objective: &'n O,
}

impl<'n, 'a, O: ArcObjective> Neighborhood<'n, 'a, O> {
    /// Creates a view over the current solution, its loads and an objective.
    pub fn new(
        instance: &'a Instance,
        solution: &'n Solution,
        tracker: &'n CapacityTracker<'a>,
        objective: &'n O,
    ) -> Self {
        Self {
            instance,
            solution,
            tracker,
            objective,
        }
    }

    /// Best improving move over every operator, or `None` at a local optimum.
    ///
    /// Operators are tried in a fixed order (relocate, swap, 2-opt, Or-opt,
    /// 2-opt*) and a later operator only wins with a strictly better delta.
    pub fn best_move(&self, or_opt_max_segment: usize) -> Option<Candidate> {
        [
            best_relocate(self),
            best_swap(self),
            best_two_opt(self),
            best_or_opt(self, or_opt_max_segment),
            best_cross(self),
        ]
        .into_iter()
        .flatten()
        .fold(None, |best: Option<Candidate>, c| match best {
            Some(b) if b.delta <= c.delta => Some(b),
            _ => Some(c),
        })
    }

    #[inline]
    pub(crate) fn depot(&self) -> usize {
        self.instance.depot()
    }

    #[inline]
    pub(crate) fn t(&self, vehicle: usize, from: usize, to: usize) -> i128 {
        self.objective.transit(vehicle, from, to)
    }

    pub(crate) fn route_value(&self, route: &Route) -> i128 {
        self.objective.route_value(route, self.depot())
    }

    /// Cost of visiting `nodes` in order with `vehicle`, arcs between them only.
    pub(crate) fn path_cost(&self, vehicle: usize, nodes: impl Iterator<Item = usize>) -> i128 {
        let mut prev = None;
        let mut cost = 0i128;
        for node in nodes {
            if let Some(p) = prev {
                cost += self.t(vehicle, p, node);
            }
            prev = Some(node);
        }
        cost
    }

    /// Neighbours `(prev, next)` of insertion point `pos` in `route` once
    /// `len` nodes starting at `start` have been taken out.
    pub(crate) fn gap(
        &self,
        route: &Route,
        start: usize,
        len: usize,
        pos: usize,
    ) -> (usize, usize) {
        let depot = self.depot();
        let nodes = route.nodes();
        let reduced = nodes.len() - len;
        let at = |k: usize| if k < start { nodes[k] } else { nodes[k + len] };
        let prev = if pos == 0 { depot } else { at(pos - 1) };
        let next = if pos == reduced { depot } else { at(pos) };
        (prev, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::CostEvaluator;
    use crate::testing::line_instance;

    #[test]
    fn test_gap() {
        let instance = line_instance(5, 1, 10.0);
        let sol = Solution::from_sequences(vec![vec![1, 2, 3, 4, 5]]);
        let tracker = CapacityTracker::from_solution(&instance, &sol).expect("fits");
        let eval = CostEvaluator::new(&instance);
        let nb = Neighborhood::new(&instance, &sol, &tracker, &eval);
        let route = sol.route(0);
        // reduced route without [2, 3] is [1, 4, 5]
        assert_eq!(nb.gap(route, 1, 2, 0), (0, 1));
        assert_eq!(nb.gap(route, 1, 2, 1), (1, 4));
        assert_eq!(nb.gap(route, 1, 2, 3), (5, 0));
    }

    #[test]
    fn test_local_optimum_has_no_move() {
        let instance = line_instance(3, 1, 10.0);
        let sol = Solution::from_sequences(vec![vec![1, 2, 3]]);
        let tracker = CapacityTracker::from_solution(&instance, &sol).expect("fits");
        let eval = CostEvaluator::new(&instance);
        let nb = Neighborhood::new(&instance, &sol, &tracker, &eval);
        assert!(nb.best_move(3).is_none());
    }

    #[test]
    fn test_finds_improvement() {
        let instance = line_instance(3, 1, 10.0);
        let sol = Solution::from_sequences(vec![vec![2, 1, 3]]);
        let tracker = CapacityTracker::from_solution(&instance, &sol).expect("fits");
        let eval = CostEvaluator::new(&instance);
        let nb = Neighborhood::new(&instance, &sol, &tracker, &eval);
        let best = nb.best_move(3).expect("improvable");
        assert!(best.delta < 0);
    }
}
