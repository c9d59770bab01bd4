//! Move representation and atomic application.

use crate::error::{Result, RoutingError};
use crate::evaluation::CapacityTracker;
use crate::models::Solution;

/// A single neighborhood move. Positions refer to the routes as they are
/// before the move, except `to_pos` of same-route moves, which indexes the
/// route after the moved nodes were taken out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Move one node to another position, in the same or another route.
    Relocate {
        from_vehicle: usize,
        from_pos: usize,
        to_vehicle: usize,
        to_pos: usize,
    },
    /// Exchange two nodes between different routes.
    Swap {
        first_vehicle: usize,
        first_pos: usize,
        second_vehicle: usize,
        second_pos: usize,
    },
    /// Reverse the segment `start..=end` of one route.
    TwoOpt {
        vehicle: usize,
        start: usize,
        end: usize,
    },
    /// Move `len` consecutive nodes, optionally reversed.
    OrOpt {
        from_vehicle: usize,
        start: usize,
        len: usize,
        to_vehicle: usize,
        to_pos: usize,
        reversed: bool,
    },
    /// Exchange route tails: `first[first_cut..]` and `second[second_cut..]`.
    Cross {
        first_vehicle: usize,
        first_cut: usize,
        second_vehicle: usize,
        second_cut: usize,
    },
}

/// A move together with its objective change (negative is an improvement).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// The move.
    pub mv: Move,
    /// Objective change if the move is applied.
    pub delta: i128,
}

impl Candidate {
    pub(crate) fn new(mv: Move, delta: i128) -> Self {
        Self { mv, delta }
    }
}

/// `true` if `delta` improves and beats the current best.
#[inline]
pub(crate) fn improves(best: &Option<Candidate>, delta: i128) -> bool {
    delta < 0 && best.is_none_or(|b| delta < b.delta)
}

impl Move {
    /// Applies the move to the solution and the tracker as one step.
    ///
    /// Bounds and capacity are checked before anything changes: on error
    /// both `solution` and `tracker` are left untouched.
    pub fn apply(&self, solution: &mut Solution, tracker: &mut CapacityTracker<'_>) -> Result<()> {
        self.check_bounds(solution)?;
        let transfers = self.transfers(solution);
        let mut vehicles: Vec<usize> = transfers.iter().flat_map(|t| [t.1, t.2]).collect();
        vehicles.sort_unstable();
        vehicles.dedup();
        for &vehicle in &vehicles {
            let removed: Vec<usize> = transfers
                .iter()
                .filter(|t| t.1 == vehicle)
                .map(|t| t.0)
                .collect();
            let added: Vec<usize> = transfers
                .iter()
                .filter(|t| t.2 == vehicle)
                .map(|t| t.0)
                .collect();
            tracker.check_exchange(vehicle, &removed, &added)?;
        }

        match *self {
            Move::Relocate {
                from_vehicle,
                from_pos,
                to_vehicle,
                to_pos,
            } => {
                let node = solution.route_mut(from_vehicle).remove(from_pos);
                solution.route_mut(to_vehicle).insert(to_pos, node);
            }
            Move::Swap {
                first_vehicle,
                first_pos,
                second_vehicle,
                second_pos,
            } => {
                let x = solution.route(first_vehicle).nodes()[first_pos];
                let y = solution.route(second_vehicle).nodes()[second_pos];
                solution.route_mut(first_vehicle).nodes_mut()[first_pos] = y;
                solution.route_mut(second_vehicle).nodes_mut()[second_pos] = x;
            }
            Move::TwoOpt {
                vehicle,
                start,
                end,
            } => {
                solution.route_mut(vehicle).nodes_mut()[start..=end].reverse();
            }
            Move::OrOpt {
                from_vehicle,
                start,
                len,
                to_vehicle,
                to_pos,
                reversed,
            } => {
                let mut segment: Vec<usize> = solution
                    .route_mut(from_vehicle)
                    .nodes_mut()
                    .drain(start..start + len)
                    .collect();
                if reversed {
                    segment.reverse();
                }
                solution
                    .route_mut(to_vehicle)
                    .nodes_mut()
                    .splice(to_pos..to_pos, segment);
            }
            Move::Cross {
                first_vehicle,
                first_cut,
                second_vehicle,
                second_cut,
            } => {
                let tail1 = solution.route_mut(first_vehicle).nodes_mut().split_off(first_cut);
                let tail2 = solution
                    .route_mut(second_vehicle)
                    .nodes_mut()
                    .split_off(second_cut);
                solution.route_mut(first_vehicle).nodes_mut().extend(tail2);
                solution.route_mut(second_vehicle).nodes_mut().extend(tail1);
            }
        }

        for &(node, from, _) in &transfers {
            tracker.remove(from, node)?;
        }
        for &(node, _, to) in &transfers {
            tracker.append(to, node)?;
        }
        Ok(())
    }

    /// Nodes changing vehicle, as `(node, from, to)`.
    fn transfers(&self, solution: &Solution) -> Vec<(usize, usize, usize)> {
        match *self {
            Move::Relocate {
                from_vehicle,
                from_pos,
                to_vehicle,
                ..
            } if from_vehicle != to_vehicle => {
                let node = solution.route(from_vehicle).nodes()[from_pos];
                vec![(node, from_vehicle, to_vehicle)]
            }
            Move::Swap {
                first_vehicle,
                first_pos,
                second_vehicle,
                second_pos,
            } => vec![
                (
                    solution.route(first_vehicle).nodes()[first_pos],
                    first_vehicle,
                    second_vehicle,
                ),
                (
                    solution.route(second_vehicle).nodes()[second_pos],
                    second_vehicle,
                    first_vehicle,
                ),
            ],
            Move::OrOpt {
                from_vehicle,
                start,
                len,
                to_vehicle,
                ..
            } if from_vehicle != to_vehicle => solution.route(from_vehicle).nodes()
                [start..start + len]
                .iter()
                .map(|&n| (n, from_vehicle, to_vehicle))
                .collect(),
            Move::Cross {
                first_vehicle,
                first_cut,
                second_vehicle,
                second_cut,
            } => {
                let first = &solution.route(first_vehicle).nodes()[first_cut..];
                let second = &solution.route(second_vehicle).nodes()[second_cut..];
                first
                    .iter()
                    .map(|&n| (n, first_vehicle, second_vehicle))
                    .chain(second.iter().map(|&n| (n, second_vehicle, first_vehicle)))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn check_bounds(&self, solution: &Solution) -> Result<()> {
        let routes = solution.num_routes();
        let len = |v: usize| solution.route(v).len();
        let ok = match *self {
            Move::Relocate {
                from_vehicle,
                from_pos,
                to_vehicle,
                to_pos,
            } => {
                from_vehicle < routes
                    && to_vehicle < routes
                    && from_pos < len(from_vehicle)
                    && if from_vehicle == to_vehicle {
                        to_pos < len(to_vehicle)
                    } else {
                        to_pos <= len(to_vehicle)
                    }
            }
            Move::Swap {
                first_vehicle,
                first_pos,
                second_vehicle,
                second_pos,
            } => {
                first_vehicle != second_vehicle
                    && first_vehicle < routes
                    && second_vehicle < routes
                    && first_pos < len(first_vehicle)
                    && second_pos < len(second_vehicle)
            }
            Move::TwoOpt {
                vehicle,
                start,
                end,
            } => vehicle < routes && start < end && end < len(vehicle),
            Move::OrOpt {
                from_vehicle,
                start,
                len: seg,
                to_vehicle,
                to_pos,
                ..
            } => {
                from_vehicle < routes
                    && to_vehicle < routes
                    && seg > 0
                    && start + seg <= len(from_vehicle)
                    && if from_vehicle == to_vehicle {
                        to_pos <= len(to_vehicle) - seg
                    } else {
                        to_pos <= len(to_vehicle)
                    }
            }
            Move::Cross {
                first_vehicle,
                first_cut,
                second_vehicle,
                second_cut,
            } => {
                first_vehicle != second_vehicle
                    && first_vehicle < routes
                    && second_vehicle < routes
                    && first_cut <= len(first_vehicle)
                    && second_cut <= len(second_vehicle)
            }
        };
        if ok {
            Ok(())
        } else {
            Err(RoutingError::engine(format!("move {self:?} is out of bounds")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::line_instance;

    fn setup(
        instance: &crate::models::Instance,
        sequences: Vec<Vec<usize>>,
    ) -> (Solution, CapacityTracker<'_>) {
        let sol = Solution::from_sequences(sequences);
        let tracker = CapacityTracker::from_solution(instance, &sol).expect("fits");
        (sol, tracker)
    }

    #[test]
    fn test_relocate_between_routes() {
        let instance = line_instance(4, 2, 3.0);
        let (mut sol, mut t) = setup(&instance, vec![vec![1, 2, 3], vec![4]]);
        Move::Relocate {
            from_vehicle: 0,
            from_pos: 2,
            to_vehicle: 1,
            to_pos: 0,
        }
        .apply(&mut sol, &mut t)
        .expect("feasible");
        assert_eq!(sol.route(0).nodes(), &[1, 2]);
        assert_eq!(sol.route(1).nodes(), &[3, 4]);
        assert_eq!(t.load(0), &[2_000]);
        assert_eq!(t.load(1), &[2_000]);
    }

    #[test]
    fn test_relocate_within_route() {
        let instance = line_instance(3, 1, 3.0);
        let (mut sol, mut t) = setup(&instance, vec![vec![1, 2, 3]]);
        Move::Relocate {
            from_vehicle: 0,
            from_pos: 0,
            to_vehicle: 0,
            to_pos: 2,
        }
        .apply(&mut sol, &mut t)
        .expect("feasible");
        assert_eq!(sol.route(0).nodes(), &[2, 3, 1]);
        assert_eq!(t.load(0), &[3_000]);
    }

    #[test]
    fn test_infeasible_move_leaves_state_untouched() {
        let instance = line_instance(4, 2, 2.0);
        let (mut sol, mut t) = setup(&instance, vec![vec![1, 2], vec![3, 4]]);
        let before = sol.clone();
        let err = Move::Relocate {
            from_vehicle: 0,
            from_pos: 0,
            to_vehicle: 1,
            to_pos: 0,
        }
        .apply(&mut sol, &mut t)
        .unwrap_err();
        assert!(matches!(err, RoutingError::CapacityViolation { vehicle: 1, .. }));
        assert_eq!(sol, before);
        assert_eq!(t.load(0), &[2_000]);
        assert_eq!(t.load(1), &[2_000]);
    }

    #[test]
    fn test_swap_and_two_opt() {
        let instance = line_instance(4, 2, 2.0);
        let (mut sol, mut t) = setup(&instance, vec![vec![1, 2], vec![3, 4]]);
        Move::Swap {
            first_vehicle: 0,
            first_pos: 1,
            second_vehicle: 1,
            second_pos: 0,
        }
        .apply(&mut sol, &mut t)
        .expect("feasible");
        assert_eq!(sol.route(0).nodes(), &[1, 3]);
        assert_eq!(sol.route(1).nodes(), &[2, 4]);

        Move::TwoOpt {
            vehicle: 1,
            start: 0,
            end: 1,
        }
        .apply(&mut sol, &mut t)
        .expect("feasible");
        assert_eq!(sol.route(1).nodes(), &[4, 2]);
    }

    #[test]
    fn test_or_opt_and_cross() {
        let instance = line_instance(5, 2, 5.0);
        let (mut sol, mut t) = setup(&instance, vec![vec![1, 2, 3], vec![4, 5]]);
        Move::OrOpt {
            from_vehicle: 0,
            start: 1,
            len: 2,
            to_vehicle: 1,
            to_pos: 1,
            reversed: true,
        }
        .apply(&mut sol, &mut t)
        .expect("feasible");
        assert_eq!(sol.route(0).nodes(), &[1]);
        assert_eq!(sol.route(1).nodes(), &[4, 3, 2, 5]);
        assert_eq!(t.load(1), &[4_000]);

        Move::Cross {
            first_vehicle: 0,
            first_cut: 0,
            second_vehicle: 1,
            second_cut: 2,
        }
        .apply(&mut sol, &mut t)
        .expect("feasible");
        assert_eq!(sol.route(0).nodes(), &[2, 5]);
        assert_eq!(sol.route(1).nodes(), &[4, 3, 1]);
        assert_eq!(t.load(0), &[2_000]);
        assert_eq!(t.load(1), &[3_000]);
        assert!(sol.violations(&instance).is_empty());
    }

    #[test]
    fn test_out_of_bounds() {
        let instance = line_instance(2, 1, 2.0);
        let (mut sol, mut t) = setup(&instance, vec![vec![1, 2]]);
        let err = Move::TwoOpt {
            vehicle: 0,
            start: 1,
            end: 2,
        }
        .apply(&mut sol, &mut t)
        .unwrap_err();
        assert!(matches!(err, RoutingError::EngineError { .. }));
    }
}
