//! 2-opt* tail exchange between two routes.
//!
//! # Algorithm
//!
//! Cut route 1 after `c1` nodes and route 2 after `c2` nodes, then swap
//! the tails:
//!
//! ```text
//! R1' = R1[..c1] + R2[c2..]
//! R2' = R2[..c2] + R1[c1..]
//! ```
//!
//! Each new route is priced in full with its own vehicle's costs from
//! prefix and suffix sums, so heterogeneous rates and fixed costs are
//! accounted for, including a route that becomes empty or a vehicle that
//! starts being used.
//!
//! # Complexity
//!
//! O(n²) per evaluation after O(n × V) prefix sums.
//!
//! # Reference
//!
//! Potvin, J.-Y. & Rousseau, J.-M. (1995). "An Exchange Heuristic for
//! Routeing Problems with Time Windows", *Journal of the Operational
//! Research Society* 46(12), 1433-1446.

use super::moves::{improves, Candidate, Move};
use super::Neighborhood;
use crate::evaluation::ArcObjective;
use crate::models::Route;

/// Partial costs of one route priced with another vehicle's costs.
struct Pieces {
    /// `head[c]`: depot → r[0] → … → r[c-1], zero for `c == 0`.
    head: Vec<i128>,
    /// `tail[c]`: r[c] → … → r[n-1] → depot, zero for `c == n`.
    tail: Vec<i128>,
}

impl Pieces {
    fn new<O: ArcObjective>(nb: &Neighborhood<'_, '_, O>, route: &Route, vehicle: usize) -> Self {
        let depot = nb.depot();
        let nodes = route.nodes();
        let n = nodes.len();
        let mut head = vec![0i128; n + 1];
        for c in 1..=n {
            head[c] = head[c - 1] + nb.t(vehicle, route.prev(c - 1, depot), nodes[c - 1]);
        }
        let mut tail = vec![0i128; n + 1];
        for c in (0..n).rev() {
            tail[c] = tail[c + 1] + nb.t(vehicle, nodes[c], route.at(c + 1, depot));
        }
        Self { head, tail }
    }
}

/// Finds the best improving tail exchange between two routes, if any.
pub fn best_cross<O: ArcObjective>(nb: &Neighborhood<'_, '_, O>) -> Option<Candidate> {
    let depot = nb.depot();
    let tracker = nb.tracker;
    let routes = nb.solution.routes();
    let mut best: Option<Candidate> = None;

    for (i, r1) in routes.iter().enumerate() {
        let v1 = r1.vehicle_id();
        for r2 in routes.iter().skip(i + 1) {
            if r1.is_empty() && r2.is_empty() {
                continue;
            }
            let v2 = r2.vehicle_id();
            let old = nb.route_value(r1) + nb.route_value(r2);
            // r1 pieces under its own vehicle and under v2; same for r2
            let own1 = Pieces::new(nb, r1, v1);
            let own2 = Pieces::new(nb, r2, v2);
            let moved1 = Pieces::new(nb, r1, v2);
            let moved2 = Pieces::new(nb, r2, v1);

            for c1 in 0..=r1.len() {
                for c2 in 0..=r2.len() {
                    if c1 == r1.len() && c2 == r2.len() {
                        continue;
                    }
                    let new1 = joined(
                        nb,
                        v1,
                        r1.prev(c1, depot),
                        r2.at(c2, depot),
                        own1.head[c1],
                        moved2.tail[c2],
                        c1 + r2.len() - c2,
                    );
                    let new2 = joined(
                        nb,
                        v2,
                        r2.prev(c2, depot),
                        r1.at(c1, depot),
                        own2.head[c2],
                        moved1.tail[c1],
                        c2 + r1.len() - c1,
                    );
                    let delta = new1 + new2 - old;
                    if improves(&best, delta)
                        && tracker.can_exchange(v1, &r1.nodes()[c1..], &r2.nodes()[c2..])
                        && tracker.can_exchange(v2, &r2.nodes()[c2..], &r1.nodes()[c1..])
                    {
                        best = Some(Candidate::new(
                            Move::Cross {
                                first_vehicle: v1,
                                first_cut: c1,
                                second_vehicle: v2,
                                second_cut: c2,
                            },
                            delta,
                        ));
                    }
                }
            }
        }
    }
    best
}

/// Value of `head + tail` driven by `vehicle`, where `last` ends the head
/// (the depot if the head is empty) and `next` starts the tail (the depot
/// if the tail is empty). An empty result costs nothing.
fn joined<O: ArcObjective>(
    nb: &Neighborhood<'_, '_, O>,
    vehicle: usize,
    last: usize,
    next: usize,
    head: i128,
    tail: i128,
    len: usize,
) -> i128 {
    if len == 0 {
        return 0;
    }
    nb.objective.fixed(vehicle) + head + nb.t(vehicle, last, next) + tail
}
