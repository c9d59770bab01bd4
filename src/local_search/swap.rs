//! Inter-route node exchange.
//!
//! # Algorithm
//!
//! For nodes `x` in route 1 (between `a1`, `b1`) and `y` in route 2
//! (between `a2`, `b2`):
//!
//! ```text
//! delta = t1(a1, y) + t1(y, b1) - t1(a1, x) - t1(x, b1)
//!       + t2(a2, x) + t2(x, b2) - t2(a2, y) - t2(y, b2)
//! ```
//!
//! Both routes keep their length, so fixed costs never change. Both
//! vehicles must still fit after the exchange in every dimension.
//!
//! # Complexity
//!
//! O(n²) per evaluation.

use super::moves::{improves, Candidate, Move};
use super::Neighborhood;
use crate::evaluation::ArcObjective;

/// Finds the best improving swap between two different routes, if any.
pub fn best_swap<O: ArcObjective>(nb: &Neighborhood<'_, '_, O>) -> Option<Candidate> {
    let depot = nb.depot();
    let routes = nb.solution.routes();
    let mut best: Option<Candidate> = None;

    for (i, r1) in routes.iter().enumerate() {
        let v1 = r1.vehicle_id();
        for r2 in routes.iter().skip(i + 1) {
            let v2 = r2.vehicle_id();
            for p1 in 0..r1.len() {
                let x = r1.nodes()[p1];
                let a1 = r1.prev(p1, depot);
                let b1 = r1.at(p1 + 1, depot);
                let out1 = nb.t(v1, a1, x) + nb.t(v1, x, b1);
                for p2 in 0..r2.len() {
                    let y = r2.nodes()[p2];
                    let a2 = r2.prev(p2, depot);
                    let b2 = r2.at(p2 + 1, depot);
                    let in1 = nb.t(v1, a1, y) + nb.t(v1, y, b1);
                    let in2 = nb.t(v2, a2, x) + nb.t(v2, x, b2);
                    let out2 = nb.t(v2, a2, y) + nb.t(v2, y, b2);
                    let delta = in1 - out1 + in2 - out2;
                    if improves(&best, delta)
                        && nb.tracker.can_exchange(v1, &[x], &[y])
                        && nb.tracker.can_exchange(v2, &[y], &[x])
                    {
                        best = Some(Candidate::new(
                            Move::Swap {
                                first_vehicle: v1,
                                first_pos: p1,
                                second_vehicle: v2,
                                second_pos: p2,
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
