//! Intra-route 2-opt segment reversal.
//!
//! # Algorithm
//!
//! For each pair of positions `(i, j)` with `i < j`, reverse the segment
//! `r[i..=j]`. Arc costs may be asymmetric, so the reversed interior is
//! priced from prefix sums in both directions:
//!
//! ```text
//! fwd[k] = sum of t(r[m], r[m+1]) for m < k
//! bwd[k] = sum of t(r[m+1], r[m]) for m < k
//! old = t(a, r[i]) + fwd[j] - fwd[i] + t(r[j], b)
//! new = t(a, r[j]) + bwd[j] - bwd[i] + t(r[i], b)
//! ```
//!
//! where `a` precedes position `i` and `b` follows position `j`.
//!
//! # Complexity
//!
//! O(n²) per evaluation after O(n) prefix sums per route.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A Method for Solving Traveling-Salesman Problems",
//! *Operations Research* 6(6), 791-812.

use super::moves::{improves, Candidate, Move};
use super::Neighborhood;
use crate::evaluation::ArcObjective;

/// Finds the best improving segment reversal over all routes, if any.
///
/// Reversal never changes which vehicle serves a node, so capacity is
/// unaffected.
pub fn best_two_opt<O: ArcObjective>(nb: &Neighborhood<'_, '_, O>) -> Option<Candidate> {
    let depot = nb.depot();
    let mut best: Option<Candidate> = None;

    for route in nb.solution.routes() {
        let n = route.len();
        if n < 2 {
            continue;
        }
        let v = route.vehicle_id();
        let nodes = route.nodes();

        let mut fwd = vec![0i128; n];
        let mut bwd = vec![0i128; n];
        for k in 1..n {
            fwd[k] = fwd[k - 1] + nb.t(v, nodes[k - 1], nodes[k]);
            bwd[k] = bwd[k - 1] + nb.t(v, nodes[k], nodes[k - 1]);
        }

        for i in 0..n - 1 {
            let a = route.prev(i, depot);
            for j in i + 1..n {
                let b = route.at(j + 1, depot);
                let old = nb.t(v, a, nodes[i]) + fwd[j] - fwd[i] + nb.t(v, nodes[j], b);
                let new = nb.t(v, a, nodes[j]) + bwd[j] - bwd[i] + nb.t(v, nodes[i], b);
                let delta = new - old;
                if improves(&best, delta) {
                    best = Some(Candidate::new(
                        Move::TwoOpt {
                            vehicle: v,
                            start: i,
                            end: j,
                        },
                        delta,
                    ));
                }
            }
        }
    }
    best
}
