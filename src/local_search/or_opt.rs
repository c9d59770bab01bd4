//! Or-opt: relocation of short segments of consecutive nodes.
//!
//! # Algorithm
//!
//! For each segment `r[s..s+L]` with `2 <= L <= max_segment`, price its
//! removal (closing the gap `a → b`), then every insertion point in the
//! same route or another route, with the segment kept in order or
//! reversed. The segment's interior arcs are repriced with the receiving
//! vehicle's cost. Single-node moves are left to relocate.
//!
//! # Complexity
//!
//! O(n² × L) per evaluation.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Regional Blood Banking", PhD thesis,
//! Northwestern University.

use super::moves::{improves, Candidate, Move};
use super::Neighborhood;
use crate::evaluation::ArcObjective;

/// Finds the best improving segment move of length `2..=max_segment`, if any.
pub fn best_or_opt<O: ArcObjective>(
    nb: &Neighborhood<'_, '_, O>,
    max_segment: usize,
) -> Option<Candidate> {
    let depot = nb.depot();
    let routes = nb.solution.routes();
    let mut best: Option<Candidate> = None;

    for from in routes {
        let fv = from.vehicle_id();
        let n = from.len();
        for len in 2..=max_segment.min(n) {
            for start in 0..=n - len {
                let segment = &from.nodes()[start..start + len];
                let first = segment[0];
                let last = segment[len - 1];
                let a = from.prev(start, depot);
                let b = from.at(start + len, depot);
                let removal = if len == n {
                    -nb.route_value(from)
                } else {
                    nb.t(fv, a, b)
                        - nb.t(fv, a, first)
                        - nb.path_cost(fv, segment.iter().copied())
                        - nb.t(fv, last, b)
                };

                for to in routes {
                    let tv = to.vehicle_id();
                    let same = tv == fv;
                    if same && len == n {
                        continue;
                    }
                    if !same && !nb.tracker.can_exchange(tv, &[], segment) {
                        continue;
                    }
                    let fixed = nb.objective.fixed(tv);
                    let opening = if to.is_empty() { fixed } else { 0 };

                    for (reversed, head, tail) in [(false, first, last), (true, last, first)] {
                        let interior = if reversed {
                            nb.path_cost(tv, segment.iter().rev().copied())
                        } else {
                            nb.path_cost(tv, segment.iter().copied())
                        };
                        let positions = if same { n - len } else { to.len() };
                        for pos in 0..=positions {
                            if same && pos == start && !reversed {
                                continue;
                            }
                            let (c, e) = if same {
                                nb.gap(from, start, len, pos)
                            } else {
                                (to.prev(pos, depot), to.at(pos, depot))
                            };
                            let bridge = if to.is_empty() { 0 } else { nb.t(tv, c, e) };
                            let inserted = nb.t(tv, c, head) + interior + nb.t(tv, tail, e);
                            let delta = removal + opening + inserted - bridge;
                            if improves(&best, delta) {
                                best = Some(Candidate::new(
                                    Move::OrOpt {
                                        from_vehicle: fv,
                                        start,
                                        len,
                                        to_vehicle: tv,
                                        to_pos: pos,
                                        reversed,
                                    },
                                    delta,
                                ));
                            }
                        }
                    }
                }
            }
        }
    }
    best
}
