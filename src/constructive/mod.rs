//! Constructive heuristics for building initial solutions.
//!
//! - [`cheapest_arc_insertion`] — cheapest feasible insertion over all vehicles, O(n²(V + n))

mod cheapest_arc;

pub use cheapest_arc::cheapest_arc_insertion;
