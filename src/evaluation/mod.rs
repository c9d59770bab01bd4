//! Cost and feasibility evaluation.
//!
//! - [`Scale`] — fixed-point conversion between real and internal units
//! - [`CapacityTracker`] — per-route, per-dimension cumulative loads
//! - [`CostEvaluator`] / [`ArcObjective`] — arc, route and solution costs

mod evaluator;
mod scale;
mod tracker;

pub use evaluator::{ArcObjective, CostEvaluator};
pub use scale::Scale;
pub use tracker::CapacityTracker;
