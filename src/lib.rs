//! # u-fleet
//!
//! Heterogeneous-fleet capacitated vehicle routing: multi-dimension
//! capacities, per-vehicle fixed and per-distance costs, cheapest-arc
//! construction and guided local search under a wall-clock budget.
//!
//! ## Modules
//!
//! - [`models`] — Validated instance, vehicles, routes and solutions
//! - [`distance`] — Scaled, possibly asymmetric distance matrix
//! - [`evaluation`] — Fixed-point scale, capacity tracking and cost evaluation
//! - [`constructive`] — Cheapest-feasible-arc insertion
//! - [`local_search`] — Move operators and the guided local search engine
//! - [`report`] — Extraction of a solution into real units
//! - [`solver`] — End-to-end pipeline with independent restarts
//!
//! ## Example
//!
//! ```
//! use u_fleet::models::{Instance, InstanceData};
//! use u_fleet::local_search::SearchConfig;
//! use u_fleet::solver::{SolveOutcome, Solver};
//!
//! let data = InstanceData::new(
//!     vec![
//!         vec![0.0, 4.0, 5.0],
//!         vec![4.0, 0.0, 2.0],
//!         vec![5.0, 2.0, 0.0],
//!     ],
//!     2,
//! )
//! .with_dimension("weight", vec![0.0, 3.0, 4.0], vec![10.0, 5.0])
//! .with_fixed_costs(vec![100.0, 60.0])
//! .with_per_km_costs(vec![1.0, 1.5]);
//! let instance = Instance::new(&data).unwrap();
//!
//! let config = SearchConfig::default().with_max_iterations(200);
//! let SolveOutcome::Solved(report) = Solver::new(&instance, config).solve().unwrap() else {
//!     panic!("instance is feasible");
//! };
//! // one vehicle serves both nodes
//! assert_eq!(report.used_routes().count(), 1);
//! ```

pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod report;
pub mod solver;

#[cfg(test)]
mod testing;

pub use error::{Result, RoutingError};
pub use solver::{SolveOutcome, Solver};
