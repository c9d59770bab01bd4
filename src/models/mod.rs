//! Domain model types for the heterogeneous fleet routing problem.
//!
//! Provides the validated instance (nodes, dimensions, vehicles, distances),
//! routes as ordered node sequences, and solutions as one route per vehicle.

mod instance;
mod route;
mod solution;
mod vehicle;

pub use instance::{Dimension, Instance, InstanceData};
pub use route::Route;
pub use solution::{Solution, Violation, ViolationType};
pub use vehicle::Vehicle;
