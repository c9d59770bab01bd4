//! Distance matrices.
//!
//! Provides a dense, possibly asymmetric distance matrix in scaled units.

mod matrix;

pub use matrix::DistanceMatrix;
