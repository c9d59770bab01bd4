//! Error taxonomy for instance validation, construction and search.

use std::fmt;

/// Errors raised while building or solving a routing instance.
///
/// Only [`RoutingError::InvalidInstance`] is caused by the caller's input.
/// [`RoutingError::InfeasibleInstance`] is a negative result: the input is
/// well formed but no assignment fits the fleet. The remaining variants are
/// internal failures that abort the current solve attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RoutingError {
    /// Malformed input (shape mismatch, negative or non-finite values, ...).
    InvalidInstance {
        /// Human readable description of the first problem found.
        reason: String,
    },
    /// The instance is valid but some nodes cannot be placed on any vehicle.
    InfeasibleInstance {
        /// Nodes left without a feasible route, ascending.
        unassigned: Vec<usize>,
    },
    /// The capacity tracker was asked to commit a load that does not fit.
    CapacityViolation {
        /// Vehicle whose route would overflow.
        vehicle: usize,
        /// Node being appended, `None` when several added nodes overflow
        /// together.
        node: Option<usize>,
        /// Name of the first overflowing dimension.
        dimension: String,
    },
    /// Unexpected internal failure, e.g. fixed-point overflow.
    EngineError {
        /// Human readable description.
        reason: String,
    },
}

impl RoutingError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInstance {
            reason: reason.into(),
        }
    }

    pub(crate) fn engine(reason: impl Into<String>) -> Self {
        Self::EngineError {
            reason: reason.into(),
        }
    }

    /// Returns `true` for the "no feasible solution" outcome.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::InfeasibleInstance { .. })
    }

    /// Returns `true` for errors caused by malformed caller input.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInstance { .. })
    }
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInstance { reason } => write!(f, "invalid instance: {reason}"),
            Self::InfeasibleInstance { unassigned } => {
                write!(f, "no feasible assignment for nodes {unassigned:?}")
            }
            Self::CapacityViolation {
                vehicle,
                node: Some(node),
                dimension,
            } => write!(
                f,
                "appending node {node} to vehicle {vehicle} exceeds '{dimension}' capacity"
            ),
            Self::CapacityViolation {
                vehicle,
                node: None,
                dimension,
            } => write!(
                f,
                "exchange on vehicle {vehicle} exceeds '{dimension}' capacity"
            ),
            Self::EngineError { reason } => write!(f, "engine error: {reason}"),
        }
    }
}

impl std::error::Error for RoutingError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let e = RoutingError::invalid("matrix is not square");
        assert_eq!(e.to_string(), "invalid instance: matrix is not square");

        let e = RoutingError::CapacityViolation {
            vehicle: 2,
            node: Some(5),
            dimension: "weight".into(),
        };
        assert_eq!(
            e.to_string(),
            "appending node 5 to vehicle 2 exceeds 'weight' capacity"
        );

        let e = RoutingError::CapacityViolation {
            vehicle: 2,
            node: None,
            dimension: "weight".into(),
        };
        assert_eq!(
            e.to_string(),
            "exchange on vehicle 2 exceeds 'weight' capacity"
        );
    }

    #[test]
    fn test_classification() {
        let infeasible = RoutingError::InfeasibleInstance {
            unassigned: vec![3],
        };
        assert!(infeasible.is_infeasible());
        assert!(!infeasible.is_invalid_input());
        assert!(RoutingError::invalid("x").is_invalid_input());
        assert!(!RoutingError::engine("overflow").is_infeasible());
    }
}
