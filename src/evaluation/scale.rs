//! Fixed-point scaling between real input units and internal integers.

use crate::error::{Result, RoutingError};

/// Fixed-point scale factor applied to distances, demands, capacities and
/// per-distance costs.
///
/// Conversion truncates toward zero, the same rule as an integer cast, so
/// `0.0479` at scale 1000 becomes `47`. Costs are kept in squared units
/// (`factor²`) because a variable cost is a scaled rate times a scaled
/// distance.
///
/// # Examples
///
/// ```
/// use u_fleet::evaluation::Scale;
///
/// let scale = Scale::DEFAULT;
/// assert_eq!(scale.to_fixed(68.2625).unwrap(), 68_262);
/// assert_eq!(scale.to_fixed(-1.9999).unwrap(), -1_999);
/// assert!((scale.to_real(68_262) - 68.262).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scale(i64);

impl Scale {
    /// Three decimal digits of precision.
    pub const DEFAULT: Scale = Scale(1000);

    /// Creates a scale with the given factor. Returns `None` if `factor < 1`.
    pub fn new(factor: i64) -> Option<Self> {
        (factor >= 1).then_some(Self(factor))
    }

    /// The multiplication factor.
    pub fn factor(&self) -> i64 {
        self.0
    }

    /// Converts a real value to scaled units, truncating toward zero.
    pub fn to_fixed(&self, value: f64) -> Result<i64> {
        if !value.is_finite() {
            return Err(RoutingError::engine(format!(
                "cannot scale non-finite value {value}"
            )));
        }
        let scaled = (value * self.0 as f64).trunc();
        if scaled >= i64::MAX as f64 || scaled <= i64::MIN as f64 {
            return Err(RoutingError::engine(format!(
                "scaling {value} by {} overflows",
                self.0
            )));
        }
        Ok(scaled as i64)
    }

    /// Converts a real cost to cost units (`factor²`).
    pub fn to_fixed_cost(&self, value: f64) -> Result<i64> {
        self.to_fixed(value)?
            .checked_mul(self.0)
            .ok_or_else(|| RoutingError::engine(format!("fixed cost {value} overflows")))
    }

    /// Converts scaled units back to real units.
    pub fn to_real(&self, value: i64) -> f64 {
        value as f64 / self.0 as f64
    }

    /// Converts cost units (`factor²`) back to real units.
    pub fn cost_to_real(&self, value: i64) -> f64 {
        value as f64 / (self.0 as f64 * self.0 as f64)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::DEFAULT
    }
}
