//! Validated axis ranges.

use crate::{CoreError, CoreResult, Real};

/// Closed display interval for one plot axis.
///
/// An unset axis is represented as `Option<AxisRange>::None`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AxisRange {
    pub min: Real,
    pub max: Real,
}

impl AxisRange {
    /// Create a range, rejecting `max <= min` and non-finite bounds.
    pub fn new(min: Real, max: Real) -> CoreResult<Self> {
        if !min.is_finite() {
            return Err(CoreError::NonFinite {
                what: "axis min",
                value: min,
            });
        }
        if !max.is_finite() {
            return Err(CoreError::NonFinite {
                what: "axis max",
                value: max,
            });
        }
        if max <= min {
            return Err(CoreError::InvalidRange {
                what: "axis",
                min,
                max,
            });
        }
        Ok(Self { min, max })
    }

    pub fn span(&self) -> Real {
        self.max - self.min
    }

    pub fn contains(&self, v: Real) -> bool {
        v >= self.min && v <= self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_and_empty_ranges() {
        assert!(matches!(
            AxisRange::new(5.0, 1.0),
            Err(CoreError::InvalidRange { .. })
        ));
        assert!(AxisRange::new(1.0, 1.0).is_err());
        assert!(AxisRange::new(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn accepts_ordered_range() {
        let r = AxisRange::new(-1.0, 1.0).unwrap();
        assert_eq!(r.span(), 2.0);
        assert!(r.contains(0.0));
        assert!(!r.contains(1.5));
    }
}
