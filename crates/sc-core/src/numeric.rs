/// Sample type for every domain and value vector.
pub type Real = f64;

/// Stand-in for an exact zero in a denominator (e.g. `sin(w)/w` at `w = 0`).
pub const DENOMINATOR_EPSILON: Real = 1e-15;

/// Floor added before taking `log10` of a magnitude.
pub const DECIBEL_EPSILON: Real = 1e-30;

/// Absolute and relative slack for float comparisons.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

/// True when `a` and `b` agree within either the absolute or the relative
/// tolerance.
pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    diff <= tol.abs || diff <= tol.rel * a.abs().max(b.abs())
}

/// Replace an exact zero with [`DENOMINATOR_EPSILON`].
#[inline]
pub fn guard_denominator(x: Real) -> Real {
    if x == 0.0 { DENOMINATOR_EPSILON } else { x }
}

/// `count` evenly spaced points from `min` to `max`, both ends included.
///
/// A single point yields `[min]`; zero points yield an empty grid.
pub fn linspace(min: Real, max: Real, count: usize) -> Vec<Real> {
    match count {
        0 => Vec::new(),
        1 => vec![min],
        _ => {
            let step = (max - min) / (count - 1) as Real;
            let mut grid: Vec<Real> = (0..count).map(|i| min + i as Real * step).collect();
            // pin the endpoint so accumulated rounding never overshoots
            grid[count - 1] = max;
            grid
        }
    }
}

/// Largest absolute value in `values`, 0 for an empty slice.
pub fn peak_abs(values: &[Real]) -> Real {
    values.iter().fold(0.0, |acc: Real, v| acc.max(v.abs()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_monotonic_and_bounded(
            min in -1.0e6_f64..1.0e6,
            span in 1.0e-6_f64..1.0e6,
            count in 2_usize..2000,
        ) {
            let max = min + span;
            let grid = linspace(min, max, count);
            prop_assert_eq!(grid.len(), count);
            prop_assert_eq!(grid[0], min);
            prop_assert_eq!(grid[count - 1], max);
            prop_assert!(grid.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
