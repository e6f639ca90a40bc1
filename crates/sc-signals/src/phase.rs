//! Phase helpers.

/// Wrap phases in degrees into `[-180, 180]`.
pub fn wrap_phase_deg(values: &[f64]) -> Vec<f64> {
    values
        .iter()
        .map(|p| {
            let mut wrapped = p % 360.0;
            if wrapped > 180.0 {
                wrapped -= 360.0;
            } else if wrapped < -180.0 {
                wrapped += 360.0;
            }
            wrapped
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_into_half_open_circle() {
        let wrapped = wrap_phase_deg(&[0.0, 190.0, -190.0, 540.0, -45.0]);
        assert_eq!(wrapped, vec![0.0, -170.0, 170.0, 180.0, -45.0]);
    }
}
