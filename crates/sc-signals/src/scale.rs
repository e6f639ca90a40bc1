//! Magnitude scale transforms.
//!
//! Normalization divides by the peak absolute value and always runs in the
//! linear domain. Decibel conversion comes after it: normalizing in dB space
//! would subtract, not divide, and is not offered.

use core::fmt;
use std::str::FromStr;

use sc_core::{peak_abs, Real, DECIBEL_EPSILON};
use tracing::warn;

/// Vertical scale of magnitude plots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScaleMode {
    #[default]
    Linear,
    Decibel,
}

impl ScaleMode {
    /// Suffix appended to magnitude axis labels.
    pub fn axis_suffix(self) -> &'static str {
        match self {
            Self::Linear => "(linear)",
            Self::Decibel => "(dB)",
        }
    }
}

impl FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "lin" => Ok(Self::Linear),
            "db" | "decibel" => Ok(Self::Decibel),
            other => Err(format!("unknown scale mode: {other}")),
        }
    }
}

/// Non-fatal conditions met while transforming a series.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleWarning {
    /// Peak magnitude was zero; the series was replaced by zeros.
    DegenerateNormalization,
    /// Negative samples were rectified before taking logarithms.
    NegativeMagnitude { count: usize },
}

impl fmt::Display for ScaleWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateNormalization => {
                write!(f, "all-zero magnitude, normalization skipped")
            }
            Self::NegativeMagnitude { count } => {
                write!(f, "{count} negative sample(s) rectified before dB conversion")
            }
        }
    }
}

/// `values / max(|values|)`, or all zeros when the peak is zero.
pub fn normalize(values: &[Real]) -> Vec<Real> {
    let peak = peak_abs(values);
    if peak == 0.0 {
        warn!("Cannot normalize an all-zero series; substituting zeros");
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / peak).collect()
}

/// `20 log10(v + 1e-30)` per sample. Inputs are magnitudes (non-negative).
pub fn to_decibels(values: &[Real]) -> Vec<Real> {
    values
        .iter()
        .map(|v| 20.0 * (v + DECIBEL_EPSILON).log10())
        .collect()
}

/// `10^(v / 20)` per sample.
pub fn from_decibels(values: &[Real]) -> Vec<Real> {
    values.iter().map(|v| 10f64.powf(v / 20.0)).collect()
}

/// Output of [`ScaleTransform::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct Transformed {
    pub values: Vec<Real>,
    pub warnings: Vec<ScaleWarning>,
}

/// Normalize-then-convert pipeline for linear magnitude data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScaleTransform {
    pub mode: ScaleMode,
    pub normalize: bool,
}

impl ScaleTransform {
    pub fn new(mode: ScaleMode, normalize: bool) -> Self {
        Self { mode, normalize }
    }

    /// Apply normalization (if enabled) and then the scale conversion.
    pub fn apply(&self, linear: &[Real]) -> Transformed {
        let mut warnings = Vec::new();

        let mut values = if self.normalize {
            if peak_abs(linear) == 0.0 {
                warnings.push(ScaleWarning::DegenerateNormalization);
            }
            normalize(linear)
        } else {
            linear.to_vec()
        };

        if self.mode == ScaleMode::Decibel {
            let negatives = values.iter().filter(|v| **v < 0.0).count();
            if negatives > 0 {
                warn!(count = negatives, "Rectifying negative samples before dB conversion");
                warnings.push(ScaleWarning::NegativeMagnitude { count: negatives });
                values.iter_mut().for_each(|v| *v = v.abs());
            }
            values = to_decibels(&values);
        }

        Transformed { values, warnings }
    }
}
