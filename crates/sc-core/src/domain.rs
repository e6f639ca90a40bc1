//! Sampling domains: the independent-variable axis a series lives on.

use core::fmt;

use crate::{linspace, CoreError, CoreResult, Real};

/// Family of the independent variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DomainKind {
    /// Frequency axis in hertz.
    Frequency,
    /// Time axis in seconds.
    Time,
}

impl DomainKind {
    /// Axis title used when plotting this family.
    pub fn axis_label(self) -> &'static str {
        match self {
            Self::Frequency => "Frequency (Hz)",
            Self::Time => "Time (s)",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Frequency => "Hz",
            Self::Time => "s",
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Frequency => write!(f, "frequency"),
            Self::Time => write!(f, "time"),
        }
    }
}

/// Fallback sampling for a formula family when nothing else constrains it.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainDefaults {
    pub min: Real,
    pub max: Real,
    pub count: usize,
}

impl DomainDefaults {
    /// Starts just above 0 Hz to stay clear of the `1/w` singularity.
    pub const FREQUENCY: Self = Self {
        min: 1e-3,
        max: 1e4,
        count: 1000,
    };

    /// Starts slightly before 0 s so the causal edge is visible.
    pub const TIME: Self = Self {
        min: -1e-3,
        max: 5e-3,
        count: 1000,
    };

    pub fn for_kind(kind: DomainKind) -> Self {
        match kind {
            DomainKind::Frequency => Self::FREQUENCY,
            DomainKind::Time => Self::TIME,
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        DomainSpec::custom(self.min, self.max, self.count).map(|_| ())
    }
}

/// Sampling request for a generated series.
///
/// `is_custom` marks a spec the user typed in; reconciliation never
/// overwrites those.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DomainSpec {
    pub min: Real,
    pub max: Real,
    pub count: usize,
    pub is_custom: bool,
}

impl DomainSpec {
    /// User-supplied domain: `max > min`, `count > 0`, finite bounds.
    pub fn custom(min: Real, max: Real, count: usize) -> CoreResult<Self> {
        if !min.is_finite() {
            return Err(CoreError::NonFinite {
                what: "domain min",
                value: min,
            });
        }
        if !max.is_finite() {
            return Err(CoreError::NonFinite {
                what: "domain max",
                value: max,
            });
        }
        if max <= min {
            return Err(CoreError::InvalidRange {
                what: "domain",
                min,
                max,
            });
        }
        if count == 0 {
            return Err(CoreError::InvalidArg {
                what: "sample count must be positive",
            });
        }
        Ok(Self {
            min,
            max,
            count,
            is_custom: true,
        })
    }

    /// Placeholder spec that reconciliation is free to replace.
    pub fn unconstrained(defaults: DomainDefaults) -> Self {
        Self {
            min: defaults.min,
            max: defaults.max,
            count: defaults.count,
            is_custom: false,
        }
    }

    /// Sampling grid described by this spec.
    pub fn samples(&self) -> Vec<Real> {
        linspace(self.min, self.max, self.count)
    }
}
