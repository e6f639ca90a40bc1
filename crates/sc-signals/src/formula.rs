//! Closed registry of analytic reference formulas.
//!
//! Frequency-family formulas take a frequency in hertz, evaluate at
//! `w = 2*pi*f` and return complex spectra. Time-family formulas take seconds
//! and return real values. A coordinate of exactly zero is replaced by
//! [`DENOMINATOR_EPSILON`](sc_core::DENOMINATOR_EPSILON) before any `1/w`
//! term, which lands on the limit value instead of a division error.

use core::fmt;
use std::f64::consts::PI;
use std::str::FromStr;

use num_complex::Complex64;
use sc_core::{guard_denominator, DomainKind, DomainSpec, Real};

use crate::error::{SignalError, SignalResult};

/// Pulse width `m` (seconds) of the two-level pulse whose spectrum is `S2`.
const FFT_KERNEL_PULSE_S: Real = 1e-3;

/// `R/L` of the RL impulse response (R = 1 ohm, L = 1 H).
const IMPULSE_R_OVER_L: Real = 1.0;

/// `R/L` of the circuit driven by the input pulse (R = 10 ohm, L = 1 mH).
const CONVOLUTION_R_OVER_L: Real = 1e4;

/// Edges of the two-level input pulse.
const PULSE_STEP_S: Real = 1e-3;
const PULSE_END_S: Real = 2e-3;

/// Built-in formula identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormulaId {
    /// Spectrum `S2(w)` of the two-level input pulse.
    FftKernel,
    /// Spectrum of a unit rectangular pulse, `sin w / w + j (cos w - 1) / w`.
    UnitPulse,
    /// RL high-pass impulse response `H(t) = delta(t) - (R/L) e^(-R t / L)`.
    ImpulseResponse,
    /// Closed-form output of the RL circuit driven by the two-level pulse.
    ConvolutionOutput,
    /// The two-level input pulse `S(t)` itself.
    InputPulse,
}

impl FormulaId {
    pub const ALL: [FormulaId; 5] = [
        FormulaId::FftKernel,
        FormulaId::UnitPulse,
        FormulaId::ImpulseResponse,
        FormulaId::ConvolutionOutput,
        FormulaId::InputPulse,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::FftKernel => "fft-kernel",
            Self::UnitPulse => "unit-pulse",
            Self::ImpulseResponse => "impulse-response",
            Self::ConvolutionOutput => "convolution-output",
            Self::InputPulse => "input-pulse",
        }
    }

    pub fn family(self) -> DomainKind {
        match self {
            Self::FftKernel | Self::UnitPulse => DomainKind::Frequency,
            Self::ImpulseResponse | Self::ConvolutionOutput | Self::InputPulse => DomainKind::Time,
        }
    }
}

impl fmt::Display for FormulaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormulaId {
    type Err = SignalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| SignalError::UnknownFormula(s.trim().to_string()))
    }
}

/// Samples produced by a formula.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValues {
    Complex(Vec<Complex64>),
    Real(Vec<Real>),
}

impl FormulaValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Complex(v) => v.len(),
            Self::Real(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `|z|` for spectra; the signed value itself for real signals.
    pub fn amplitude(&self) -> Vec<Real> {
        match self {
            Self::Complex(v) => v.iter().map(|z| z.norm()).collect(),
            Self::Real(v) => v.clone(),
        }
    }

    /// `arg(z)` in degrees for spectra; zero for real signals.
    pub fn phase_deg(&self) -> Vec<Real> {
        match self {
            Self::Complex(v) => v.iter().map(|z| z.arg().to_degrees()).collect(),
            Self::Real(v) => vec![0.0; v.len()],
        }
    }
}

/// Domain grid and the formula sampled on it.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    pub domain: Vec<Real>,
    pub values: FormulaValues,
}

/// A registered formula.
#[derive(Clone, Copy)]
pub struct FormulaEntry {
    pub id: FormulaId,
    pub name: &'static str,
    pub expression: &'static str,
    eval: fn(&[Real]) -> FormulaValues,
}

impl FormulaEntry {
    pub fn family(&self) -> DomainKind {
        self.id.family()
    }
}

impl fmt::Debug for FormulaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormulaEntry")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

const BUILTIN_FORMULAS: [FormulaEntry; 5] = [
    FormulaEntry {
        id: FormulaId::FftKernel,
        name: "Pulse spectrum S2",
        expression: "(sin(2mw) - 0.5 sin(mw))/w + j(cos(2mw) - 0.5 cos(mw) - 0.5)/w, m = 1 ms",
        eval: eval_fft_kernel,
    },
    FormulaEntry {
        id: FormulaId::UnitPulse,
        name: "Unit pulse spectrum",
        expression: "sin(w)/w + j(cos(w) - 1)/w",
        eval: eval_unit_pulse,
    },
    FormulaEntry {
        id: FormulaId::ImpulseResponse,
        name: "RL impulse response",
        expression: "H(t) = delta(t) - (R/L) exp(-R t / L), R = L = 1",
        eval: eval_impulse_response,
    },
    FormulaEntry {
        id: FormulaId::ConvolutionOutput,
        name: "Theoretical convolution output",
        expression: "Vo(t) = (S * H)(t), piecewise over 0, 1 ms, 2 ms",
        eval: eval_convolution_output,
    },
    FormulaEntry {
        id: FormulaId::InputPulse,
        name: "Two-level input pulse",
        expression: "S(t) = 0.5 on [0, 1 ms), 1 on [1 ms, 2 ms), else 0",
        eval: eval_input_pulse,
    },
];

/// Lookup table from [`FormulaId`] to its implementation.
#[derive(Debug, Clone)]
pub struct FormulaRegistry {
    entries: Vec<FormulaEntry>,
}

impl Default for FormulaRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl FormulaRegistry {
    /// Registry with every built-in formula.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_FORMULAS.to_vec(),
        }
    }

    /// Registry restricted to `ids`.
    pub fn with_formulas(ids: &[FormulaId]) -> Self {
        Self {
            entries: BUILTIN_FORMULAS
                .iter()
                .filter(|e| ids.contains(&e.id))
                .copied()
                .collect(),
        }
    }

    pub fn entries(&self) -> &[FormulaEntry] {
        &self.entries
    }

    pub fn get(&self, id: FormulaId) -> SignalResult<&FormulaEntry> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| SignalError::UnknownFormula(id.to_string()))
    }

    /// Sample `id` on the grid described by `spec`.
    pub fn evaluate(&self, id: FormulaId, spec: &DomainSpec) -> SignalResult<Evaluated> {
        let entry = self.get(id)?;
        if spec.count == 0 {
            return Err(SignalError::InvalidDomain {
                what: "sample count must be positive".to_string(),
            });
        }
        if !spec.min.is_finite() || !spec.max.is_finite() {
            return Err(SignalError::InvalidDomain {
                what: format!("non-finite bounds [{}, {}]", spec.min, spec.max),
            });
        }

        let domain = spec.samples();
        let values = (entry.eval)(&domain);
        Ok(Evaluated { domain, values })
    }

    /// Like [`evaluate`](Self::evaluate), resolving the id from its name first.
    pub fn evaluate_named(&self, name: &str, spec: &DomainSpec) -> SignalResult<Evaluated> {
        let id: FormulaId = name.parse()?;
        self.evaluate(id, spec)
    }
}

fn angular(freq_hz: Real) -> Real {
    guard_denominator(2.0 * PI * freq_hz)
}

fn eval_fft_kernel(freqs: &[Real]) -> FormulaValues {
    let m = FFT_KERNEL_PULSE_S;
    FormulaValues::Complex(
        freqs
            .iter()
            .map(|&f| {
                let w = angular(f);
                let re = ((2.0 * m * w).sin() - 0.5 * (m * w).sin()) / w;
                let im = ((2.0 * m * w).cos() - 0.5 * (m * w).cos() - 0.5) / w;
                Complex64::new(re, im)
            })
            .collect(),
    )
}

fn eval_unit_pulse(freqs: &[Real]) -> FormulaValues {
    FormulaValues::Complex(
        freqs
            .iter()
            .map(|&f| {
                let w = angular(f);
                Complex64::new(w.sin() / w, (w.cos() - 1.0) / w)
            })
            .collect(),
    )
}

fn eval_impulse_response(times: &[Real]) -> FormulaValues {
    let k = IMPULSE_R_OVER_L;
    FormulaValues::Real(
        times
            .iter()
            .map(|&t| {
                if t < 0.0 {
                    0.0
                } else {
                    // delta(t) sampled as a unit spike at t = 0
                    let delta = if t == 0.0 { 1.0 } else { 0.0 };
                    delta - k * (-k * t).exp()
                }
            })
            .collect(),
    )
}

fn eval_convolution_output(times: &[Real]) -> FormulaValues {
    let k = CONVOLUTION_R_OVER_L;
    FormulaValues::Real(
        times
            .iter()
            .map(|&t| {
                if t < 0.0 {
                    0.0
                } else if t < PULSE_STEP_S {
                    0.5 * (-k * t).exp()
                } else if t < PULSE_END_S {
                    0.5 * (-k * (t - PULSE_STEP_S)).exp() + 0.5 * (-k * t).exp()
                } else {
                    0.5 * (-k * t).exp() * (1.0 + (k * PULSE_STEP_S).exp())
                        - (-k * (t - PULSE_END_S)).exp()
                }
            })
            .collect(),
    )
}

fn eval_input_pulse(times: &[Real]) -> FormulaValues {
    FormulaValues::Real(
        times
            .iter()
            .map(|&t| {
                if t < 0.0 {
                    0.0
                } else if t < PULSE_STEP_S {
                    0.5
                } else if t < PULSE_END_S {
                    1.0
                } else {
                    0.0
                }
            })
            .collect(),
    )
}
