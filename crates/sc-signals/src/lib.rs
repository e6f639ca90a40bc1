//! Analytic reference signals and magnitude scaling for sigcomp.
//!
//! # Architecture
//!
//! - `formula`: a closed registry of named analytic formulas, each a pure
//!   function of a frequency or time coordinate
//! - `scale`: linear/dB conversion and self-normalization, applied in a fixed
//!   order (normalize in the linear domain, then convert)
//! - `phase`: helpers for phase views of complex responses
//!
//! Nothing here performs I/O; callers decide what to do with warnings.

pub mod error;
pub mod formula;
pub mod phase;
pub mod scale;

pub use error::{SignalError, SignalResult};
pub use formula::{Evaluated, FormulaEntry, FormulaId, FormulaRegistry, FormulaValues};
pub use phase::wrap_phase_deg;
pub use scale::{
    from_decibels, normalize, to_decibels, ScaleMode, ScaleTransform, ScaleWarning, Transformed,
};
