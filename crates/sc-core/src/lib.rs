//! sc-core: stable foundation for sigcomp.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers + sampling grids)
//! - domain (domain families, sampling specs and their defaults)
//! - axis (validated axis ranges)
//! - series (measured series imported from instrument exports)
//! - error (shared error types)

pub mod axis;
pub mod domain;
pub mod error;
pub mod numeric;
pub mod series;

// Re-exports: nice ergonomics for downstream crates
pub use axis::AxisRange;
pub use domain::{DomainDefaults, DomainKind, DomainSpec};
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use series::{MeasuredSeries, SeriesData};
