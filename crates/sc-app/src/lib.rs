//! Session service layer for sigcomp.
//!
//! This crate owns the state of one interactive comparison session (the
//! catalog of imported series and the saved axis ranges) and the pipeline
//! that turns a round plan into render requests. Frontends collect input
//! and hand over already-validated plans.

pub mod catalog;
pub mod compose;
pub mod config;
pub mod error;
pub mod plan;
pub mod preferences;
pub mod query;
pub mod reconcile;
pub mod round_service;

// Re-export key types for convenience
pub use catalog::{FileLoader, SeriesCatalog, SeriesLoader};
pub use compose::{PlotComposer, RenderFailure, Renderer, StoreRenderer, TransformedSeries};
pub use config::{load_config, parse_config, FamilyConfig, SessionConfig};
pub use error::{AppError, AppResult};
pub use plan::{GeneratedSeriesRequest, Participant, Quantity, RoundOptions, RoundPlan};
pub use preferences::{AxisChoice, SessionPreferences};
pub use query::{list_catalog, sample_formula, summarize_series, FormulaSamples, SeriesSummary};
pub use reconcile::{DomainAdjustment, DomainReconciler};
pub use round_service::{RoundFailure, RoundReport, Session, SeriesWarning};
