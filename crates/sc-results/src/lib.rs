//! sc-results: render requests and the on-disk plot store.

pub mod hash;
pub mod store;
pub mod types;

pub use hash::compute_plot_id;
pub use store::PlotStore;
pub use types::*;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Plot not found: {plot_id}")]
    PlotNotFound { plot_id: String },

    #[error("Render request has no series")]
    EmptyRequest,
}
