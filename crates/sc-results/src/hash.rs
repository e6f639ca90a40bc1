//! Content-based hashing for plot IDs.

use sha2::{Digest, Sha256};

use crate::types::RenderRequest;

pub fn compute_plot_id(request: &RenderRequest, round: usize, index: usize) -> String {
    let mut hasher = Sha256::new();

    let request_json = serde_json::to_string(request).unwrap_or_default();
    hasher.update(request_json.as_bytes());

    hasher.update(round.to_le_bytes());
    hasher.update(index.to_le_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
