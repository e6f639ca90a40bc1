//! Plot storage API.

use crate::hash::compute_plot_id;
use crate::types::{PlotManifest, RenderRequest};
use crate::{ResultsError, ResultsResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory of rendered plots: `<root>/<plot_id>/{manifest,request}.json`.
#[derive(Clone)]
pub struct PlotStore {
    root_dir: PathBuf,
}

impl PlotStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    fn plot_dir(&self, plot_id: &str) -> PathBuf {
        self.root_dir.join(plot_id)
    }

    pub fn has_plot(&self, plot_id: &str) -> bool {
        self.plot_dir(plot_id).join("manifest.json").exists()
    }

    /// Write `request` and return its manifest. Saving identical content for
    /// the same round and position again overwrites the same directory.
    pub fn save_plot(
        &self,
        round: usize,
        index: usize,
        request: &RenderRequest,
    ) -> ResultsResult<PlotManifest> {
        if request.series.is_empty() {
            return Err(ResultsError::EmptyRequest);
        }

        let plot_id = compute_plot_id(request, round, index);
        let plot_dir = self.plot_dir(&plot_id);
        fs::create_dir_all(&plot_dir)?;

        let manifest = PlotManifest {
            plot_id,
            round,
            index,
            timestamp: chrono::Utc::now().to_rfc3339(),
            title: request.title.clone(),
            series_labels: request.series.iter().map(|s| s.label.clone()).collect(),
        };

        let manifest_json = serde_json::to_string_pretty(&manifest)?;
        fs::write(plot_dir.join("manifest.json"), manifest_json)?;

        let request_json = serde_json::to_string_pretty(request)?;
        fs::write(plot_dir.join("request.json"), request_json)?;

        Ok(manifest)
    }

    pub fn load_manifest(&self, plot_id: &str) -> ResultsResult<PlotManifest> {
        let manifest_path = self.plot_dir(plot_id).join("manifest.json");

        if !manifest_path.exists() {
            return Err(ResultsError::PlotNotFound {
                plot_id: plot_id.to_string(),
            });
        }

        let content = fs::read_to_string(manifest_path)?;
        let manifest = serde_json::from_str(&content)?;
        Ok(manifest)
    }

    pub fn load_request(&self, plot_id: &str) -> ResultsResult<RenderRequest> {
        let request_path = self.plot_dir(plot_id).join("request.json");

        if !request_path.exists() {
            return Err(ResultsError::PlotNotFound {
                plot_id: plot_id.to_string(),
            });
        }

        let content = fs::read_to_string(request_path)?;
        let request = serde_json::from_str(&content)?;
        Ok(request)
    }

    /// All stored plots ordered by round, then position within the round.
    pub fn list_plots(&self) -> ResultsResult<Vec<PlotManifest>> {
        let mut plots = Vec::new();

        if !self.root_dir.exists() {
            return Ok(plots);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let plot_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&plot_id) {
                    plots.push(manifest);
                }
            }
        }

        plots.sort_by(|a, b| (a.round, a.index).cmp(&(b.round, b.index)));
        Ok(plots)
    }

    /// Remove a stored plot. Unknown ids are an error so a mistyped id is
    /// not silently accepted.
    pub fn delete_plot(&self, plot_id: &str) -> ResultsResult<()> {
        if !self.has_plot(plot_id) {
            return Err(ResultsError::PlotNotFound {
                plot_id: plot_id.to_string(),
            });
        }
        fs::remove_dir_all(self.plot_dir(plot_id))?;
        Ok(())
    }
}
