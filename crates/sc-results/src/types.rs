//! Render request data types.

use sc_core::AxisRange;
use serde::{Deserialize, Serialize};

pub type PlotId = String;

/// Horizontal axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AxisScale {
    #[default]
    Linear,
    Log,
}

/// Where a plotted series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesOrigin {
    Measured,
    Generated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// One line on a plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSeries {
    pub label: String,
    pub origin: SeriesOrigin,
    pub style: LineStyle,
    pub domain: Vec<f64>,
    pub values: Vec<f64>,
}

/// Everything a rendering backend needs to draw one figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x_limits: Option<AxisRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y_limits: Option<AxisRange>,
    #[serde(default)]
    pub x_scale: AxisScale,
    #[serde(default)]
    pub y_scale: AxisScale,
    pub series: Vec<RenderSeries>,
}

impl RenderRequest {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.domain.len()).sum()
    }
}

/// Metadata written next to a stored request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotManifest {
    pub plot_id: PlotId,
    pub round: usize,
    pub index: usize,
    pub timestamp: String,
    pub title: String,
    pub series_labels: Vec<String>,
}
