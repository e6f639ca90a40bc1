//! Turn transformed series into render requests and hand them to a backend.

use sc_core::{AxisRange, DomainKind, Real};
use sc_results::{
    AxisScale, LineStyle, PlotManifest, PlotStore, RenderRequest, RenderSeries, SeriesOrigin,
};
use sc_signals::ScaleMode;
use tracing::{debug, warn};

use crate::error::AppResult;
use crate::plan::{Quantity, RoundOptions};

/// A series after evaluation and scaling, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedSeries {
    pub label: String,
    pub origin: SeriesOrigin,
    pub domain: Vec<Real>,
    pub values: Vec<Real>,
}

/// Rendering backend.
pub trait Renderer {
    /// Draw one figure. `round` counts from 1; `index` is the figure's
    /// position within the round.
    fn render(&mut self, round: usize, index: usize, request: &RenderRequest) -> AppResult<()>;
}

/// Writes every request to a [`PlotStore`].
pub struct StoreRenderer {
    store: PlotStore,
    saved: Vec<PlotManifest>,
}

impl StoreRenderer {
    pub fn new(store: PlotStore) -> Self {
        Self {
            store,
            saved: Vec::new(),
        }
    }

    pub fn store(&self) -> &PlotStore {
        &self.store
    }

    /// Manifests written so far, oldest first.
    pub fn saved(&self) -> &[PlotManifest] {
        &self.saved
    }
}

impl Renderer for StoreRenderer {
    fn render(&mut self, round: usize, index: usize, request: &RenderRequest) -> AppResult<()> {
        let manifest = self.store.save_plot(round, index, request)?;
        debug!(plot_id = %manifest.plot_id, "Stored plot");
        self.saved.push(manifest);
        Ok(())
    }
}

/// A figure the backend could not draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderFailure {
    pub title: String,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlotComposer;

impl PlotComposer {
    pub fn new() -> Self {
        Self
    }

    /// One request holding every series when `options.combined`, otherwise
    /// one request per series.
    pub fn build_requests(
        &self,
        kind: DomainKind,
        options: &RoundOptions,
        series: &[TransformedSeries],
        axis_ranges: (Option<AxisRange>, Option<AxisRange>),
    ) -> Vec<RenderRequest> {
        if series.is_empty() {
            return Vec::new();
        }

        let (x_limits, y_limits) = axis_ranges;
        let x_scale = if options.log_x && kind == DomainKind::Frequency {
            AxisScale::Log
        } else {
            AxisScale::Linear
        };
        let y_label = y_label(kind, options);
        let y_scale = y_scale(options, series);

        let request = |title: String, members: &[TransformedSeries]| RenderRequest {
            title,
            x_label: kind.axis_label().to_string(),
            y_label: y_label.clone(),
            x_limits,
            y_limits,
            x_scale,
            y_scale,
            series: members.iter().map(render_series).collect(),
        };

        if options.combined {
            vec![request(combined_title(kind, options.quantity), series)]
        } else {
            series
                .iter()
                .map(|s| request(s.label.clone(), std::slice::from_ref(s)))
                .collect()
        }
    }

    /// Render each request in turn. A failure is logged and collected; the
    /// remaining requests are still rendered.
    pub fn dispatch(
        &self,
        round: usize,
        requests: &[RenderRequest],
        renderer: &mut dyn Renderer,
    ) -> (usize, Vec<RenderFailure>) {
        let mut rendered = 0;
        let mut failures = Vec::new();

        for (index, request) in requests.iter().enumerate() {
            match renderer.render(round, index, request) {
                Ok(()) => rendered += 1,
                Err(e) => {
                    warn!(title = %request.title, error = %e, "Render failed");
                    failures.push(RenderFailure {
                        title: request.title.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        (rendered, failures)
    }
}

fn render_series(s: &TransformedSeries) -> RenderSeries {
    RenderSeries {
        label: s.label.clone(),
        origin: s.origin,
        style: match s.origin {
            SeriesOrigin::Measured => LineStyle::Solid,
            SeriesOrigin::Generated => LineStyle::Dashed,
        },
        domain: s.domain.clone(),
        values: s.values.clone(),
    }
}

/// Log magnitude axis, when asked for, only for linear magnitudes that are
/// all positive; anything else falls back to a linear axis.
fn y_scale(options: &RoundOptions, series: &[TransformedSeries]) -> AxisScale {
    if !options.log_y {
        return AxisScale::Linear;
    }
    let linear_magnitude =
        options.quantity == Quantity::Magnitude && options.scale_mode == ScaleMode::Linear;
    let positive = series.iter().all(|s| s.values.iter().all(|v| *v > 0.0));
    if linear_magnitude && positive {
        AxisScale::Log
    } else {
        warn!("Log magnitude axis needs positive linear magnitudes; using a linear axis");
        AxisScale::Linear
    }
}

fn y_label(kind: DomainKind, options: &RoundOptions) -> String {
    match (options.quantity, kind) {
        (Quantity::Phase, _) => "Phase (deg)".to_string(),
        (Quantity::Magnitude, DomainKind::Frequency) => {
            format!("Magnitude {}", options.scale_mode.axis_suffix())
        }
        (Quantity::Magnitude, DomainKind::Time) => {
            format!("Amplitude {}", options.scale_mode.axis_suffix())
        }
    }
}

fn combined_title(kind: DomainKind, quantity: Quantity) -> String {
    match (kind, quantity) {
        (DomainKind::Frequency, Quantity::Magnitude) => "Combined Frequency Response Magnitude",
        (DomainKind::Frequency, Quantity::Phase) => "Combined Frequency Response Phase",
        (DomainKind::Time, Quantity::Magnitude) => "Combined Time Domain Plots",
        (DomainKind::Time, Quantity::Phase) => "Combined Time Domain Phase",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;

    fn series(label: &str, origin: SeriesOrigin) -> TransformedSeries {
        TransformedSeries {
            label: label.to_string(),
            origin,
            domain: vec![1.0, 10.0],
            values: vec![0.5, 1.0],
        }
    }

    #[test]
    fn labels_follow_family_and_scale() {
        let options = RoundOptions {
            scale_mode: ScaleMode::Decibel,
            log_x: true,
            ..RoundOptions::default()
        };
        let requests = PlotComposer::new().build_requests(
            DomainKind::Frequency,
            &options,
            &[series("sim.txt", SeriesOrigin::Measured)],
            (None, None),
        );

        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].title, "sim.txt");
        assert_eq!(requests[0].x_label, "Frequency (Hz)");
        assert_eq!(requests[0].y_label, "Magnitude (dB)");
        assert_eq!(requests[0].x_scale, AxisScale::Log);
    }

    #[test]
    fn log_axis_ignored_for_time_rounds() {
        let options = RoundOptions {
            log_x: true,
            quantity: Quantity::Magnitude,
            ..RoundOptions::default()
        };
        let requests = PlotComposer::new().build_requests(
            DomainKind::Time,
            &options,
            &[series("Vo(t)", SeriesOrigin::Generated)],
            (None, None),
        );
        assert_eq!(requests[0].x_scale, AxisScale::Linear);
        assert_eq!(requests[0].y_label, "Amplitude (linear)");
        assert_eq!(requests[0].series[0].style, LineStyle::Dashed);
    }

    #[test]
    fn phase_rounds_use_phase_label() {
        let options = RoundOptions {
            quantity: Quantity::Phase,
            combined: true,
            ..RoundOptions::default()
        };
        let requests = PlotComposer::new().build_requests(
            DomainKind::Frequency,
            &options,
            &[
                series("a", SeriesOrigin::Measured),
                series("b", SeriesOrigin::Generated),
            ],
            (None, None),
        );
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].y_label, "Phase (deg)");
        assert_eq!(requests[0].title, "Combined Frequency Response Phase");
    }

    #[test]
    fn log_magnitude_axis_needs_positive_linear_values() {
        let composer = PlotComposer::new();
        let options = RoundOptions {
            log_x: true,
            log_y: true,
            ..RoundOptions::default()
        };
        let positive = composer.build_requests(
            DomainKind::Frequency,
            &options,
            &[series("a", SeriesOrigin::Measured)],
            (None, None),
        );
        assert_eq!(positive[0].x_scale, AxisScale::Log);
        assert_eq!(positive[0].y_scale, AxisScale::Log);

        let mut with_zero = series("b", SeriesOrigin::Generated);
        with_zero.values[0] = 0.0;
        let fallback =
            composer.build_requests(DomainKind::Frequency, &options, &[with_zero], (None, None));
        assert_eq!(fallback[0].y_scale, AxisScale::Linear);

        let decibel = RoundOptions {
            scale_mode: ScaleMode::Decibel,
            ..options
        };
        let db = composer.build_requests(
            DomainKind::Frequency,
            &decibel,
            &[series("a", SeriesOrigin::Measured)],
            (None, None),
        );
        assert_eq!(db[0].y_scale, AxisScale::Linear);
    }

    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render(&mut self, _: usize, index: usize, _: &RenderRequest) -> AppResult<()> {
            if index == 0 {
                Err(AppError::Render("backend offline".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn failed_render_does_not_stop_dispatch() {
        let composer = PlotComposer::new();
        let requests = composer.build_requests(
            DomainKind::Time,
            &RoundOptions::default(),
            &[
                series("a", SeriesOrigin::Measured),
                series("b", SeriesOrigin::Measured),
            ],
            (None, None),
        );

        let (rendered, failures) = composer.dispatch(1, &requests, &mut FailingRenderer);
        assert_eq!(rendered, 1);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].title, "a");
    }
}
