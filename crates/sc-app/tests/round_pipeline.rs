//! End-to-end rounds through the session service layer.

use std::cell::Cell;
use std::rc::Rc;

use sc_app::*;
use sc_core::{AxisRange, DomainDefaults, DomainKind, DomainSpec, MeasuredSeries};
use sc_results::{LineStyle, PlotStore, RenderRequest, SeriesOrigin};
use sc_signals::{FormulaId, FormulaRegistry, ScaleMode, ScaleWarning};

/// In-memory loader that counts how often it is asked for data.
struct FixtureLoader {
    calls: Rc<Cell<usize>>,
}

impl SeriesLoader for FixtureLoader {
    fn load(&mut self, handle: &str) -> AppResult<MeasuredSeries> {
        self.calls.set(self.calls.get() + 1);
        let series = match handle {
            "a.txt" => time_series(handle, 100.0, 11),
            "b.txt" => time_series(handle, 250.0, 26),
            "zeros.txt" => MeasuredSeries::time_series(handle, vec![0.0, 1.0], vec![0.0, 0.0])?,
            "bode.txt" => MeasuredSeries::frequency_response(
                handle,
                vec![1.0, 10.0],
                vec![0.0, -20.0],
                vec![190.0, -45.0],
            )?,
            other => {
                return Err(AppError::SourceLoad {
                    handle: other.to_string(),
                    reason: "no such fixture".to_string(),
                });
            }
        };
        Ok(series)
    }
}

fn time_series(handle: &str, max: f64, count: usize) -> MeasuredSeries {
    let domain = sc_core::linspace(0.0, max, count);
    let values = vec![1.0; count];
    MeasuredSeries::time_series(handle, domain, values).unwrap()
}

fn session() -> (Session, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let loader = FixtureLoader {
        calls: Rc::clone(&calls),
    };
    (Session::new(SessionConfig::default(), Box::new(loader)), calls)
}

#[derive(Default)]
struct RecordingRenderer {
    requests: Vec<(usize, usize, RenderRequest)>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, round: usize, index: usize, request: &RenderRequest) -> AppResult<()> {
        self.requests.push((round, index, request.clone()));
        Ok(())
    }
}

fn unconstrained(id: FormulaId) -> Participant {
    Participant::Generated(GeneratedSeriesRequest::new(
        id,
        DomainSpec::unconstrained(DomainDefaults::for_kind(id.family())),
    ))
}

#[test]
fn generated_series_follow_furthest_measured_series() {
    let (mut session, _) = session();
    session.load_source("a.txt").unwrap();
    session.load_source("b.txt").unwrap();

    let mut plan = RoundPlan::new(RoundOptions::default());
    plan.push(Participant::measured("a.txt"))
        .push(Participant::measured("b.txt"))
        .push(unconstrained(FormulaId::InputPulse));

    let mut renderer = RecordingRenderer::default();
    let report = session
        .run_round(plan, AxisChoice::AUTO, &mut renderer)
        .unwrap();

    assert_eq!(report.kind, DomainKind::Time);
    assert_eq!(report.adjustments.len(), 1);
    let adj = &report.adjustments[0];
    assert_eq!(adj.max, 250.0);
    assert_eq!(adj.min, 0.0);
    assert_eq!(adj.count, 26);

    let generated = &renderer.requests[2].2.series[0];
    assert_eq!(generated.domain.len(), 26);
    assert_eq!(generated.domain.last().copied(), Some(250.0));
    assert_eq!(generated.style, LineStyle::Dashed);
}

#[test]
fn custom_series_sets_the_reach_without_measured_data() {
    let (mut session, _) = session();
    let custom = DomainSpec::custom(1.0, 500.0, 50).unwrap();

    let mut plan = RoundPlan::new(RoundOptions::default());
    plan.push(Participant::Generated(GeneratedSeriesRequest::new(
        FormulaId::UnitPulse,
        custom,
    )))
    .push(unconstrained(FormulaId::FftKernel));

    let report = session
        .run_round(plan, AxisChoice::AUTO, &mut RecordingRenderer::default())
        .unwrap();

    assert_eq!(report.adjustments.len(), 1);
    assert_eq!(report.adjustments[0].label, "fft-kernel");
    assert_eq!(report.adjustments[0].max, 500.0);
    assert_eq!(report.adjustments[0].min, DomainDefaults::FREQUENCY.min);
    assert_eq!(report.adjustments[0].count, DomainDefaults::FREQUENCY.count);
}

#[test]
fn catalogued_sources_are_loaded_once() {
    let (mut session, calls) = session();
    session.load_source("a.txt").unwrap();
    session.load_source("a.txt").unwrap();

    for _ in 0..2 {
        let mut plan = RoundPlan::new(RoundOptions::default());
        plan.push(Participant::measured("a.txt"));
        session
            .run_round(plan, AxisChoice::AUTO, &mut RecordingRenderer::default())
            .unwrap();
        session.load_source("a.txt").unwrap();
    }

    assert_eq!(calls.get(), 1);
    assert_eq!(session.catalog().list_handles(), vec!["a.txt"]);
    assert_eq!(session.rounds(), 2);
}

#[test]
fn combined_rounds_render_one_figure() {
    let (mut session, _) = session();
    session.load_source("a.txt").unwrap();

    let build = |combined: bool| {
        let mut plan = RoundPlan::new(RoundOptions {
            combined,
            ..RoundOptions::default()
        });
        plan.push(Participant::measured("a.txt"))
            .push(unconstrained(FormulaId::InputPulse))
            .push(unconstrained(FormulaId::ConvolutionOutput));
        plan
    };

    let mut renderer = RecordingRenderer::default();
    let report = session
        .run_round(build(true), AxisChoice::AUTO, &mut renderer)
        .unwrap();
    assert_eq!(report.rendered, 1);
    assert_eq!(renderer.requests[0].2.series.len(), 3);

    let mut renderer = RecordingRenderer::default();
    let report = session
        .run_round(build(false), AxisChoice::AUTO, &mut renderer)
        .unwrap();
    assert_eq!(report.rendered, 3);
    let indices: Vec<usize> = renderer.requests.iter().map(|r| r.1).collect();
    assert_eq!(indices, vec![0, 1, 2]);
    assert!(renderer.requests.iter().all(|r| r.0 == 2));
}

#[test]
fn unknown_formula_drops_only_its_series() {
    let (session, _) = session();
    let mut session = session.with_registry(FormulaRegistry::with_formulas(&[FormulaId::InputPulse]));

    let mut plan = RoundPlan::new(RoundOptions {
        combined: true,
        ..RoundOptions::default()
    });
    plan.push(unconstrained(FormulaId::ConvolutionOutput))
        .push(unconstrained(FormulaId::InputPulse));

    let mut renderer = RecordingRenderer::default();
    let report = session
        .run_round(plan, AxisChoice::AUTO, &mut renderer)
        .unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].label, "convolution-output");
    assert_eq!(report.rendered, 1);
    let labels: Vec<&str> = renderer.requests[0]
        .2
        .series
        .iter()
        .map(|s| s.label.as_str())
        .collect();
    assert_eq!(labels, vec!["input-pulse"]);
}

#[test]
fn invalid_plans_are_rejected() {
    let (mut session, _) = session();
    session.load_source("bode.txt").unwrap();
    let mut renderer = RecordingRenderer::default();

    let empty = RoundPlan::new(RoundOptions::default());
    assert!(matches!(
        session.run_round(empty, AxisChoice::AUTO, &mut renderer),
        Err(AppError::EmptyRound)
    ));

    let mut mixed = RoundPlan::new(RoundOptions::default());
    mixed
        .push(Participant::measured("bode.txt"))
        .push(unconstrained(FormulaId::InputPulse));
    assert!(matches!(
        session.run_round(mixed, AxisChoice::AUTO, &mut renderer),
        Err(AppError::IncompatibleDomains {
            expected: DomainKind::Frequency,
            found: DomainKind::Time,
            ..
        })
    ));

    let mut unknown = RoundPlan::new(RoundOptions::default());
    unknown.push(Participant::measured("never-loaded.txt"));
    assert!(matches!(
        session.run_round(unknown, AxisChoice::AUTO, &mut renderer),
        Err(AppError::UnknownSeries(_))
    ));

    assert_eq!(session.rounds(), 0);
    assert!(renderer.requests.is_empty());
}

#[test]
fn missing_source_is_recoverable() {
    let (mut session, _) = session();
    let err = session.load_source("nope.txt").unwrap_err();
    assert!(err.is_recoverable());
    assert!(session.catalog().is_empty());
}

#[test]
fn saved_ranges_apply_to_later_rounds() {
    let (mut session, _) = session();
    session.load_source("a.txt").unwrap();
    let x = Some(AxisRange::new(0.0, 10.0).unwrap());
    let y = Some(AxisRange::new(-1.0, 1.0).unwrap());

    let plan = || {
        let mut plan = RoundPlan::new(RoundOptions::default());
        plan.push(Participant::measured("a.txt"));
        plan
    };

    let mut renderer = RecordingRenderer::default();
    session
        .run_round(plan(), AxisChoice::Explicit { x, y, save: true }, &mut renderer)
        .unwrap();
    session
        .run_round(
            plan(),
            AxisChoice::Explicit {
                x: Some(AxisRange::new(5.0, 6.0).unwrap()),
                y: None,
                save: false,
            },
            &mut renderer,
        )
        .unwrap();
    session
        .run_round(plan(), AxisChoice::UseSaved, &mut renderer)
        .unwrap();

    assert_eq!(session.preferences().get(), (x, y));
    let last = &renderer.requests[2].2;
    assert_eq!(last.x_limits, x);
    assert_eq!(last.y_limits, y);
}

#[test]
fn measured_magnitude_is_normalized_in_linear_domain() {
    let (mut session, _) = session();
    session.load_source("bode.txt").unwrap();

    let mut plan = RoundPlan::new(RoundOptions::default());
    plan.push(Participant::measured("bode.txt"));

    let mut renderer = RecordingRenderer::default();
    session
        .run_round(plan, AxisChoice::AUTO, &mut renderer)
        .unwrap();

    let values = &renderer.requests[0].2.series[0].values;
    assert!((values[0] - 1.0).abs() < 1e-12);
    assert!((values[1] - 0.1).abs() < 1e-12);
    assert_eq!(renderer.requests[0].2.y_label, "Magnitude (linear)");
}

#[test]
fn measured_phase_is_wrapped_and_unscaled() {
    let (mut session, _) = session();
    session.load_source("bode.txt").unwrap();

    let mut plan = RoundPlan::new(RoundOptions {
        quantity: Quantity::Phase,
        scale_mode: ScaleMode::Decibel,
        ..RoundOptions::default()
    });
    plan.push(Participant::measured("bode.txt"));

    let mut renderer = RecordingRenderer::default();
    let report = session
        .run_round(plan, AxisChoice::AUTO, &mut renderer)
        .unwrap();

    assert!(report.warnings.is_empty());
    let values = &renderer.requests[0].2.series[0].values;
    assert!((values[0] - (-170.0)).abs() < 1e-9);
    assert!((values[1] - (-45.0)).abs() < 1e-9);
}

#[test]
fn degenerate_normalization_is_reported() {
    let (mut session, _) = session();
    session.load_source("zeros.txt").unwrap();

    let mut plan = RoundPlan::new(RoundOptions {
        normalize: Some(true),
        ..RoundOptions::default()
    });
    plan.push(Participant::measured("zeros.txt"));

    let report = session
        .run_round(plan, AxisChoice::AUTO, &mut RecordingRenderer::default())
        .unwrap();
    assert_eq!(
        report.warnings,
        vec![SeriesWarning {
            label: "zeros.txt".to_string(),
            warning: ScaleWarning::DegenerateNormalization,
        }]
    );
    assert_eq!(report.rendered, 1);
}

#[test]
fn store_renderer_persists_each_figure() {
    let temp_dir = std::env::temp_dir().join("sc_app_store_renderer");
    let _ = std::fs::remove_dir_all(&temp_dir);

    let (mut session, _) = session();
    session.load_source("a.txt").unwrap();
    let mut plan = RoundPlan::new(RoundOptions::default());
    plan.push(Participant::measured("a.txt"))
        .push(unconstrained(FormulaId::InputPulse));

    let mut renderer = StoreRenderer::new(PlotStore::new(temp_dir.clone()).unwrap());
    let report = session
        .run_round(plan, AxisChoice::AUTO, &mut renderer)
        .unwrap();
    assert_eq!(report.rendered, 2);

    let stored = renderer.store().list_plots().unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].series_labels, vec!["a.txt"]);
    let request = renderer.store().load_request(&stored[1].plot_id).unwrap();
    assert_eq!(request.series[0].origin, SeriesOrigin::Generated);
}
