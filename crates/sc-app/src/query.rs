//! Query helpers for catalogued series and one-off formula evaluation.

use sc_core::{DomainKind, DomainSpec, MeasuredSeries, Real, SeriesData};
use sc_signals::{FormulaId, FormulaRegistry, ScaleTransform, ScaleWarning};

use crate::catalog::SeriesCatalog;
use crate::error::AppResult;

/// Summary of a measured series for listings.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesSummary {
    pub handle: String,
    pub kind: DomainKind,
    pub points: usize,
    pub domain_range: (Real, Real),
    /// Magnitude range in dB for frequency data, value range for time data.
    pub value_range: (Real, Real),
    /// Phase range in degrees, frequency data only.
    pub phase_range: Option<(Real, Real)>,
}

/// Summarize one measured series.
pub fn summarize_series(series: &MeasuredSeries) -> SeriesSummary {
    let (values, phase) = match series.data() {
        SeriesData::FrequencyResponse {
            magnitude_db,
            phase_deg,
        } => (magnitude_db, Some(phase_deg)),
        SeriesData::TimeSeries { values } => (values, None),
    };

    SeriesSummary {
        handle: series.handle().to_string(),
        kind: series.kind(),
        points: series.len(),
        domain_range: (series.domain_first(), series.domain_last()),
        value_range: min_max(values),
        phase_range: phase.map(|p| min_max(p)),
    }
}

/// Summaries of every catalogued series, in catalog order.
pub fn list_catalog(catalog: &SeriesCatalog) -> Vec<SeriesSummary> {
    catalog.iter().map(summarize_series).collect()
}

fn min_max(values: &[Real]) -> (Real, Real) {
    values
        .iter()
        .fold((Real::INFINITY, Real::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

/// One formula sampled and scaled, outside of any round.
#[derive(Debug, Clone, PartialEq)]
pub struct FormulaSamples {
    pub formula_id: FormulaId,
    pub domain: Vec<Real>,
    pub values: Vec<Real>,
    pub warnings: Vec<ScaleWarning>,
}

/// Evaluate `formula_id` on `spec` and apply `transform` to its amplitude.
pub fn sample_formula(
    registry: &FormulaRegistry,
    formula_id: FormulaId,
    spec: &DomainSpec,
    transform: ScaleTransform,
) -> AppResult<FormulaSamples> {
    let evaluated = registry.evaluate(formula_id, spec)?;
    let transformed = transform.apply(&evaluated.values.amplitude());
    Ok(FormulaSamples {
        formula_id,
        domain: evaluated.domain,
        values: transformed.values,
        warnings: transformed.warnings,
    })
}
