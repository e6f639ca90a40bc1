//! Shared sampling domain for generated series.
//!
//! Generated series that the user did not constrain follow the measured data
//! of the same round: they take the grid of the measured series that reaches
//! furthest along the domain axis. Without measured data they stretch to the
//! widest user-constrained series, or to the family defaults.

use core::fmt;

use sc_core::{DomainDefaults, DomainKind, DomainSpec, MeasuredSeries, Real};
use tracing::debug;

use crate::config::SessionConfig;
use crate::plan::GeneratedSeriesRequest;

/// Notice that a generated series had its domain filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainAdjustment {
    pub label: String,
    pub min: Real,
    pub max: Real,
    pub count: usize,
}

impl fmt::Display for DomainAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Adjusted domain of '{}' to min={}, max={}, count={}",
            self.label, self.min, self.max, self.count
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainReconciler {
    frequency: DomainDefaults,
    time: DomainDefaults,
}

impl Default for DomainReconciler {
    fn default() -> Self {
        Self::new(DomainDefaults::FREQUENCY, DomainDefaults::TIME)
    }
}

impl DomainReconciler {
    pub fn new(frequency: DomainDefaults, time: DomainDefaults) -> Self {
        Self { frequency, time }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(
            config.defaults_for(DomainKind::Frequency),
            config.defaults_for(DomainKind::Time),
        )
    }

    pub fn defaults_for(&self, kind: DomainKind) -> DomainDefaults {
        match kind {
            DomainKind::Frequency => self.frequency,
            DomainKind::Time => self.time,
        }
    }

    /// Domain a non-custom series of `family` would receive this round.
    ///
    /// Without measured data the grid keeps the family min and takes the
    /// largest custom max. A custom max below that min yields a descending
    /// grid, which is sampled as-is.
    pub fn reconciled_domain(
        &self,
        measured: &[&MeasuredSeries],
        generated: &[GeneratedSeriesRequest],
        family: DomainKind,
    ) -> DomainSpec {
        if let Some(reference) = furthest_reaching(measured) {
            return DomainSpec {
                min: reference.domain_first(),
                max: reference.domain_last(),
                count: reference.len(),
                is_custom: false,
            };
        }

        let defaults = self.defaults_for(family);
        let max = generated
            .iter()
            .filter(|r| r.domain_spec.is_custom)
            .map(|r| r.domain_spec.max)
            .fold(None, |acc: Option<Real>, m| Some(acc.map_or(m, |a| a.max(m))))
            .unwrap_or(defaults.max);

        DomainSpec {
            min: defaults.min,
            max,
            count: defaults.count,
            is_custom: false,
        }
    }

    /// Fill in the domain of every non-custom request. Custom requests are
    /// left exactly as given.
    pub fn reconcile(
        &self,
        measured: &[&MeasuredSeries],
        generated: &mut [GeneratedSeriesRequest],
    ) -> Vec<DomainAdjustment> {
        let mut adjustments = Vec::new();

        for idx in 0..generated.len() {
            if generated[idx].domain_spec.is_custom {
                continue;
            }
            let family = generated[idx].formula_id.family();
            let spec = self.reconciled_domain(measured, generated, family);

            let request = &mut generated[idx];
            request.domain_spec = spec;
            debug!(
                label = %request.label,
                min = spec.min,
                max = spec.max,
                count = spec.count,
                "Reconciled generated domain"
            );
            adjustments.push(DomainAdjustment {
                label: request.label.clone(),
                min: spec.min,
                max: spec.max,
                count: spec.count,
            });
        }

        adjustments
    }
}

/// Measured series with the greatest final domain value; first wins on ties.
fn furthest_reaching<'a>(measured: &[&'a MeasuredSeries]) -> Option<&'a MeasuredSeries> {
    let mut best: Option<&'a MeasuredSeries> = None;
    for &series in measured {
        match best {
            Some(b) if series.domain_last() <= b.domain_last() => {}
            _ => best = Some(series),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_signals::FormulaId;

    fn time_series(handle: &str, domain: Vec<f64>) -> MeasuredSeries {
        let values = vec![1.0; domain.len()];
        MeasuredSeries::time_series(handle, domain, values).unwrap()
    }

    #[test]
    fn ties_pick_first_measured() {
        let a = time_series("a", vec![0.0, 5.0]);
        let b = time_series("b", vec![1.0, 2.0, 5.0]);
        let reconciler = DomainReconciler::default();

        let spec = reconciler.reconciled_domain(&[&a, &b], &[], DomainKind::Time);
        assert_eq!(spec.min, 0.0);
        assert_eq!(spec.count, 2);
    }

    #[test]
    fn no_measured_and_no_custom_uses_family_defaults() {
        let reconciler = DomainReconciler::default();
        let mut requests = vec![GeneratedSeriesRequest::new(
            FormulaId::InputPulse,
            DomainSpec::unconstrained(DomainDefaults::TIME),
        )];

        let adjustments = reconciler.reconcile(&[], &mut requests);
        assert_eq!(adjustments.len(), 1);
        assert_eq!(requests[0].domain_spec.min, -1e-3);
        assert_eq!(requests[0].domain_spec.max, 5e-3);
        assert_eq!(requests[0].domain_spec.count, 1000);
        assert!(!requests[0].domain_spec.is_custom);
    }

    #[test]
    fn custom_requests_are_untouched() {
        let reconciler = DomainReconciler::default();
        let custom = DomainSpec::custom(0.0, 3e-3, 50).unwrap();
        let mut requests = vec![GeneratedSeriesRequest::new(FormulaId::ConvolutionOutput, custom)];

        let a = time_series("a", vec![0.0, 1.0, 2.0]);
        let adjustments = reconciler.reconcile(&[&a], &mut requests);
        assert!(adjustments.is_empty());
        assert_eq!(requests[0].domain_spec, custom);
    }

    #[test]
    fn custom_max_below_default_min_gives_descending_grid() {
        let reconciler = DomainReconciler::default();
        let custom = DomainSpec::custom(-0.01, -0.005, 10).unwrap();
        let mut requests = vec![
            GeneratedSeriesRequest::new(FormulaId::InputPulse, custom),
            GeneratedSeriesRequest::new(
                FormulaId::ConvolutionOutput,
                DomainSpec::unconstrained(DomainDefaults::TIME),
            ),
        ];

        reconciler.reconcile(&[], &mut requests);
        let spec = requests[1].domain_spec;
        assert_eq!(spec.min, -1e-3);
        assert_eq!(spec.max, -0.005);
        assert!(!spec.is_custom);

        let sampled = sc_signals::FormulaRegistry::builtin()
            .evaluate(FormulaId::ConvolutionOutput, &spec)
            .unwrap();
        assert_eq!(sampled.domain.len(), 1000);
        assert_eq!(sampled.domain[0], -1e-3);
        assert_eq!(sampled.domain[999], -0.005);
        assert!(sampled.domain.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn adjustment_names_label_and_grid() {
        let adj = DomainAdjustment {
            label: "Vo(t)".to_string(),
            min: 0.0,
            max: 0.005,
            count: 1000,
        };
        assert_eq!(
            adj.to_string(),
            "Adjusted domain of 'Vo(t)' to min=0, max=0.005, count=1000"
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use sc_signals::FormulaId;

    proptest! {
        #[test]
        fn reconciled_grid_matches_furthest_measured(
            ends in prop::collection::vec((1.0_f64..1.0e4, 2_usize..32), 1..6)
        ) {
            let series: Vec<MeasuredSeries> = ends
                .iter()
                .enumerate()
                .map(|(i, &(max, count))| {
                    let domain = sc_core::linspace(0.0, max, count);
                    let values = vec![0.0; count];
                    MeasuredSeries::time_series(format!("s{i}"), domain, values).unwrap()
                })
                .collect();
            let measured: Vec<&MeasuredSeries> = series.iter().collect();
            let mut requests = vec![GeneratedSeriesRequest::new(
                FormulaId::InputPulse,
                DomainSpec::unconstrained(DomainDefaults::TIME),
            )];

            DomainReconciler::default().reconcile(&measured, &mut requests);

            let furthest = ends.iter().map(|e| e.0).fold(f64::MIN, f64::max);
            let first_at_max = ends.iter().find(|e| e.0 == furthest).map(|e| e.1);
            prop_assert_eq!(requests[0].domain_spec.max, furthest);
            prop_assert_eq!(Some(requests[0].domain_spec.count), first_at_max);
            prop_assert!(!requests[0].domain_spec.is_custom);
        }
    }
}
