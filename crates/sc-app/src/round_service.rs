//! Session state and the per-round plotting pipeline.

use sc_core::{DomainKind, MeasuredSeries, Real, SeriesData};
use sc_results::{RenderRequest, SeriesOrigin};
use sc_signals::{
    from_decibels, wrap_phase_deg, FormulaRegistry, ScaleTransform, ScaleWarning,
};
use tracing::{debug, warn};

use crate::catalog::{SeriesCatalog, SeriesLoader};
use crate::compose::{PlotComposer, Renderer, TransformedSeries};
use crate::config::SessionConfig;
use crate::error::AppResult;
use crate::plan::{GeneratedSeriesRequest, Participant, Quantity, RoundPlan};
use crate::preferences::{AxisChoice, SessionPreferences};
use crate::reconcile::{DomainAdjustment, DomainReconciler};

/// A scale warning raised for one series.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesWarning {
    pub label: String,
    pub warning: ScaleWarning,
}

/// Something in the round that could not be produced or drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundFailure {
    pub label: String,
    pub reason: String,
}

/// Outcome of [`Session::run_round`].
#[derive(Debug, Clone)]
pub struct RoundReport {
    pub round: usize,
    pub kind: DomainKind,
    pub adjustments: Vec<DomainAdjustment>,
    pub warnings: Vec<SeriesWarning>,
    pub failures: Vec<RoundFailure>,
    pub requests: Vec<RenderRequest>,
    pub rendered: usize,
}

/// Everything that lives for one interactive session.
pub struct Session {
    catalog: SeriesCatalog,
    preferences: SessionPreferences,
    registry: FormulaRegistry,
    reconciler: DomainReconciler,
    composer: PlotComposer,
    config: SessionConfig,
    rounds: usize,
}

impl Session {
    pub fn new(config: SessionConfig, loader: Box<dyn SeriesLoader>) -> Self {
        Self {
            catalog: SeriesCatalog::new(loader),
            preferences: SessionPreferences::default(),
            registry: FormulaRegistry::builtin(),
            reconciler: DomainReconciler::from_config(&config),
            composer: PlotComposer::new(),
            config,
            rounds: 0,
        }
    }

    pub fn with_registry(mut self, registry: FormulaRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn catalog(&self) -> &SeriesCatalog {
        &self.catalog
    }

    pub fn preferences(&self) -> &SessionPreferences {
        &self.preferences
    }

    pub fn registry(&self) -> &FormulaRegistry {
        &self.registry
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Rounds completed so far.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Catalog a measured source so a plan can refer to it.
    pub fn load_source(&mut self, handle: &str) -> AppResult<&MeasuredSeries> {
        self.catalog.load_or_fetch(handle)
    }

    /// Run one round: validate, reconcile, evaluate, transform, compose and
    /// render. Per-series and per-figure problems land in the report; only
    /// an invalid plan fails the call.
    pub fn run_round(
        &mut self,
        mut plan: RoundPlan,
        axis_choice: AxisChoice,
        renderer: &mut dyn Renderer,
    ) -> AppResult<RoundReport> {
        let kind = plan.validate(&self.catalog)?;
        self.rounds += 1;
        let round = self.rounds;
        debug!(round, %kind, participants = plan.len(), "Starting round");

        let adjustments = self.reconcile(&mut plan);

        let options = plan.options;
        let transform = ScaleTransform::new(
            options.scale_mode,
            options
                .normalize
                .unwrap_or_else(|| self.config.normalize_for(kind)),
        );

        let mut series = Vec::with_capacity(plan.len());
        let mut warnings = Vec::new();
        let mut failures = Vec::new();

        for participant in &plan.participants {
            let label = participant.label().to_string();
            let raw = match participant {
                Participant::Measured { handle, .. } => match self.catalog.get(handle) {
                    Some(measured) => Ok(self.measured_values(measured, options.quantity)),
                    None => Err(format!("series not in catalog: {handle}")),
                },
                Participant::Generated(request) => self
                    .generated_values(request, options.quantity)
                    .map_err(|e| e.to_string()),
            };

            let (origin, domain, values) = match raw {
                Ok(raw) => raw,
                Err(reason) => {
                    warn!(label = %label, reason = %reason, "Dropping series from round");
                    failures.push(RoundFailure { label, reason });
                    continue;
                }
            };

            let values = match options.quantity {
                Quantity::Phase => values,
                Quantity::Magnitude => {
                    let transformed = transform.apply(&values);
                    warnings.extend(transformed.warnings.into_iter().map(|warning| {
                        SeriesWarning {
                            label: label.clone(),
                            warning,
                        }
                    }));
                    transformed.values
                }
            };

            series.push(TransformedSeries {
                label,
                origin,
                domain,
                values,
            });
        }

        let axis_ranges = self.preferences.resolve(axis_choice);
        let requests = self
            .composer
            .build_requests(kind, &options, &series, axis_ranges);
        let (rendered, render_failures) = self.composer.dispatch(round, &requests, renderer);
        failures.extend(render_failures.into_iter().map(|f| RoundFailure {
            label: f.title,
            reason: f.reason,
        }));

        debug!(round, rendered, failures = failures.len(), "Round finished");
        Ok(RoundReport {
            round,
            kind,
            adjustments,
            warnings,
            failures,
            requests,
            rendered,
        })
    }

    fn reconcile(&self, plan: &mut RoundPlan) -> Vec<DomainAdjustment> {
        let measured: Vec<&MeasuredSeries> = plan
            .participants
            .iter()
            .filter_map(|p| match p {
                Participant::Measured { handle, .. } => self.catalog.get(handle),
                Participant::Generated(_) => None,
            })
            .collect();

        let mut generated: Vec<GeneratedSeriesRequest> = plan
            .participants
            .iter()
            .filter_map(|p| match p {
                Participant::Generated(request) => Some(request.clone()),
                Participant::Measured { .. } => None,
            })
            .collect();

        let adjustments = self.reconciler.reconcile(&measured, &mut generated);

        let mut reconciled = generated.into_iter();
        for participant in plan.participants.iter_mut() {
            if let Participant::Generated(request) = participant {
                if let Some(updated) = reconciled.next() {
                    *request = updated;
                }
            }
        }

        adjustments
    }

    fn measured_values(
        &self,
        measured: &MeasuredSeries,
        quantity: Quantity,
    ) -> (SeriesOrigin, Vec<Real>, Vec<Real>) {
        let values = match (measured.data(), quantity) {
            (SeriesData::FrequencyResponse { magnitude_db, .. }, Quantity::Magnitude) => {
                from_decibels(magnitude_db)
            }
            (SeriesData::FrequencyResponse { phase_deg, .. }, Quantity::Phase) => {
                if self.config.wrap_phase {
                    wrap_phase_deg(phase_deg)
                } else {
                    phase_deg.clone()
                }
            }
            (SeriesData::TimeSeries { values }, Quantity::Magnitude) => values.clone(),
            (SeriesData::TimeSeries { values }, Quantity::Phase) => vec![0.0; values.len()],
        };
        (SeriesOrigin::Measured, measured.domain().to_vec(), values)
    }

    fn generated_values(
        &self,
        request: &GeneratedSeriesRequest,
        quantity: Quantity,
    ) -> AppResult<(SeriesOrigin, Vec<Real>, Vec<Real>)> {
        let evaluated = self
            .registry
            .evaluate(request.formula_id, &request.domain_spec)?;
        let values = match quantity {
            Quantity::Magnitude => evaluated.values.amplitude(),
            Quantity::Phase => evaluated.values.phase_deg(),
        };
        Ok((SeriesOrigin::Generated, evaluated.domain, values))
    }
}
