//! What a single plotting round consists of.

use sc_core::{DomainKind, DomainSpec};
use sc_signals::{FormulaId, ScaleMode};

use crate::catalog::SeriesCatalog;
use crate::error::{AppError, AppResult};

/// Which view of the data a round shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quantity {
    #[default]
    Magnitude,
    Phase,
}

/// An analytic series to evaluate for the round.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedSeriesRequest {
    pub formula_id: FormulaId,
    pub domain_spec: DomainSpec,
    pub label: String,
}

impl GeneratedSeriesRequest {
    /// Request labelled with the formula id.
    pub fn new(formula_id: FormulaId, domain_spec: DomainSpec) -> Self {
        Self {
            formula_id,
            domain_spec,
            label: formula_id.to_string(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Participant {
    Measured {
        handle: String,
        label: Option<String>,
    },
    Generated(GeneratedSeriesRequest),
}

impl Participant {
    pub fn measured(handle: impl Into<String>) -> Self {
        Participant::Measured {
            handle: handle.into(),
            label: None,
        }
    }

    /// Legend text: the explicit label, else the handle or formula label.
    pub fn label(&self) -> &str {
        match self {
            Participant::Measured { handle, label } => label.as_deref().unwrap_or(handle),
            Participant::Generated(request) => &request.label,
        }
    }
}

/// Round-wide display switches.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RoundOptions {
    /// Draw every series on one figure.
    pub combined: bool,
    pub scale_mode: ScaleMode,
    /// Self-normalize magnitudes; `None` takes the configured family default.
    pub normalize: Option<bool>,
    pub quantity: Quantity,
    /// Logarithmic horizontal axis. Only honoured for frequency rounds.
    pub log_x: bool,
    /// Logarithmic magnitude axis. Only honoured for positive linear
    /// magnitudes.
    pub log_y: bool,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RoundPlan {
    pub participants: Vec<Participant>,
    pub options: RoundOptions,
}

impl RoundPlan {
    pub fn new(options: RoundOptions) -> Self {
        Self {
            participants: Vec::new(),
            options,
        }
    }

    pub fn push(&mut self, participant: Participant) -> &mut Self {
        self.participants.push(participant);
        self
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Check the plan against the catalog and return the round's domain family.
    pub fn validate(&self, catalog: &SeriesCatalog) -> AppResult<DomainKind> {
        let mut expected: Option<DomainKind> = None;

        for participant in &self.participants {
            let found = match participant {
                Participant::Measured { handle, .. } => catalog
                    .get(handle)
                    .map(|s| s.kind())
                    .ok_or_else(|| AppError::UnknownSeries(handle.clone()))?,
                Participant::Generated(request) => request.formula_id.family(),
            };

            match expected {
                None => expected = Some(found),
                Some(kind) if kind != found => {
                    return Err(AppError::IncompatibleDomains {
                        label: participant.label().to_string(),
                        expected: kind,
                        found,
                    });
                }
                Some(_) => {}
            }
        }

        expected.ok_or(AppError::EmptyRound)
    }
}
