//! Measured series imported from instrument export files.

use crate::{CoreError, CoreResult, DomainKind, Real};

/// Sample payload of a measured series.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesData {
    /// Bode-style export: magnitude in dB and phase in degrees per frequency.
    FrequencyResponse {
        magnitude_db: Vec<Real>,
        phase_deg: Vec<Real>,
    },
    /// Transient export: one value per time sample.
    TimeSeries { values: Vec<Real> },
}

impl SeriesData {
    pub fn kind(&self) -> DomainKind {
        match self {
            Self::FrequencyResponse { .. } => DomainKind::Frequency,
            Self::TimeSeries { .. } => DomainKind::Time,
        }
    }
}

/// Immutable imported series, keyed by its source handle (file path).
///
/// Invariants checked at construction:
/// - at least one sample
/// - every column has the length of `domain`
/// - `domain` is non-decreasing
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredSeries {
    handle: String,
    domain: Vec<Real>,
    data: SeriesData,
}

impl MeasuredSeries {
    pub fn new(handle: impl Into<String>, domain: Vec<Real>, data: SeriesData) -> CoreResult<Self> {
        if domain.is_empty() {
            return Err(CoreError::InvalidArg {
                what: "measured series needs at least one sample",
            });
        }

        let expected = domain.len();
        match &data {
            SeriesData::FrequencyResponse {
                magnitude_db,
                phase_deg,
            } => {
                check_len("magnitude_db", expected, magnitude_db.len())?;
                check_len("phase_deg", expected, phase_deg.len())?;
            }
            SeriesData::TimeSeries { values } => check_len("values", expected, values.len())?,
        }

        if domain.windows(2).any(|w| w[1] < w[0]) {
            return Err(CoreError::Invariant {
                what: "domain must be non-decreasing",
            });
        }

        Ok(Self {
            handle: handle.into(),
            domain,
            data,
        })
    }

    pub fn frequency_response(
        handle: impl Into<String>,
        domain: Vec<Real>,
        magnitude_db: Vec<Real>,
        phase_deg: Vec<Real>,
    ) -> CoreResult<Self> {
        Self::new(
            handle,
            domain,
            SeriesData::FrequencyResponse {
                magnitude_db,
                phase_deg,
            },
        )
    }

    pub fn time_series(
        handle: impl Into<String>,
        domain: Vec<Real>,
        values: Vec<Real>,
    ) -> CoreResult<Self> {
        Self::new(handle, domain, SeriesData::TimeSeries { values })
    }

    pub fn handle(&self) -> &str {
        &self.handle
    }

    pub fn domain(&self) -> &[Real] {
        &self.domain
    }

    pub fn data(&self) -> &SeriesData {
        &self.data
    }

    pub fn kind(&self) -> DomainKind {
        self.data.kind()
    }

    pub fn len(&self) -> usize {
        self.domain.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.domain.is_empty()
    }

    /// First domain coordinate (the minimum, since the domain is sorted).
    pub fn domain_first(&self) -> Real {
        self.domain[0]
    }

    /// Last domain coordinate (the maximum).
    pub fn domain_last(&self) -> Real {
        self.domain[self.domain.len() - 1]
    }

    pub fn magnitude_db(&self) -> Option<&[Real]> {
        match &self.data {
            SeriesData::FrequencyResponse { magnitude_db, .. } => Some(magnitude_db),
            SeriesData::TimeSeries { .. } => None,
        }
    }

    pub fn phase_deg(&self) -> Option<&[Real]> {
        match &self.data {
            SeriesData::FrequencyResponse { phase_deg, .. } => Some(phase_deg),
            SeriesData::TimeSeries { .. } => None,
        }
    }

    pub fn values(&self) -> Option<&[Real]> {
        match &self.data {
            SeriesData::TimeSeries { values } => Some(values),
            SeriesData::FrequencyResponse { .. } => None,
        }
    }
}

fn check_len(what: &'static str, expected: usize, got: usize) -> CoreResult<()> {
    if expected == got {
        Ok(())
    } else {
        Err(CoreError::LengthMismatch {
            what,
            expected,
            got,
        })
    }
}
