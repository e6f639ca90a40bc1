//! Export layout selection.

use std::str::FromStr;

use sc_core::DomainKind;

/// Which text layout a file uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceFormat {
    /// Decide from the first data line.
    #[default]
    Auto,
    FrequencyResponse,
    TimeSeries,
}

impl SourceFormat {
    /// Domain family for `text`, sniffing the content when `Auto`.
    ///
    /// A data line containing `(` means a frequency-response export; anything
    /// else is read as a time series.
    pub fn resolve(self, text: &str) -> DomainKind {
        match self {
            Self::FrequencyResponse => DomainKind::Frequency,
            Self::TimeSeries => DomainKind::Time,
            Self::Auto => detect(text),
        }
    }
}

impl FromStr for SourceFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "frequency" | "freq" | "fft" => Ok(Self::FrequencyResponse),
            "time" | "time-series" | "timeseries" => Ok(Self::TimeSeries),
            other => Err(format!("unknown source format: {other}")),
        }
    }
}

fn detect(text: &str) -> DomainKind {
    let first_data_line = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .find(|l| l.starts_with(|c: char| c.is_ascii_digit() || matches!(c, '-' | '+' | '.')));

    match first_data_line {
        Some(line) if line.contains('(') => DomainKind::Frequency,
        _ => DomainKind::Time,
    }
}
