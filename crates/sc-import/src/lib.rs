//! Parsers for lab instrument text exports.
//!
//! Two layouts are understood:
//! - frequency response: `<freq> (<mag>dB,<phase>deg)`
//! - time series: `<time> <value>`
//!
//! Header and blank lines are skipped. Malformed lines are skipped with a
//! warning and never fail the whole load; a file with zero usable rows does.

pub mod error;
pub mod format;
pub mod frequency;
pub mod time_series;

use std::fmt;
use std::path::Path;

use sc_core::{DomainKind, MeasuredSeries};
use tracing::{info, warn};

pub use error::{ImportError, ImportResult};
pub use format::SourceFormat;
pub use frequency::{parse_frequency_response, FrequencyRow};
pub use time_series::{parse_time_series, TimeRow};

/// A data line that was skipped during parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct MalformedLine {
    /// 1-based line number in the source text.
    pub line_no: usize,
    pub content: String,
    pub reason: String,
}

impl fmt::Display for MalformedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: {} ({})",
            self.line_no, self.content, self.reason
        )
    }
}

/// Rows recovered from a text export, plus every line that was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<R> {
    pub rows: Vec<R>,
    pub skipped: Vec<MalformedLine>,
}

impl<R> Default for Parsed<R> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<R> Parsed<R> {
    pub(crate) fn skip(&mut self, line_no: usize, content: &str, reason: impl Into<String>) {
        let malformed = MalformedLine {
            line_no,
            content: content.to_string(),
            reason: reason.into(),
        };
        warn!("Skipping invalid data line {}", malformed);
        self.skipped.push(malformed);
    }
}

/// True for lines that start with `keyword`, ignoring ASCII case.
pub(crate) fn is_header(line: &str, keyword: &str) -> bool {
    line.len() >= keyword.len()
        && line.is_char_boundary(keyword.len())
        && line[..keyword.len()].eq_ignore_ascii_case(keyword)
}

/// Build a measured series from export text already in memory.
pub fn series_from_text(
    handle: &str,
    text: &str,
    format: SourceFormat,
) -> ImportResult<(MeasuredSeries, Vec<MalformedLine>)> {
    let (series, skipped) = match format.resolve(text) {
        DomainKind::Frequency => {
            let parsed = parse_frequency_response(text);
            if parsed.rows.is_empty() {
                return Err(ImportError::NoValidRows {
                    path: handle.into(),
                });
            }
            let mut freq = Vec::with_capacity(parsed.rows.len());
            let mut mag = Vec::with_capacity(parsed.rows.len());
            let mut phase = Vec::with_capacity(parsed.rows.len());
            for row in &parsed.rows {
                freq.push(row.frequency_hz);
                mag.push(row.magnitude_db);
                phase.push(row.phase_deg);
            }
            let series = MeasuredSeries::frequency_response(handle, freq, mag, phase);
            (series, parsed.skipped)
        }
        DomainKind::Time => {
            let parsed = parse_time_series(text);
            if parsed.rows.is_empty() {
                return Err(ImportError::NoValidRows {
                    path: handle.into(),
                });
            }
            let (time, values): (Vec<f64>, Vec<f64>) = parsed.rows.iter().map(|r| (r.time_s, r.value)).unzip();
            let series = MeasuredSeries::time_series(handle, time, values);
            (series, parsed.skipped)
        }
    };

    let series = series.map_err(|source| ImportError::InvalidSeries {
        path: handle.into(),
        source,
    })?;
    Ok((series, skipped))
}

/// Read and parse one export file. The path string becomes the series handle.
pub fn load_series(
    path: &Path,
    format: SourceFormat,
) -> ImportResult<(MeasuredSeries, Vec<MalformedLine>)> {
    let text = std::fs::read_to_string(path).map_err(|e| ImportError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let handle = path.to_string_lossy();
    let (series, skipped) = series_from_text(&handle, &text, format)?;
    info!(
        handle = %handle,
        kind = %series.kind(),
        points = series.len(),
        skipped = skipped.len(),
        "Imported measured series"
    );
    Ok((series, skipped))
}
