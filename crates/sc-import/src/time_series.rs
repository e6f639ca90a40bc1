//! Time-series exports: `<time> <value>` per line.

use crate::{is_header, Parsed};

const HEADER_KEYWORD: &str = "time";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeRow {
    pub time_s: f64,
    pub value: f64,
}

/// Parse a whitespace-separated two-column export.
pub fn parse_time_series(text: &str) -> Parsed<TimeRow> {
    let mut parsed = Parsed::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_header(line, HEADER_KEYWORD) {
            continue;
        }

        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.len() != 2 {
            parsed.skip(
                idx + 1,
                line,
                format!("expected 2 columns, found {}", columns.len()),
            );
            continue;
        }

        match (columns[0].parse::<f64>(), columns[1].parse::<f64>()) {
            (Ok(time_s), Ok(value)) if time_s.is_finite() && value.is_finite() => {
                parsed.rows.push(TimeRow { time_s, value });
            }
            _ => parsed.skip(idx + 1, line, "non-numeric field"),
        }
    }

    parsed
}
