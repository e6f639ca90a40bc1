//! Frequency-response exports: `<freq> (<mag>dB,<phase>deg)`.

use crate::{is_header, Parsed};

const HEADER_KEYWORD: &str = "freq";

/// One parsed frequency-response sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyRow {
    pub frequency_hz: f64,
    pub magnitude_db: f64,
    pub phase_deg: f64,
}

/// Parse a frequency-response export.
///
/// ```
/// use sc_import::parse_frequency_response;
///
/// let parsed = parse_frequency_response("1.0e-01  (-7.36e+01dB,-4.25e-02deg)");
/// assert_eq!(parsed.rows[0].frequency_hz, 0.1);
/// assert_eq!(parsed.rows[0].magnitude_db, -73.6);
/// ```
pub fn parse_frequency_response(text: &str) -> Parsed<FrequencyRow> {
    let mut parsed = Parsed::default();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_header(line, HEADER_KEYWORD) {
            continue;
        }
        match parse_line(line) {
            Ok(row) => parsed.rows.push(row),
            Err(reason) => parsed.skip(idx + 1, line, reason),
        }
    }

    parsed
}

fn parse_line(line: &str) -> Result<FrequencyRow, String> {
    let (freq_str, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| "expected 2 columns, found 1".to_string())?;

    let rest = rest.trim();
    let inner = rest
        .strip_prefix('(')
        .ok_or_else(|| "expected '(' before magnitude".to_string())?;
    let (pair, trailing) = inner
        .split_once(')')
        .ok_or_else(|| "missing closing ')'".to_string())?;
    if !trailing.trim().is_empty() {
        return Err(format!("unexpected trailing column '{}'", trailing.trim()));
    }

    let fields: Vec<&str> = pair.split(',').collect();
    if fields.len() != 2 {
        return Err(format!(
            "expected magnitude,phase pair, found {} field(s)",
            fields.len()
        ));
    }

    let frequency_hz = parse_number(freq_str, "frequency")?;
    let magnitude_db = parse_number(strip_magnitude_unit(fields[0]), "magnitude")?;
    let phase_deg = parse_number(&strip_phase_unit(fields[1]), "phase")?;

    Ok(FrequencyRow {
        frequency_hz,
        magnitude_db,
        phase_deg,
    })
}

fn strip_magnitude_unit(field: &str) -> &str {
    let field = field.trim();
    field
        .strip_suffix("dB")
        .or_else(|| field.strip_suffix("db"))
        .unwrap_or(field)
}

fn strip_phase_unit(field: &str) -> String {
    let field = field.trim().replace(['°', '∞'], "");
    field
        .strip_suffix("deg")
        .map(str::to_string)
        .unwrap_or(field)
}

fn parse_number(s: &str, what: &str) -> Result<f64, String> {
    let s = s.trim();
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        Ok(_) => Err(format!("non-finite {what} '{s}'")),
        Err(_) => Err(format!("non-numeric {what} '{s}'")),
    }
}
