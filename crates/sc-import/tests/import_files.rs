//! File-level import behaviour.

use std::path::PathBuf;

use sc_core::DomainKind;
use sc_import::{load_series, ImportError, SourceFormat};

fn temp_file(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join("sc_import_test");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn loads_frequency_export_from_disk() {
    let path = temp_file(
        "bode.txt",
        "Freq.\tV(out)\n0.1  (-10.0dB,0.0deg)\n1.0  (-20.0dB,-5.0deg)\n",
    );

    let (series, skipped) = load_series(&path, SourceFormat::Auto).unwrap();
    assert!(skipped.is_empty());
    assert_eq!(series.kind(), DomainKind::Frequency);
    assert_eq!(series.handle(), path.to_string_lossy());
    assert_eq!(series.domain(), &[0.1, 1.0]);
    assert_eq!(series.magnitude_db(), Some(&[-10.0, -20.0][..]));
    assert_eq!(series.phase_deg(), Some(&[0.0, -5.0][..]));
}

#[test]
fn loads_time_series_and_reports_skipped_lines() {
    let path = temp_file("transient.txt", "time\tV(out)\n0 0\nbroken\n0.001 0.5\n");

    let (series, skipped) = load_series(&path, SourceFormat::TimeSeries).unwrap();
    assert_eq!(series.len(), 2);
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].line_no, 3);
}

#[test]
fn missing_file_is_a_read_error() {
    let path = std::env::temp_dir().join("sc_import_test_does_not_exist.txt");
    let _ = std::fs::remove_file(&path);

    let err = load_series(&path, SourceFormat::Auto).unwrap_err();
    assert!(matches!(err, ImportError::FileRead { .. }));
}

#[test]
fn file_without_rows_is_rejected() {
    let path = temp_file("only_garbage.txt", "Freq.\tV(out)\nnot a row\n");

    let err = load_series(&path, SourceFormat::FrequencyResponse).unwrap_err();
    assert!(matches!(err, ImportError::NoValidRows { .. }));
}
