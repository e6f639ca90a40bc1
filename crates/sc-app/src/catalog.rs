//! Session catalog of imported measured series.

use std::collections::HashMap;
use std::path::Path;

use sc_core::MeasuredSeries;
use sc_import::SourceFormat;
use tracing::{debug, info};

use crate::error::AppResult;

/// Something that can turn a source handle into a measured series.
pub trait SeriesLoader {
    /// Load the series named by `handle`. Must fail rather than return an
    /// empty series.
    fn load(&mut self, handle: &str) -> AppResult<MeasuredSeries>;
}

/// Loads instrument export files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader {
    pub format: SourceFormat,
}

impl FileLoader {
    pub fn new(format: SourceFormat) -> Self {
        Self { format }
    }
}

impl SeriesLoader for FileLoader {
    fn load(&mut self, handle: &str) -> AppResult<MeasuredSeries> {
        let (series, _skipped) = sc_import::load_series(Path::new(handle), self.format)?;
        Ok(series)
    }
}

/// Append-only store of measured series, keyed by source handle.
pub struct SeriesCatalog {
    loader: Box<dyn SeriesLoader>,
    entries: Vec<MeasuredSeries>,
    index: HashMap<String, usize>,
}

impl SeriesCatalog {
    pub fn new(loader: Box<dyn SeriesLoader>) -> Self {
        Self {
            loader,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Return the catalogued series for `handle`, loading it on first use.
    ///
    /// A failed load leaves the catalog unchanged.
    pub fn load_or_fetch(&mut self, handle: &str) -> AppResult<&MeasuredSeries> {
        if let Some(&idx) = self.index.get(handle) {
            debug!(handle, "Reusing catalogued series");
            return Ok(&self.entries[idx]);
        }

        let series = self.loader.load(handle)?;
        if series.is_empty() {
            return Err(crate::AppError::SourceLoad {
                handle: handle.to_string(),
                reason: "no valid data rows".to_string(),
            });
        }

        info!(handle, points = series.len(), kind = %series.kind(), "Catalogued series");
        let idx = self.entries.len();
        self.entries.push(series);
        self.index.insert(handle.to_string(), idx);
        Ok(&self.entries[idx])
    }

    pub fn get(&self, handle: &str) -> Option<&MeasuredSeries> {
        self.index.get(handle).map(|&idx| &self.entries[idx])
    }

    /// Series by catalog position (insertion order, zero-based).
    pub fn get_index(&self, idx: usize) -> Option<&MeasuredSeries> {
        self.entries.get(idx)
    }

    pub fn contains(&self, handle: &str) -> bool {
        self.index.contains_key(handle)
    }

    /// Handles in the order they were first loaded.
    pub fn list_handles(&self) -> Vec<&str> {
        self.entries.iter().map(|s| s.handle()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MeasuredSeries> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AppError;

    struct MapLoader;

    impl SeriesLoader for MapLoader {
        fn load(&mut self, handle: &str) -> AppResult<MeasuredSeries> {
            match handle {
                "missing.txt" => Err(AppError::SourceLoad {
                    handle: handle.to_string(),
                    reason: "not found".to_string(),
                }),
                _ => Ok(MeasuredSeries::time_series(handle, vec![0.0, 1.0], vec![2.0, 3.0]).unwrap()),
            }
        }
    }

    #[test]
    fn handles_keep_insertion_order() {
        let mut catalog = SeriesCatalog::new(Box::new(MapLoader));
        catalog.load_or_fetch("b.txt").unwrap();
        catalog.load_or_fetch("a.txt").unwrap();
        catalog.load_or_fetch("b.txt").unwrap();

        assert_eq!(catalog.list_handles(), vec!["b.txt", "a.txt"]);
        assert_eq!(catalog.get_index(1).map(|s| s.handle()), Some("a.txt"));
        assert!(catalog.get_index(2).is_none());
    }

    #[test]
    fn failed_load_is_not_catalogued() {
        let mut catalog = SeriesCatalog::new(Box::new(MapLoader));
        let err = catalog.load_or_fetch("missing.txt").unwrap_err();
        assert!(matches!(err, AppError::SourceLoad { .. }));
        assert!(catalog.is_empty());
        assert!(!catalog.contains("missing.txt"));
    }
}
