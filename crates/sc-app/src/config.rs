//! Session configuration loaded from YAML.

use std::path::{Path, PathBuf};

use sc_core::{DomainDefaults, DomainKind};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Per-family settings. Unset fields fall back to the built-in values for
/// the family they belong to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FamilyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DomainDefaults>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normalize: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub frequency: FamilyConfig,
    pub time: FamilyConfig,
    /// Fold measured phase into [-180, 180] degrees.
    pub wrap_phase: bool,
    /// Where the plot store renderer writes; `None` disables it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frequency: FamilyConfig::default(),
            time: FamilyConfig::default(),
            wrap_phase: true,
            output_dir: None,
        }
    }
}

impl SessionConfig {
    fn family(&self, kind: DomainKind) -> &FamilyConfig {
        match kind {
            DomainKind::Frequency => &self.frequency,
            DomainKind::Time => &self.time,
        }
    }

    /// Sampling defaults used when nothing else constrains a generated series.
    pub fn defaults_for(&self, kind: DomainKind) -> DomainDefaults {
        self.family(kind)
            .defaults
            .unwrap_or_else(|| DomainDefaults::for_kind(kind))
    }

    /// Frequency rounds are self-normalized unless configured otherwise;
    /// time rounds are not.
    pub fn normalize_for(&self, kind: DomainKind) -> bool {
        self.family(kind)
            .normalize
            .unwrap_or(kind == DomainKind::Frequency)
    }

    pub fn validate(&self) -> AppResult<()> {
        for kind in [DomainKind::Frequency, DomainKind::Time] {
            self.defaults_for(kind)
                .validate()
                .map_err(|e| AppError::Config(format!("Invalid {} defaults: {}", kind, e)))?;
        }
        Ok(())
    }
}

/// Load and validate a session config from a YAML file.
pub fn load_config(path: &Path) -> AppResult<SessionConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ConfigFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_config(&content)
}

/// Parse and validate YAML config text.
pub fn parse_config(content: &str) -> AppResult<SessionConfig> {
    let config: SessionConfig = serde_yaml::from_str(content)
        .map_err(|e| AppError::Config(format!("Failed to parse config YAML: {}", e)))?;
    config.validate()?;
    Ok(config)
}
