//! Engine configuration

use crate::fallback::FallbackSettings;
use crate::lexicon::Lexicon;
use crate::matcher::MatchSettings;
use sellerlens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for the review engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Keyword matching thresholds
    #[serde(default)]
    pub matching: MatchSettings,

    /// Fallback classifier policy
    #[serde(default)]
    pub fallback: FallbackSettings,

    /// Batch execution
    #[serde(default)]
    pub batch: BatchSettings,

    /// Optional lexicon file replacing or extending the built-in tables
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

/// Batch execution settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Reviews classified concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Skip one-word acknowledgements such as "ok" or "fine"
    #[serde(default = "default_true")]
    pub skip_trivial: bool,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            skip_trivial: true,
        }
    }
}

fn default_concurrency() -> usize {
    num_cpus::get().max(1)
}

fn default_true() -> bool {
    true
}

impl EngineConfig {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("failed to read config {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// Load from file if it exists, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                info!("Loading engine configuration from {}", path.display());
                Self::from_file(path)
            }
            Some(path) => Err(Error::config(format!(
                "config file {} does not exist",
                path.display()
            ))),
            None => Ok(Self::default()),
        }
    }

    /// Reject settings the engine cannot honour
    pub fn validate(&self) -> Result<()> {
        if self.matching.fuzzy_threshold > 100 || self.matching.damage_threshold > 100 {
            return Err(Error::config("fuzzy thresholds must be within 0-100"));
        }
        if !(0.0..=1.0).contains(&self.fallback.min_confidence) {
            return Err(Error::config("fallback.min_confidence must be within 0.0-1.0"));
        }
        if self.fallback.top_k == 0 {
            return Err(Error::config("fallback.top_k must be at least 1"));
        }
        if self.fallback.timeout_ms == 0 {
            return Err(Error::config("fallback.timeout_ms must be positive"));
        }
        if self.batch.concurrency == 0 {
            return Err(Error::config("batch.concurrency must be at least 1"));
        }
        Ok(())
    }

    /// Build the lexicon this configuration points at
    pub fn load_lexicon(&self) -> Result<Lexicon> {
        match &self.lexicon_path {
            Some(path) => {
                info!("Loading lexicon from {}", path.display());
                Lexicon::from_file(path)
            }
            None => Lexicon::builtin(),
        }
    }
}
