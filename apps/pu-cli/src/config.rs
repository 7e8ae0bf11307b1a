//! CLI configuration file (YAML).
//!
//! ```yaml
//! prefixes:
//!   - symbol: Ki
//!     factor: 1024
//! ```

use std::path::Path;

use pu_core::{PrefixRegistry, PuError};
use serde::{Deserialize, Serialize};

pub type CliResult<T> = Result<T, CliError>;

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Engine(#[from] PuError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown operator '{op}' (expected one of + - * / or add sub mul div)")]
    UnknownOperator { op: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Custom prefixes layered over the standard SI set.
    pub prefixes: Vec<PrefixEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefixEntry {
    pub symbol: String,
    pub factor: f64,
}

impl Config {
    pub fn from_yaml(content: &str) -> CliResult<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn load(path: &Path) -> CliResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(
            path = %path.display(),
            prefixes = config.prefixes.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Standard registry plus the configured prefixes.
    pub fn registry(&self) -> CliResult<PrefixRegistry> {
        let mut registry = PrefixRegistry::standard();
        for entry in &self.prefixes {
            if registry.contains(&entry.symbol) {
                tracing::warn!(symbol = %entry.symbol, "config overrides an existing prefix");
            }
            registry.register(entry.symbol.clone(), entry.factor)?;
        }
        Ok(registry)
    }
}
