//! Aggregate configuration of the corrector.
//!
//! Every section falls back to its defaults, so a JSON file only needs the
//! values it overrides:
//!
//! ```
//! use spelltrie::spelling::config::SpellConfig;
//!
//! let config = SpellConfig::from_json_str(r#"{"search": {"candidate_count": 5}}"#).unwrap();
//! assert_eq!(config.search.candidate_count, 5);
//! assert_eq!(config.search.frontier_cap, 10);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::spelling::corrector::CorrectorConfig;
use crate::spelling::error_model::ErrorModelConfig;
use crate::spelling::search::SearchConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SpellConfig {
    pub model: ErrorModelConfig,
    pub search: SearchConfig,
    pub corrector: CorrectorConfig,
}

impl SpellConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: SpellConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.model.validate()?;
        self.search.validate()?;
        self.corrector.validate()
    }
}
