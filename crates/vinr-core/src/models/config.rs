//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VinrError};

/// Main configuration for vinr.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VinrConfig {
    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub output: OutputConfig,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Infer the maker from the VIN's WMI when no brand name is printed.
    pub wmi_fallback: bool,

    /// Re-run extraction on the VIN-area text when the sticker text has no VIN.
    pub vin_area_fallback: bool,

    /// Maximum model name length, in characters.
    pub model_max_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            wmi_fallback: true,
            vin_area_fallback: true,
            model_max_chars: 40,
        }
    }
}

/// Output format for extracted records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
    Text,
}

/// Output configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format.
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    pub pretty: bool,
}

impl VinrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the extractor cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.extraction.model_max_chars == 0 {
            return Err(VinrError::Config(
                "extraction.model_max_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
