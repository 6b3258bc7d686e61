//! Export configuration.

use std::path::Path;

use bezkit_common::{BezKitError, Result, ResultExt};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Options that change what the exporter writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Write the opacity extension for translucent fills and strokes.
    pub use_transparency: bool,
    /// Flip the document into the output's bottom-left origin while
    /// writing.
    pub apply_display_transform: bool,
    /// Write the initial graphics state after the header.
    pub write_state: bool,
    /// Fill an empty palette with black, white and gray.
    pub default_palette: bool,
    /// Fixed header timestamp. `None` uses the local clock.
    pub creation_date: Option<NaiveDateTime>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            use_transparency: false,
            apply_display_transform: true,
            write_state: true,
            default_palette: true,
            creation_date: None,
        }
    }
}

impl ExportConfig {
    pub fn with_transparency(mut self, enabled: bool) -> Self {
        self.use_transparency = enabled;
        self
    }

    pub fn with_display_transform(mut self, enabled: bool) -> Self {
        self.apply_display_transform = enabled;
        self
    }

    pub fn with_creation_date(mut self, date: NaiveDateTime) -> Self {
        self.creation_date = Some(date);
        self
    }

    /// Timestamp for the header.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.creation_date
            .unwrap_or_else(|| Local::now().naive_local())
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).config_context("invalid export config")
    }

    /// Load from a file. A missing file gives the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no export config, using defaults");
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| BezKitError::config_with_source("failed to serialize export config", e))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
