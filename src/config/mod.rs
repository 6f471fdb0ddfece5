//! Pipeline configuration management for `ampify.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── pipeline   # [pipeline]
//! │   ├── layout     # [layout]
//! │   ├── hero       # [hero]
//! │   ├── keyframes  # [keyframes]
//! │   └── carousel   # [carousel]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   └── field      # FieldPath
//! └── mod.rs         # AmpifyConfig (this file)
//! ```
//!
//! Every section is optional; a missing file means all defaults.

pub mod section;
pub mod types;
mod util;

pub use section::{CarouselConfig, HeroConfig, KeyframesConfig, LayoutConfig, PipelineConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};
pub use util::find_config_file;

use crate::log;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing ampify.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AmpifyConfig {
    /// Transformer selection and order
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Layout calculation
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Hero image selection
    #[serde(default)]
    pub hero: HeroConfig,

    /// Keyframes extraction
    #[serde(default)]
    pub keyframes: KeyframesConfig,

    /// Gallery conversion
    #[serde(default)]
    pub carousel: CarouselConfig,
}

impl AmpifyConfig {
    /// Load configuration from `path`, or defaults when the file is absent.
    ///
    /// Relative paths are searched upward from the current directory.
    pub fn load(path: &Path) -> Result<Self> {
        let Some(found) = find_config_file(path) else {
            crate::debug!("config"; "{} not found, using defaults", path.display());
            return Ok(Self::default());
        };

        let config = Self::from_path(&found)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    pub(crate) fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })
        .map_err(ConfigError::Toml)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Default configuration rendered as TOML.
    pub fn template() -> Result<String> {
        let body = toml::to_string_pretty(&Self::default())?;
        Ok(format!("# ampify.toml\n\n{body}"))
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Collect every section's problems into one diagnostics value.
    pub fn diagnostics(&self) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        self.pipeline.validate(&mut diag);
        self.hero.validate(&mut diag);
        self.keyframes.validate(&mut diag);
        self.carousel.validate(&mut diag);
        diag
    }

    /// Validate configuration.
    ///
    /// Warnings are printed, errors are returned all at once.
    pub fn validate(&self) -> Result<()> {
        let diag = self.diagnostics();
        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AmpifyConfig {
    let (parsed, ignored) = AmpifyConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
