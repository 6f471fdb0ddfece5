//! `[carousel]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [carousel]
//! default_width = 600            # Used when no slide has usable dimensions
//! default_height = 480
//! marker = "data-amp-carousel"   # Attribute marking galleries to convert
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Gallery → carousel conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub default_width: u32,
    pub default_height: u32,
    /// Galleries carrying `marker="true"` are converted.
    pub marker: String,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            default_width: 600,
            default_height: 480,
            marker: "data-amp-carousel".into(),
        }
    }
}

impl CarouselConfig {
    pub const DEFAULT_WIDTH: FieldPath = FieldPath::new("carousel.default_width");
    pub const DEFAULT_HEIGHT: FieldPath = FieldPath::new("carousel.default_height");
    pub const MARKER: FieldPath = FieldPath::new("carousel.marker");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.default_width == 0 {
            diag.error(Self::DEFAULT_WIDTH, "must be greater than 0");
        }
        if self.default_height == 0 {
            diag.error(Self::DEFAULT_HEIGHT, "must be greater than 0");
        }
        if self.marker.trim().is_empty() {
            diag.error_with_hint(
                Self::MARKER,
                "must not be empty",
                "the default is `data-amp-carousel`",
            );
        }
    }
}
