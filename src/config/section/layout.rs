//! `[layout]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [layout]
//! default_unit = "px"   # Unit assumed for unit-less width/height
//! ```

use serde::{Deserialize, Serialize};

use crate::config::FieldPath;
use crate::css::CssUnit;

/// Layout calculation defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Unit assumed for unit-less lengths.
    pub default_unit: CssUnit,
}

impl LayoutConfig {
    pub const DEFAULT_UNIT: FieldPath = FieldPath::new("layout.default_unit");
}
