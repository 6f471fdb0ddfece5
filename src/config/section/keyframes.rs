//! `[keyframes]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [keyframes]
//! allowed_properties = ["animation-timing-function", "offset-distance", "opacity", "transform", "visibility"]
//! max_bytes = 500000
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Properties a keyframes block may use and still move to the animation bucket.
pub const DEFAULT_ALLOWED_PROPERTIES: &[&str] = &[
    "animation-timing-function",
    "offset-distance",
    "opacity",
    "transform",
    "visibility",
];

/// Keyframes bucket settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyframesConfig {
    /// Compared after vendor prefixes are stripped.
    pub allowed_properties: Vec<String>,
    /// Size budget of the animation bucket.
    pub max_bytes: usize,
}

impl Default for KeyframesConfig {
    fn default() -> Self {
        Self {
            allowed_properties: DEFAULT_ALLOWED_PROPERTIES
                .iter()
                .map(|p| p.to_string())
                .collect(),
            max_bytes: 500_000,
        }
    }
}

impl KeyframesConfig {
    pub const ALLOWED_PROPERTIES: FieldPath = FieldPath::new("keyframes.allowed_properties");
    pub const MAX_BYTES: FieldPath = FieldPath::new("keyframes.max_bytes");

    /// Check a (prefix-stripped, lowercased) property name.
    pub fn allows(&self, property: &str) -> bool {
        self.allowed_properties
            .iter()
            .any(|p| p.eq_ignore_ascii_case(property))
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.allowed_properties.is_empty() {
            diag.warn(Self::ALLOWED_PROPERTIES, "empty list, no keyframes will be moved");
        }
        if let Some(bad) = self
            .allowed_properties
            .iter()
            .find(|p| p.trim().is_empty() || p.starts_with('-'))
        {
            diag.error_with_hint(
                Self::ALLOWED_PROPERTIES,
                format!("invalid property name `{bad}`"),
                "list unprefixed names, vendor prefixes are stripped before matching",
            );
        }
        if self.max_bytes == 0 {
            diag.error(Self::MAX_BYTES, "must be greater than 0");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_keyframes_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.keyframes.max_bytes, 500_000);
        assert!(config.keyframes.allows("opacity"));
        assert!(config.keyframes.allows("Transform"));
        assert!(!config.keyframes.allows("color"));
    }

    #[test]
    fn test_keyframes_config_validate() {
        let config = test_parse_config(
            "[keyframes]\nallowed_properties = [\"-webkit-transform\"]\nmax_bytes = 0",
        );
        let mut diag = ConfigDiagnostics::new();
        config.keyframes.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
