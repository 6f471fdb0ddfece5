//! `[hero]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [hero]
//! max = 2          # At most this many hero images per page
//! preload = true   # Add <link rel="preload" as="image"> to <head>
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Hero image selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroConfig {
    /// Cap on hero-marked images.
    pub max: usize,
    /// Emit preload links for marked images.
    pub preload: bool,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            max: 2,
            preload: true,
        }
    }
}

impl HeroConfig {
    pub const MAX: FieldPath = FieldPath::new("hero.max");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.max == 0 {
            diag.warn(Self::MAX, "0 disables hero image selection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_hero_config() {
        let config = test_parse_config("[hero]\nmax = 3\npreload = false");
        assert_eq!(config.hero.max, 3);
        assert!(!config.hero.preload);
    }

    #[test]
    fn test_hero_zero_is_warning() {
        let config = HeroConfig {
            max: 0,
            ..Default::default()
        };
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        assert!(diag.is_empty());
        assert_eq!(diag.warnings().len(), 1);
    }
}
