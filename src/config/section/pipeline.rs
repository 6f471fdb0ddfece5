//! `[pipeline]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [pipeline]
//! transformers = ["carousel", "layout", "hero-image", "keyframes", "transformed-identifier"]
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};
use crate::pipeline::TransformerId;

/// Which transformers run, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub transformers: Vec<TransformerId>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            transformers: TransformerId::DEFAULT_ORDER.to_vec(),
        }
    }
}

impl PipelineConfig {
    pub const TRANSFORMERS: FieldPath = FieldPath::new("pipeline.transformers");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        for (i, id) in self.transformers.iter().enumerate() {
            if self.transformers[..i].contains(id) {
                diag.error_with_hint(
                    Self::TRANSFORMERS,
                    format!("`{}` is listed more than once", id.as_str()),
                    "each transformer runs at most once per document",
                );
            }
        }

        if self.transformers.is_empty() {
            diag.warn(Self::TRANSFORMERS, "empty list, documents pass through unchanged");
        }
    }
}
