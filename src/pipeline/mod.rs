//! Document transformation pipeline.
//!
//! Runs an ordered list of transformers over one `Document`, threading the
//! same `ErrorCollection` through every step.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────────────────────────────────┐   ┌──────────┐
//! │  parse   │ → │ carousel → layout → hero → keyframes → ident │ → │ to_html  │
//! └──────────┘   └──────────────────────────────────────────────┘   └──────────┘
//!                         ↓ recoverable problems
//!                   ErrorCollection (returned with the document)
//! ```
//!
//! A transformer that fails outright (`Err(DomError)`) is recorded as
//! `CannotAdapt` and the next one still runs. Only a parse failure stops
//! a document from being processed at all.

pub mod transform;

#[cfg(test)]
mod tests;

use serde::{Deserialize, Serialize};

use crate::config::AmpifyConfig;
use crate::dom::Document;
use crate::error::{DomError, ErrorCollection, ErrorKind, ParseError};
use crate::{debug, log};

pub use transform::{
    CarouselAssembler, CarouselTransform, HeroImageTransform, KeyframesSplit, KeyframesTransform,
    LayoutTransform, Slide, TransformedIdentifier, split_keyframes,
};

// =============================================================================
// Transformer
// =============================================================================

/// One step of the pipeline.
///
/// Implementations mutate the document in place and report recoverable
/// problems through `errors`. `Err` is reserved for failures that leave the
/// transformer unable to continue (stale handles, invalid tree surgery).
pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    fn transform(&self, doc: &mut Document, errors: &mut ErrorCollection) -> Result<(), DomError>;
}

/// Configurable transformer identifiers (`[pipeline] transformers`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformerId {
    Carousel,
    Layout,
    HeroImage,
    Keyframes,
    TransformedIdentifier,
}

impl TransformerId {
    /// Carousel runs before layout so the new `<amp-carousel>` gets its
    /// layout classes; the identifier runs last.
    pub const DEFAULT_ORDER: [Self; 5] = [
        Self::Carousel,
        Self::Layout,
        Self::HeroImage,
        Self::Keyframes,
        Self::TransformedIdentifier,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Carousel => "carousel",
            Self::Layout => "layout",
            Self::HeroImage => "hero-image",
            Self::Keyframes => "keyframes",
            Self::TransformedIdentifier => "transformed-identifier",
        }
    }

    /// Build the transformer with its section of the configuration.
    pub fn build(self, config: &AmpifyConfig) -> Box<dyn Transformer> {
        match self {
            Self::Carousel => Box::new(CarouselTransform::new(config.carousel.clone())),
            Self::Layout => Box::new(LayoutTransform::new(config.layout.default_unit)),
            Self::HeroImage => Box::new(HeroImageTransform::new(config.hero.clone())),
            Self::Keyframes => Box::new(KeyframesTransform::new(config.keyframes.clone())),
            Self::TransformedIdentifier => Box::new(TransformedIdentifier),
        }
    }
}

// =============================================================================
// Pipeline
// =============================================================================

/// Result of running the pipeline on one document.
#[derive(Debug)]
pub struct PipelineOutput {
    pub document: Document,
    pub errors: ErrorCollection,
}

impl PipelineOutput {
    /// Serialize the transformed document.
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}

/// Ordered transformer list.
///
/// ```ignore
/// let output = Pipeline::new()
///     .pipe(LayoutTransform::default())
///     .pipe(HeroImageTransform::default())
///     .run(doc);
/// ```
#[derive(Default)]
pub struct Pipeline {
    transformers: Vec<Box<dyn Transformer>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline with the configured transformers in configured order.
    pub fn from_config(config: &AmpifyConfig) -> Self {
        Self {
            transformers: config
                .pipeline
                .transformers
                .iter()
                .map(|id| id.build(config))
                .collect(),
        }
    }

    /// Append a transformer.
    pub fn pipe(mut self, transformer: impl Transformer + 'static) -> Self {
        self.transformers.push(Box::new(transformer));
        self
    }

    /// Names of the transformers, in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.transformers.iter().map(|t| t.name()).collect()
    }

    /// Run every transformer in order.
    pub fn run(&self, mut document: Document) -> PipelineOutput {
        let mut errors = ErrorCollection::new();

        for transformer in &self.transformers {
            let before = errors.len();
            if let Err(err) = transformer.transform(&mut document, &mut errors) {
                log!("error"; "{} failed: {}", transformer.name(), err);
                errors.record(
                    ErrorKind::CannotAdapt,
                    format!("{}: {}", transformer.name(), err),
                );
            }
            debug!("pipeline"; "{} done ({} new errors)", transformer.name(), errors.len() - before);
        }

        PipelineOutput { document, errors }
    }

    /// Parse `input` and run the pipeline on it.
    pub fn run_html(&self, input: &str) -> Result<PipelineOutput, ParseError> {
        let document = Document::parse(input)?;
        Ok(self.run(document))
    }
}
