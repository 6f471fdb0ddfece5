//! ampify - rewrite CMS-rendered HTML into AMP markup.
//!
//! The library parses a page into an arena `Document`, runs an ordered
//! `Pipeline` of transformers over it and serializes the result. Recoverable
//! problems are collected alongside the document instead of aborting.
//!
//! ```ignore
//! let output = Pipeline::from_config(&AmpifyConfig::default()).run_html(html)?;
//! println!("{}", output.to_html());
//! ```

pub mod cli;
pub mod config;
pub mod css;
pub mod dom;
pub mod error;
pub mod layout;
pub mod logger;
pub mod pipeline;
pub mod utils;

pub use config::AmpifyConfig;
pub use css::{CssLength, CssUnit};
pub use dom::{Document, NodeId};
pub use error::{DomError, ErrorCollection, ErrorKind, ParseError, TransformError};
pub use layout::Layout;
pub use pipeline::{Pipeline, PipelineOutput, Transformer, TransformerId};
