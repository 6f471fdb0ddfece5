//! Document transformers.
//!
//! Each transformer owns its section of the configuration and mutates the
//! document in place, enabling composition via `Pipeline`.
//!
//! # Modules
//!
//! - `carousel`: Marked galleries → `<amp-carousel>` (`CarouselAssembler`)
//! - `layout`: Layout attributes, classes and sizing styles
//! - `hero`: Hero image marking and preload links
//! - `keyframes`: Safe `@keyframes` → `<style amp-keyframes>` (`split_keyframes`)
//! - `identifier`: `transformed` marker on the root element

mod carousel;
mod hero;
mod identifier;
mod keyframes;
mod layout;

pub use carousel::{CarouselAssembler, CarouselTransform, Slide};
pub use hero::{HERO_ATTR, HeroImageTransform, PRELOAD_ATTR};
pub use identifier::TransformedIdentifier;
pub use keyframes::{KeyframesSplit, KeyframesTransform, split_keyframes};
pub use layout::LayoutTransform;
