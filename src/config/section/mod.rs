//! Configuration section definitions.
//!
//! Each module corresponds to a section in `ampify.toml`:
//!
//! | Module      | TOML Section   | Purpose                               |
//! |-------------|----------------|---------------------------------------|
//! | `pipeline`  | `[pipeline]`   | Ordered transformer list              |
//! | `layout`    | `[layout]`     | Layout calculation defaults           |
//! | `hero`      | `[hero]`       | Hero image cap and preload links      |
//! | `keyframes` | `[keyframes]`  | Animation bucket allow-list and size  |
//! | `carousel`  | `[carousel]`   | Gallery → carousel conversion         |

mod carousel;
mod hero;
mod keyframes;
mod layout;
mod pipeline;

pub use carousel::CarouselConfig;
pub use hero::HeroConfig;
pub use keyframes::KeyframesConfig;
pub use layout::LayoutConfig;
pub use pipeline::PipelineConfig;
