//! Layout model for sizeable AMP components.
//!
//! - `Layout`: the sizing strategies an element can declare
//! - `LayoutSpec`: per-tag supported layouts, natural size and default
//! - `resolve()`: the decision table mapping attributes to a layout
//!
//! Decision order:
//!
//! ```text
//! explicit layout ─────────────→ validate against supported set
//! width/height parse ──invalid─→ InvalidLength
//! both unset + natural size ───→ use natural size
//! both unset ──────────────────→ tag default │ fill (placeholder) │ container
//! height = fluid ──────────────→ fluid
//! height set, width auto/unset → fixed-height
//! both set + sizes/heights ────→ responsive
//! otherwise ───────────────────→ fixed
//! ```

use std::fmt;
use std::str::FromStr;

use crate::css::{CssLength, CssUnit};
use crate::dom::AmpTag;

/// Sizing strategy of an AMP element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
    Nodisplay,
    Fixed,
    FixedHeight,
    Responsive,
    Container,
    Fill,
    FlexItem,
    Fluid,
    Intrinsic,
}

impl Layout {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Nodisplay => "nodisplay",
            Self::Fixed => "fixed",
            Self::FixedHeight => "fixed-height",
            Self::Responsive => "responsive",
            Self::Container => "container",
            Self::Fill => "fill",
            Self::FlexItem => "flex-item",
            Self::Fluid => "fluid",
            Self::Intrinsic => "intrinsic",
        }
    }

    /// Class applied to elements with this layout.
    pub fn class_name(&self) -> String {
        format!("i-amphtml-layout-{}", self.as_str())
    }

    /// Layouts whose box size is known before content loads.
    pub const fn is_size_defined(&self) -> bool {
        matches!(
            self,
            Self::Fixed
                | Self::FixedHeight
                | Self::Responsive
                | Self::Fill
                | Self::FlexItem
                | Self::Fluid
                | Self::Intrinsic
        )
    }
}

impl FromStr for Layout {
    type Err = ();

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layout = match s.trim().to_ascii_lowercase().as_str() {
            "nodisplay" => Self::Nodisplay,
            "fixed" => Self::Fixed,
            "fixed-height" => Self::FixedHeight,
            "responsive" => Self::Responsive,
            "container" => Self::Container,
            "fill" => Self::Fill,
            "flex-item" => Self::FlexItem,
            "fluid" => Self::Fluid,
            "intrinsic" => Self::Intrinsic,
            _ => return Err(()),
        };
        Ok(layout)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Per-tag table
// ============================================================================

/// Static layout facts for one AMP tag.
#[derive(Debug, Clone, Copy)]
pub struct LayoutSpec {
    pub supported: &'static [Layout],
    /// Natural size in px, used when neither dimension is given.
    pub natural: Option<(f64, f64)>,
    /// Layout used when neither dimension is given (before `container`).
    pub default: Option<Layout>,
}

impl LayoutSpec {
    pub fn supports(&self, layout: Layout) -> bool {
        self.supported.contains(&layout)
    }
}

use Layout::*;

const MEDIA: &[Layout] = &[
    Fill, Fixed, FixedHeight, FlexItem, Intrinsic, Nodisplay, Responsive,
];
const EMBED: &[Layout] = &[Fill, Fixed, FixedHeight, FlexItem, Nodisplay, Responsive];
const AUDIO: &[Layout] = &[Fixed, FixedHeight, Nodisplay, Container];
const CONTAINERS: &[Layout] = &[
    Container, Fill, Fixed, FixedHeight, FlexItem, Nodisplay, Responsive,
];
const AD: &[Layout] = &[
    Fill, Fixed, FixedHeight, FlexItem, Fluid, Intrinsic, Nodisplay, Responsive,
];
const AMP_LAYOUT: &[Layout] = &[
    Container, Fill, Fixed, FixedHeight, FlexItem, Intrinsic, Nodisplay, Responsive,
];
const INVISIBLE: &[Layout] = &[Fixed, Nodisplay];
const OVERLAY: &[Layout] = &[Nodisplay];

/// Layout facts for a tag.
pub fn spec_for(tag: AmpTag) -> LayoutSpec {
    let (supported, natural, default) = match tag {
        AmpTag::Img | AmpTag::Anim | AmpTag::Iframe | AmpTag::Carousel => (MEDIA, None, None),
        AmpTag::Video | AmpTag::Youtube | AmpTag::FitText => (EMBED, None, None),
        AmpTag::Audio => (AUDIO, None, None),
        AmpTag::SocialShare => (CONTAINERS, Some((60.0, 44.0)), None),
        AmpTag::Pixel => (INVISIBLE, Some((1.0, 1.0)), None),
        AmpTag::Analytics => (INVISIBLE, None, Some(Nodisplay)),
        AmpTag::Ad => (AD, None, None),
        AmpTag::Layout => (AMP_LAYOUT, None, None),
        AmpTag::List => (CONTAINERS, None, None),
        AmpTag::Lightbox | AmpTag::Sidebar => (OVERLAY, None, Some(Nodisplay)),
    };
    LayoutSpec {
        supported,
        natural,
        default,
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Layout-relevant attributes of one element.
#[derive(Debug, Clone, Copy, Default)]
pub struct LayoutInput<'a> {
    pub layout: Option<&'a str>,
    pub width: Option<&'a str>,
    pub height: Option<&'a str>,
    /// `sizes` or `heights` present.
    pub responsive_hint: bool,
    /// `placeholder` or `fallback` present.
    pub placeholder: bool,
}

/// Outcome of a successful resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolved {
    pub layout: Layout,
    pub width: CssLength,
    pub height: CssLength,
}

/// Why no layout could be assigned.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutProblem {
    InvalidLength { attr: &'static str, value: String },
    Unsupported { layout: String },
}

impl fmt::Display for LayoutProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLength { attr, value } => write!(f, "invalid {attr} `{value}`"),
            Self::Unsupported { layout } => write!(f, "layout `{layout}` is not supported"),
        }
    }
}

fn parse_dimensions(
    input: &LayoutInput<'_>,
    unit: CssUnit,
) -> Result<(CssLength, CssLength), LayoutProblem> {
    let width = CssLength::parse_with_unit(input.width, true, false, unit);
    if !width.is_valid {
        return Err(LayoutProblem::InvalidLength {
            attr: "width",
            value: input.width.unwrap_or_default().to_string(),
        });
    }
    let height = CssLength::parse_with_unit(input.height, true, true, unit);
    if !height.is_valid {
        return Err(LayoutProblem::InvalidLength {
            attr: "height",
            value: input.height.unwrap_or_default().to_string(),
        });
    }
    Ok((width, height))
}

fn px(value: f64) -> CssLength {
    CssLength {
        is_set: true,
        is_valid: true,
        is_auto: false,
        is_fluid: false,
        numeral: value,
        unit: CssUnit::Px,
    }
}

/// Resolve the layout for an element of `tag`.
pub fn resolve(
    tag: AmpTag,
    input: &LayoutInput<'_>,
    default_unit: CssUnit,
) -> Result<Resolved, LayoutProblem> {
    let spec = spec_for(tag);

    if let Some(raw) = input.layout {
        let layout = raw
            .parse::<Layout>()
            .ok()
            .filter(|l| spec.supports(*l))
            .ok_or_else(|| LayoutProblem::Unsupported {
                layout: raw.to_string(),
            })?;
        let (width, height) = parse_dimensions(input, default_unit)?;
        return Ok(Resolved {
            layout,
            width,
            height,
        });
    }

    let (mut width, mut height) = parse_dimensions(input, default_unit)?;

    if !width.is_set
        && !height.is_set
        && let Some((w, h)) = spec.natural
    {
        width = px(w);
        height = px(h);
    }

    let layout = if !width.is_set && !height.is_set {
        match spec.default {
            Some(layout) => layout,
            None if input.placeholder => Fill,
            None => Container,
        }
    } else if height.is_fluid {
        Fluid
    } else if height.is_auto {
        // No enforced height
        Container
    } else if height.is_set && (!width.is_set || width.is_auto) {
        FixedHeight
    } else if height.is_set && width.is_set && input.responsive_hint {
        Responsive
    } else {
        Fixed
    };

    if !spec.supports(layout) {
        return Err(LayoutProblem::Unsupported {
            layout: layout.as_str().to_string(),
        });
    }

    Ok(Resolved {
        layout,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve_img(input: LayoutInput<'_>) -> Result<Resolved, LayoutProblem> {
        resolve(AmpTag::Img, &input, CssUnit::Px)
    }

    #[test]
    fn test_layout_names() {
        assert_eq!(" Fixed-Height ".parse::<Layout>(), Ok(Layout::FixedHeight));
        assert!("bogus".parse::<Layout>().is_err());
        assert_eq!(Layout::FixedHeight.class_name(), "i-amphtml-layout-fixed-height");
        assert!(!Layout::Container.is_size_defined());
        assert!(!Layout::Nodisplay.is_size_defined());
        assert!(Layout::Responsive.is_size_defined());
    }

    #[test]
    fn test_fixed_vs_responsive() {
        let base = LayoutInput {
            width: Some("300"),
            height: Some("200"),
            ..Default::default()
        };
        assert_eq!(resolve_img(base).unwrap().layout, Layout::Fixed);

        let with_sizes = LayoutInput {
            responsive_hint: true,
            ..base
        };
        assert_eq!(resolve_img(with_sizes).unwrap().layout, Layout::Responsive);
    }

    #[test]
    fn test_fixed_height() {
        let input = LayoutInput {
            width: Some("auto"),
            height: Some("100"),
            ..Default::default()
        };
        assert_eq!(resolve_img(input).unwrap().layout, Layout::FixedHeight);

        let input = LayoutInput {
            height: Some("100"),
            ..Default::default()
        };
        assert_eq!(resolve_img(input).unwrap().layout, Layout::FixedHeight);
    }

    #[test]
    fn test_fluid_height() {
        let input = LayoutInput {
            width: Some("300"),
            height: Some("fluid"),
            ..Default::default()
        };
        assert_eq!(
            resolve(AmpTag::Ad, &input, CssUnit::Px).unwrap().layout,
            Layout::Fluid
        );
        // amp-img does not support fluid
        assert!(matches!(
            resolve_img(input),
            Err(LayoutProblem::Unsupported { .. })
        ));
    }

    #[test]
    fn test_unsized_defaults() {
        let unsized_input = LayoutInput::default();
        assert!(matches!(
            resolve_img(unsized_input),
            Err(LayoutProblem::Unsupported { layout }) if layout == "container"
        ));
        assert_eq!(
            resolve(AmpTag::Layout, &unsized_input, CssUnit::Px).unwrap().layout,
            Layout::Container
        );
        assert_eq!(
            resolve(AmpTag::Analytics, &unsized_input, CssUnit::Px).unwrap().layout,
            Layout::Nodisplay
        );

        let placeholder = LayoutInput {
            placeholder: true,
            ..Default::default()
        };
        assert_eq!(resolve_img(placeholder).unwrap().layout, Layout::Fill);
    }

    #[test]
    fn test_natural_size() {
        let resolved = resolve(AmpTag::SocialShare, &LayoutInput::default(), CssUnit::Px).unwrap();
        assert_eq!(resolved.layout, Layout::Fixed);
        assert_eq!(resolved.width.css(), "60px");
        assert_eq!(resolved.height.css(), "44px");

        let pixel = resolve(AmpTag::Pixel, &LayoutInput::default(), CssUnit::Px).unwrap();
        assert_eq!(pixel.width.css(), "1px");
    }

    #[test]
    fn test_invalid_length() {
        let input = LayoutInput {
            width: Some("100%"),
            height: Some("10"),
            ..Default::default()
        };
        assert_eq!(
            resolve_img(input),
            Err(LayoutProblem::InvalidLength {
                attr: "width",
                value: "100%".to_string()
            })
        );

        let input = LayoutInput {
            width: Some("10"),
            height: Some("10px10"),
            ..Default::default()
        };
        assert!(matches!(
            resolve_img(input),
            Err(LayoutProblem::InvalidLength { attr: "height", .. })
        ));
    }

    #[test]
    fn test_auto_height_is_unenforced() {
        let input = LayoutInput {
            width: Some("300"),
            height: Some("auto"),
            ..Default::default()
        };
        assert!(matches!(
            resolve_img(input),
            Err(LayoutProblem::Unsupported { layout }) if layout == "container"
        ));
        assert_eq!(
            resolve(AmpTag::Layout, &input, CssUnit::Px).unwrap().layout,
            Layout::Container
        );

        let explicit = LayoutInput {
            layout: Some("fixed-height"),
            ..input
        };
        assert!(resolve_img(explicit).unwrap().height.is_auto);
    }

    #[test]
    fn test_explicit_layout() {
        let input = LayoutInput {
            layout: Some("RESPONSIVE"),
            width: Some("16"),
            height: Some("9"),
            ..Default::default()
        };
        assert_eq!(resolve_img(input).unwrap().layout, Layout::Responsive);

        let input = LayoutInput {
            layout: Some("container"),
            ..Default::default()
        };
        assert_eq!(
            resolve_img(input),
            Err(LayoutProblem::Unsupported {
                layout: "container".to_string()
            })
        );
    }

    #[test]
    fn test_default_unit() {
        let input = LayoutInput {
            width: Some("10"),
            height: Some("5"),
            ..Default::default()
        };
        let resolved = resolve(AmpTag::Img, &input, CssUnit::Rem).unwrap();
        assert_eq!(resolved.width.css(), "10rem");
    }
}
