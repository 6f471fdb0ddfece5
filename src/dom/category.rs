//! Element categories.
//!
//! Tag names are classified once, when the element is created, so
//! transformers match on an enum instead of comparing strings.

/// Recognized element category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Html,
    Head,
    Body,
    Style,
    Link,
    /// Plain `<img>`.
    Img,
    Figure,
    Figcaption,
    Anchor,
    /// An AMP component with layout semantics.
    Amp(AmpTag),
    /// Anything else.
    Opaque,
}

impl Category {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "html" => Self::Html,
            "head" => Self::Head,
            "body" => Self::Body,
            "style" => Self::Style,
            "link" => Self::Link,
            "img" => Self::Img,
            "figure" => Self::Figure,
            "figcaption" => Self::Figcaption,
            "a" => Self::Anchor,
            _ => AmpTag::from_tag(tag).map_or(Self::Opaque, Self::Amp),
        }
    }

    /// Elements that carry an image source (`img`, `amp-img`, `amp-anim`).
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            Self::Img | Self::Amp(AmpTag::Img) | Self::Amp(AmpTag::Anim)
        )
    }

    /// Elements the layout calculator sizes.
    pub fn sizeable(&self) -> Option<AmpTag> {
        match self {
            Self::Amp(tag) => Some(*tag),
            _ => None,
        }
    }
}

/// AMP components with layout semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmpTag {
    Img,
    Anim,
    Video,
    Audio,
    Iframe,
    Youtube,
    Carousel,
    SocialShare,
    Pixel,
    Analytics,
    Ad,
    Layout,
    List,
    Lightbox,
    Sidebar,
    FitText,
}

impl AmpTag {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = match tag {
            "amp-img" => Self::Img,
            "amp-anim" => Self::Anim,
            "amp-video" => Self::Video,
            "amp-audio" => Self::Audio,
            "amp-iframe" => Self::Iframe,
            "amp-youtube" => Self::Youtube,
            "amp-carousel" => Self::Carousel,
            "amp-social-share" => Self::SocialShare,
            "amp-pixel" => Self::Pixel,
            "amp-analytics" => Self::Analytics,
            "amp-ad" | "amp-embed" => Self::Ad,
            "amp-layout" => Self::Layout,
            "amp-list" => Self::List,
            "amp-lightbox" => Self::Lightbox,
            "amp-sidebar" => Self::Sidebar,
            "amp-fit-text" => Self::FitText,
            _ => return None,
        };
        Some(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag() {
        assert_eq!(Category::from_tag("html"), Category::Html);
        assert_eq!(Category::from_tag("amp-img"), Category::Amp(AmpTag::Img));
        assert_eq!(Category::from_tag("amp-embed"), Category::Amp(AmpTag::Ad));
        assert_eq!(Category::from_tag("section"), Category::Opaque);
    }

    #[test]
    fn test_is_image() {
        assert!(Category::from_tag("img").is_image());
        assert!(Category::from_tag("amp-anim").is_image());
        assert!(!Category::from_tag("amp-video").is_image());
    }

    #[test]
    fn test_sizeable() {
        assert_eq!(
            Category::from_tag("amp-social-share").sizeable(),
            Some(AmpTag::SocialShare)
        );
        assert!(Category::from_tag("img").sizeable().is_none());
        assert!(Category::from_tag("figure").sizeable().is_none());
    }
}
