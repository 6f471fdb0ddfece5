//! Gallery → `<amp-carousel>` conversion.
//!
//! `CarouselAssembler` builds the carousel from an ordered slide list;
//! `CarouselTransform` finds marked galleries in the document and swaps
//! them for assembled carousels.
//!
//! ```text
//! <amp-carousel type="slides" layout="responsive" width=W height=H>
//!   <div class="slide">
//!     <amp-img layout="fill" object-fit="cover" ...>
//!     <div class="amp-wp-gallery-caption"><span>caption</span></div>
//!   </div>
//!   ...
//! </amp-carousel>
//! ```
//!
//! W×H come from the slide with the widest aspect ratio.

use super::super::Transformer;
use crate::config::CarouselConfig;
use crate::css::CssLength;
use crate::dom::{Attrs, Category, Document, NodeId};
use crate::error::{DomError, ErrorCollection};

const SLIDE_CLASS: &str = "slide";
const CAPTION_CLASS: &str = "amp-wp-gallery-caption";

/// One carousel slide: a node plus optional caption text.
#[derive(Debug, Clone, PartialEq)]
pub struct Slide {
    pub node: NodeId,
    pub caption: Option<String>,
}

impl Slide {
    pub fn new(node: NodeId) -> Self {
        Self {
            node,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }
}

/// Builds `<amp-carousel>` elements.
#[derive(Debug, Clone, Copy)]
pub struct CarouselAssembler<'a> {
    config: &'a CarouselConfig,
}

impl<'a> CarouselAssembler<'a> {
    pub fn new(config: &'a CarouselConfig) -> Self {
        Self { config }
    }

    /// Strictly positive width and height of `id`, if declared.
    fn size_of(doc: &Document, id: NodeId) -> Option<(f64, f64)> {
        let width = CssLength::parse(doc.attr(id, "width"), false, false);
        let height = CssLength::parse(doc.attr(id, "height"), false, false);
        (width.is_positive() && height.is_positive()).then_some((width.numeral, height.numeral))
    }

    /// Size declared on the slide itself, or on the image it wraps.
    fn sized_node(doc: &Document, slide: NodeId) -> Option<(f64, f64)> {
        Self::size_of(doc, slide).or_else(|| Self::size_of(doc, slide_image(doc, slide)))
    }

    /// Carousel dimensions: those of the slide with the largest aspect ratio.
    pub fn dimensions(&self, doc: &Document, slides: &[Slide]) -> (f64, f64) {
        let mut best: Option<(f64, f64)> = None;
        for slide in slides {
            let Some((w, h)) = Self::sized_node(doc, slide.node) else {
                continue;
            };
            if best.is_none_or(|(bw, bh)| w / h > bw / bh) {
                best = Some((w, h));
            }
        }
        best.unwrap_or((
            f64::from(self.config.default_width),
            f64::from(self.config.default_height),
        ))
    }

    /// Build a detached carousel, moving each slide node into it.
    pub fn assemble(&self, doc: &mut Document, slides: &[Slide]) -> Result<NodeId, DomError> {
        let (width, height) = self.dimensions(doc, slides);
        let attrs: Attrs = [
            ("type", "slides".to_string()),
            ("layout", "responsive".to_string()),
            ("width", width.to_string()),
            ("height", height.to_string()),
        ]
        .into_iter()
        .collect();
        let carousel = doc.create_element("amp-carousel", attrs);

        for slide in slides {
            let wrapper = doc.create_element(
                "div",
                [("class", SLIDE_CLASS)].into_iter().collect::<Attrs>(),
            );
            fill_image(doc, slide.node)?;
            doc.append_child(wrapper, slide.node)?;

            if let Some(caption) = &slide.caption {
                let holder = doc.create_element(
                    "div",
                    [("class", CAPTION_CLASS)].into_iter().collect::<Attrs>(),
                );
                let span = doc.create_element("span", Attrs::new());
                let text = doc.create_text(caption);
                doc.append_child(span, text)?;
                doc.append_child(holder, span)?;
                doc.append_child(wrapper, holder)?;
            }

            doc.append_child(carousel, wrapper)?;
        }

        Ok(carousel)
    }
}

/// The slide itself, or what it wraps through single-child `<figure>` and
/// `<a>` layers.
fn slide_image(doc: &Document, slide: NodeId) -> NodeId {
    let mut current = slide;
    loop {
        if !matches!(
            doc.category(current),
            Some(Category::Figure | Category::Anchor)
        ) {
            return current;
        }
        match doc.element_children(current).as_slice() {
            [only] => current = *only,
            _ => return current,
        }
    }
}

/// Force fill/cover on a slide's image.
fn fill_image(doc: &mut Document, slide: NodeId) -> Result<(), DomError> {
    let target = slide_image(doc, slide);
    if is_image(doc, target) {
        let elem = doc.element_mut(target)?;
        elem.set_attr("layout", "fill");
        elem.set_attr("object-fit", "cover");
    }
    Ok(())
}

fn is_image(doc: &Document, id: NodeId) -> bool {
    doc.category(id).is_some_and(|c| c.is_image())
}

// =============================================================================
// DOM integration
// =============================================================================

/// Replaces marked galleries with assembled carousels.
#[derive(Debug, Clone, Default)]
pub struct CarouselTransform {
    config: CarouselConfig,
}

impl CarouselTransform {
    pub fn new(config: CarouselConfig) -> Self {
        Self { config }
    }

    /// Slides of a gallery: its element children, with captions pulled out.
    fn collect_slides(doc: &mut Document, gallery: NodeId) -> Result<Vec<Slide>, DomError> {
        let mut slides = Vec::new();
        for child in doc.element_children(gallery) {
            let mut slide = Slide::new(child);
            if let Some(caption) =
                doc.find_descendant(child, |n| n.category() == Some(Category::Figcaption))
            {
                let text = doc.text_content(caption).trim().to_string();
                doc.detach(caption)?;
                if !text.is_empty() {
                    slide = slide.with_caption(text);
                }
            }
            slides.push(slide);
        }
        Ok(slides)
    }
}

impl Transformer for CarouselTransform {
    fn name(&self) -> &'static str {
        "carousel"
    }

    fn transform(&self, doc: &mut Document, _errors: &mut ErrorCollection) -> Result<(), DomError> {
        let marker = self.config.marker.as_str();
        let galleries = doc.find(|n| n.attr(marker) == Some("true"));
        let assembler = CarouselAssembler::new(&self.config);
        let mut converted = 0usize;

        for gallery in galleries {
            if !doc.is_attached(gallery) || doc.is_exempt(gallery) {
                continue;
            }
            let slides = Self::collect_slides(doc, gallery)?;
            if slides.is_empty() {
                continue;
            }
            let carousel = assembler.assemble(doc, &slides)?;
            doc.replace(gallery, carousel)?;
            converted += 1;
        }

        crate::debug!("carousel"; "converted {} galleries", converted);
        Ok(())
    }
}
