//! Hero image selection.
//!
//! Marks up to `max` images with `data-hero` so they are fetched early, and
//! adds a matching `<link rel="preload" as="image">` to `<head>`.
//!
//! Candidates, highest priority first:
//!
//! | Tier     | Source                                                   |
//! |----------|----------------------------------------------------------|
//! | marked   | already carries `data-hero` (counts toward the cap)      |
//! | logo     | image with class `custom-logo`                           |
//! | featured | image with class `wp-post-image`                         |
//! | cover    | `wp-block-cover` background image (element or `url()`)   |
//!
//! Images with `srcset` are skipped: a single preload URL cannot match the
//! candidate the browser will pick.

use rustc_hash::FxHashSet;

use super::super::Transformer;
use crate::config::HeroConfig;
use crate::css;
use crate::dom::{Attrs, Category, Document, Node, NodeId};
use crate::error::{DomError, ErrorCollection, ErrorKind};

pub const HERO_ATTR: &str = "data-hero";
pub const PRELOAD_ATTR: &str = "data-hero-preload";

const LOGO_CLASS: &str = "custom-logo";
const FEATURED_CLASS: &str = "wp-post-image";
const COVER_CLASS: &str = "wp-block-cover";
const COVER_IMAGE_CLASS: &str = "wp-block-cover__image-background";

/// Candidate priority (lower is more important).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Tier {
    Logo,
    Featured,
    Cover,
}

#[derive(Debug, Clone)]
struct HeroCandidate {
    node: NodeId,
    tier: Tier,
    /// URL to preload; `None` when the element has nothing to fetch.
    src: Option<String>,
    has_srcset: bool,
}

/// Selects hero images and emits preload hints.
#[derive(Debug, Clone, Default)]
pub struct HeroImageTransform {
    config: HeroConfig,
}

impl HeroImageTransform {
    pub fn new(config: HeroConfig) -> Self {
        Self { config }
    }

    /// Elements already carrying the hero marker, in document order, split
    /// into dev-mode exempt ones and the rest.
    fn premarked(doc: &Document) -> (Vec<NodeId>, Vec<NodeId>) {
        doc.find(|n| n.attr(HERO_ATTR).is_some())
            .into_iter()
            .partition(|&id| doc.is_exempt(id))
    }

    /// Tiered candidates, deduplicated, excluding already-marked elements.
    fn candidates(doc: &Document) -> Vec<HeroCandidate> {
        let images = doc.find(|n| n.category().is_some_and(|c| c.is_image()));
        let has_class = |id: NodeId, class: &str| {
            doc.get(id)
                .and_then(Node::as_element)
                .is_some_and(|e| e.has_class(class))
        };

        let mut out = Vec::new();
        for (tier, class) in [(Tier::Logo, LOGO_CLASS), (Tier::Featured, FEATURED_CLASS)] {
            out.extend(
                images
                    .iter()
                    .filter(|&&id| has_class(id, class))
                    .map(|&id| image_candidate(doc, id, tier)),
            );
        }

        for cover in doc.find(|n| n.as_element().is_some_and(|e| e.has_class(COVER_CLASS))) {
            let inner = doc.find_descendant(cover, |n| {
                n.category().is_some_and(|c| c.is_image())
                    && n.as_element().is_some_and(|e| e.has_class(COVER_IMAGE_CLASS))
            });
            match inner {
                Some(img) => out.push(image_candidate(doc, img, Tier::Cover)),
                None => {
                    let url = doc
                        .attr(cover, "style")
                        .and_then(|s| css::style_property(s, "background-image"))
                        .and_then(|v| css::extract_url(&v));
                    if url.is_some() {
                        out.push(HeroCandidate {
                            node: cover,
                            tier: Tier::Cover,
                            src: url,
                            has_srcset: false,
                        });
                    }
                }
            }
        }

        let mut seen = FxHashSet::default();
        out.retain(|c| {
            seen.insert(c.node) && doc.attr(c.node, HERO_ATTR).is_none() && !doc.is_exempt(c.node)
        });
        out.sort_by_key(|c| c.tier);
        out
    }

    /// URL to preload for a marked element.
    fn preload_href(doc: &Document, id: NodeId) -> Option<String> {
        if doc.category(id).is_some_and(|c| c.is_image()) {
            if doc.attr(id, "srcset").is_some() {
                return None;
            }
            return doc.attr(id, "src").map(str::to_string);
        }
        doc.attr(id, "style")
            .and_then(|s| css::style_property(s, "background-image"))
            .and_then(|v| css::extract_url(&v))
    }

    /// Drop preload links whose href no longer belongs to a marked element.
    fn prune_preload_links(doc: &mut Document, marked: &[NodeId]) -> Result<(), DomError> {
        let Some(head) = doc.head() else {
            return Ok(());
        };

        let wanted: FxHashSet<String> = marked
            .iter()
            .filter_map(|&id| Self::preload_href(doc, id))
            .collect();
        let stale: Vec<NodeId> = doc
            .element_children(head)
            .into_iter()
            .filter(|&id| is_preload_link(doc, id))
            .filter(|&id| doc.attr(id, "href").is_none_or(|href| !wanted.contains(href)))
            .collect();

        for id in stale {
            doc.detach(id)?;
        }
        Ok(())
    }

    fn add_preload_links(&self, doc: &mut Document, marked: &[NodeId]) -> Result<(), DomError> {
        let Some(head) = doc.head() else {
            return Ok(());
        };

        let mut existing: FxHashSet<String> = doc
            .element_children(head)
            .into_iter()
            .filter(|&id| is_preload_link(doc, id))
            .filter_map(|id| doc.attr(id, "href").map(str::to_string))
            .collect();

        for &id in marked {
            let Some(href) = Self::preload_href(doc, id) else {
                continue;
            };
            if !existing.insert(href.clone()) {
                continue;
            }
            let attrs: Attrs = [
                ("rel", "preload"),
                ("href", href.as_str()),
                ("as", "image"),
                (PRELOAD_ATTR, ""),
            ]
            .into_iter()
            .collect();
            let link = doc.create_element("link", attrs);
            doc.append_child(head, link)?;
        }
        Ok(())
    }
}

/// A `<link>` this transformer inserted.
fn is_preload_link(doc: &Document, id: NodeId) -> bool {
    doc.category(id) == Some(Category::Link) && doc.attr(id, PRELOAD_ATTR).is_some()
}

fn image_candidate(doc: &Document, id: NodeId, tier: Tier) -> HeroCandidate {
    HeroCandidate {
        node: id,
        tier,
        src: doc
            .attr(id, "src")
            .filter(|s| !s.trim().is_empty())
            .map(str::to_string),
        has_srcset: doc.attr(id, "srcset").is_some(),
    }
}

impl Transformer for HeroImageTransform {
    fn name(&self) -> &'static str {
        "hero-image"
    }

    fn transform(&self, doc: &mut Document, errors: &mut ErrorCollection) -> Result<(), DomError> {
        let max = self.config.max;
        let (exempt, premarked) = Self::premarked(doc);

        // Exempt markers stay as authored but take up room under the cap;
        // other pre-marked elements beyond it lose their marker
        let room = max.saturating_sub(exempt.len());
        let mut over_cap = exempt.len() + premarked.len() > max;
        for &id in premarked.iter().skip(room) {
            doc.element_mut(id)?.remove_attr(HERO_ATTR);
        }
        let mut marked: Vec<NodeId> = exempt
            .into_iter()
            .chain(premarked.into_iter().take(room))
            .collect();

        let mut leftover = 0usize;
        for candidate in Self::candidates(doc) {
            if candidate.has_srcset {
                errors.record_at(
                    doc,
                    candidate.node,
                    ErrorKind::CannotPreloadImage,
                    "image has srcset, skipped as hero",
                );
                continue;
            }
            if candidate.src.is_none() {
                continue;
            }
            if marked.len() >= max {
                leftover += 1;
                continue;
            }
            doc.element_mut(candidate.node)?.set_attr(HERO_ATTR, "");
            marked.push(candidate.node);
        }

        over_cap |= leftover > 0;
        if over_cap {
            errors.record(
                ErrorKind::TooManyHeroImages,
                format!("more than {max} hero image candidates, extra ones left unmarked"),
            );
        }

        Self::prune_preload_links(doc, &marked)?;
        if self.config.preload {
            self.add_preload_links(doc, &marked)?;
        }

        crate::debug!("hero"; "{} hero images marked", marked.len());
        Ok(())
    }
}
