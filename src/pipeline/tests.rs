//! End-to-end pipeline properties.

use super::*;
use crate::config::{HeroConfig, KeyframesConfig};
use crate::dom::NodeId;
use crate::pipeline::transform::HERO_ATTR;

const PAGE: &str = concat!(
    "<!doctype html><html><head>",
    "<style amp-custom>.a{color:red}@keyframes f{to{opacity:1}}@keyframes c{to{color:blue}}</style>",
    "</head><body>",
    r#"<amp-img class="custom-logo" src="logo.png" width="120" height="40"></amp-img>"#,
    r#"<figure class="wp-block-gallery" data-amp-carousel="true">"#,
    r#"<figure><amp-img src="a.jpg" width="800" height="400"></amp-img><figcaption>Wide</figcaption></figure>"#,
    r#"<figure><amp-img src="b.jpg" width="300" height="300"></amp-img></figure>"#,
    r#"<figure><amp-img src="c.jpg" width="100" height="1000"></amp-img></figure>"#,
    "</figure>",
    "<amp-analytics></amp-analytics>",
    "</body></html>",
);

fn default_pipeline() -> Pipeline {
    Pipeline::from_config(&AmpifyConfig::default())
}

fn hero_count(doc: &Document) -> usize {
    doc.find(|n| n.attr(HERO_ATTR).is_some()).len()
}

#[test]
fn test_default_order() {
    assert_eq!(
        default_pipeline().names(),
        vec!["carousel", "layout", "hero-image", "keyframes", "transformed-identifier"]
    );
}

#[test]
fn test_full_page() {
    let output = default_pipeline().run_html(PAGE).unwrap();
    assert!(output.errors.is_empty(), "{:?}", output.errors);

    let doc = &output.document;
    let carousel = doc.find_by_tag("amp-carousel")[0];
    assert_eq!(doc.attr(carousel, "width"), Some("800"));
    assert_eq!(doc.attr(carousel, "height"), Some("400"));
    assert_eq!(doc.attr(carousel, "i-amphtml-layout"), Some("responsive"));

    let root = doc.root_element().unwrap();
    assert_eq!(doc.attr(root, "transformed"), Some("self;v=1"));
    assert_eq!(hero_count(doc), 1);

    let html = output.to_html();
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains(r#"<link rel="preload" href="logo.png" as="image" data-hero-preload>"#));
    assert!(html.contains("<style amp-keyframes>@keyframes f{to{opacity:1}}</style></body>"));
    assert!(html.contains("<style amp-custom>.a{color:red}@keyframes c{to{color:blue}}</style>"));
}

#[test]
fn test_idempotence() {
    let pipeline = default_pipeline();
    let once = pipeline.run_html(PAGE).unwrap().to_html();
    let twice = pipeline.run_html(&once).unwrap().to_html();
    assert_eq!(once, twice);
}

#[test]
fn test_idempotence_with_scripts_and_entities() {
    let page = concat!(
        "<html><head><script>for(var i=0;i<n;i++){}</script></head><body>",
        r#"<p title="Use &amp;lt;b&amp;gt; tags">a &amp;lt; b</p>"#,
        r#"<amp-img src="a.png?x=1&amp;y=2" width="300" height="200"></amp-img>"#,
        "</body></html>",
    );
    let pipeline = default_pipeline();
    let once = pipeline.run_html(page).unwrap().to_html();
    assert!(once.contains(r#"title="Use &amp;lt;b&amp;gt; tags""#));
    assert!(once.contains(r#"src="a.png?x=1&amp;y=2""#));
    assert!(once.contains(r#"layout="fixed""#));

    let twice = pipeline.run_html(&once).unwrap().to_html();
    assert_eq!(once, twice);
}

#[test]
fn test_hero_cap_invariant() {
    let tiers = [
        r#"<amp-img data-hero src="m.png"></amp-img>"#,
        r#"<amp-img class="custom-logo" src="l.png"></amp-img>"#,
        r#"<amp-img class="wp-post-image" src="f.png"></amp-img>"#,
        r#"<div class="wp-block-cover" style="background-image:url(c.png)"></div>"#,
        r#"<amp-img class="wp-post-image" src="s.png" srcset="s.png 1x"></amp-img>"#,
    ];

    for count in 0..12 {
        let body: String = (0..count).map(|i| tiers[i % tiers.len()]).collect();
        let html = format!("<html><head></head><body>{body}</body></html>");

        for max in 0..5 {
            let pipeline = Pipeline::new().pipe(HeroImageTransform::new(HeroConfig {
                max,
                preload: true,
            }));
            let output = pipeline.run_html(&html).unwrap();
            assert!(
                hero_count(&output.document) <= max,
                "{count} candidates, cap {max}"
            );

            // A second run never changes the selection
            let again = pipeline.run_html(&output.to_html()).unwrap();
            assert_eq!(again.to_html(), output.to_html());
        }
    }
}

#[test]
fn test_keyframes_termination() {
    let config = KeyframesConfig::default();
    let fragments = ["@keyframes a{", "{", "}", "to{opacity:1}", "/*", "*/", "\"", "@-moz-keyframes b "];

    // Deterministic pseudo-random concatenations
    let mut seed = 0x2545_f491_u32;
    for _ in 0..500 {
        let mut css = String::new();
        for _ in 0..12 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            css.push_str(fragments[seed as usize % fragments.len()]);
        }
        let split = split_keyframes(&css, &config);
        assert_eq!(split.main.len() + split.keyframes.len(), css.len());
    }
}

#[test]
fn test_aspect_ratio_selection() {
    let output = Pipeline::new()
        .pipe(CarouselTransform::default())
        .run_html(PAGE)
        .unwrap();
    let doc = &output.document;
    let carousel = doc.find_by_tag("amp-carousel")[0];
    assert_eq!(doc.attr(carousel, "width"), Some("800"));
    assert_eq!(doc.attr(carousel, "height"), Some("400"));
}

#[test]
fn test_layout_decision_table() {
    let output = Pipeline::new()
        .pipe(LayoutTransform::default())
        .run_html(concat!(
            r#"<html><body><amp-img src="a" width="300" height="200"></amp-img>"#,
            r#"<amp-img src="b" width="300" height="200" sizes="50vw"></amp-img></body></html>"#,
        ))
        .unwrap();
    let doc = &output.document;
    let imgs = doc.find_by_tag("amp-img");
    assert_eq!(doc.attr(imgs[0], "layout"), Some("fixed"));
    assert_eq!(doc.attr(imgs[1], "layout"), Some("responsive"));
}

#[test]
fn test_partial_failure() {
    let output = default_pipeline()
        .run_html(concat!(
            "<html><head></head><body>",
            r#"<amp-img src="a.png" width="300" height="200"></amp-img>"#,
            r#"<amp-img src="b.png" width="12abc" height="200"></amp-img>"#,
            r#"<amp-img src="c.png" height="90"></amp-img>"#,
            r#"<amp-youtube data-videoid="x" width="480" height="270" sizes="100vw"></amp-youtube>"#,
            "</body></html>",
        ))
        .unwrap();

    assert_eq!(output.errors.len(), 1);
    assert_eq!(output.errors.count(ErrorKind::InvalidLength), 1);

    let doc = &output.document;
    let layouts: Vec<_> = doc
        .find(|n| n.tag().is_some_and(|t| t.starts_with("amp-")))
        .into_iter()
        .map(|id| doc.attr(id, "layout"))
        .collect();
    assert_eq!(
        layouts,
        vec![Some("fixed"), None, Some("fixed-height"), Some("responsive")]
    );
}

struct Broken;

impl Transformer for Broken {
    fn name(&self) -> &'static str {
        "broken"
    }

    fn transform(&self, doc: &mut Document, _: &mut ErrorCollection) -> Result<(), DomError> {
        doc.element(NodeId(u32::MAX)).map(|_| ())
    }
}

#[test]
fn test_failed_transformer_becomes_cannot_adapt() {
    let output = Pipeline::new()
        .pipe(Broken)
        .pipe(TransformedIdentifier)
        .run_html("<html><body></body></html>")
        .unwrap();

    assert_eq!(output.errors.count(ErrorKind::CannotAdapt), 1);
    assert!(output.errors.as_slice()[0].message.starts_with("broken:"));
    // Later transformers still ran
    let root = output.document.root_element().unwrap();
    assert_eq!(output.document.attr(root, "transformed"), Some("self;v=1"));
}

#[test]
fn test_unparseable_input_is_hard_failure() {
    assert!(matches!(
        default_pipeline().run_html(""),
        Err(ParseError::Empty)
    ));
}

#[test]
fn test_configured_subset() {
    let mut config = AmpifyConfig::default();
    config.pipeline.transformers = vec![TransformerId::TransformedIdentifier, TransformerId::Layout];
    let pipeline = Pipeline::from_config(&config);
    assert_eq!(pipeline.names(), vec!["transformed-identifier", "layout"]);

    let output = pipeline.run_html(PAGE).unwrap();
    // No carousel step: the gallery is untouched
    assert!(output.document.find_by_tag("amp-carousel").is_empty());
}
