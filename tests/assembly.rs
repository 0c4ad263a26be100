//! End-to-end assembly: request JSON through the registry to rendered output.

use deckgen::render::{to_json_default, to_markdown, to_text, RenderOptions};
use deckgen::{
    assemble_outline, AssemblyOptions, Error, LayoutRegistry, LayoutTemplate, PresentationSpec, ProjectOptions, Theme,
};

const TEMPLATE: &str = r#"
Title:
  alias: Title
  index: { light: 0, dark: 10 }
  description: Opening slide
  placeholders:
    0: { alias: Title, place_holder_index: { light: 0, dark: 0 } }
    1: { alias: Subtitle, place_holder_index: { light: 1 } }
Title/Content:
  alias: Title/Content
  index: { light: 1, dark: 11 }
  description: Title and a bulleted body
  placeholders:
    0: { alias: Title, place_holder_index: { light: 0, dark: 0 } }
    1: { alias: Body, place_holder_index: { light: 1, dark: 12 } }
"#;

const REQUEST: &str = r#"{
    "filename": "q3-review",
    "theme_mode": "dark",
    "voice": "ignored",
    "slides": [
        {
            "slide_number": 1,
            "layout": "title",
            "placeholders": [
                { "placeholder_name": "Title", "content": ["<span style=\"font-weight: bold\">Q3</span> review"] },
                { "placeholder_name": "Subtitle", "content": ["Finance team"] }
            ],
            "speaker_notes": "Welcome everyone."
        },
        {
            "slide_number": 2,
            "layout": "Title_Content",
            "placeholders": [
                { "placeholder_name": "Title", "content": ["Highlights"] },
                { "placeholder_name": "Body", "content": [
                    "<p level=\"1\">Revenue up</p>",
                    "<span style=\"bold\">x</span>",
                    "<span data-link=\"https://example.com/q3\">Full report</span>"
                ] }
            ],
            "speaker_notes": "   "
        },
        { "slide_number": 3, "layout": "Closing Remarks", "placeholders": [] }
    ]
}"#;

/// Malformed style declarations fail their paragraph.
fn options() -> AssemblyOptions {
    AssemblyOptions::default().with_markup(ProjectOptions::new().strict())
}

fn registry() -> LayoutRegistry {
    LayoutRegistry::build(&LayoutTemplate::from_yaml_str(TEMPLATE).unwrap()).unwrap()
}

#[test]
fn test_partial_deck_with_skips() {
    let spec = PresentationSpec::from_json(REQUEST).unwrap();
    let (deck, report) = assemble_outline(&registry(), &spec, options()).unwrap();

    assert_eq!(report.slides_built, 2);
    assert!(!report.is_complete());

    let skipped: Vec<(usize, Option<&str>, Option<usize>)> = report
        .skipped
        .iter()
        .map(|s| (s.slide, s.placeholder.as_deref(), s.paragraph))
        .collect();
    assert_eq!(
        skipped,
        vec![(1, Some("Subtitle"), None), (2, Some("Body"), Some(2)), (3, None, None)]
    );

    assert_eq!(deck.metadata.theme, Theme::Dark);
    assert_eq!(deck.metadata.title.as_deref(), Some("q3-review"));
    assert_eq!(deck.slides.len(), 2);

    let first = &deck.slides[0];
    assert_eq!(first.layout, "Title");
    assert_eq!(first.layout_index, 10);
    assert_eq!(first.notes.as_deref(), Some("Welcome everyone."));
    assert!(first.placeholder(1).is_none());

    let second = &deck.slides[1];
    assert_eq!(second.layout, "Title/Content");
    assert_eq!(second.layout_index, 11);
    assert!(second.notes.is_none());

    let body = second.placeholder(12).unwrap();
    assert_eq!(body.paragraphs.len(), 2);
    assert_eq!(body.paragraphs[0].level, Some(1));
    assert_eq!(body.paragraphs[1].runs[0].hyperlink.as_deref(), Some("https://example.com/q3"));
}

#[test]
fn test_fail_fast_stops_at_first_problem() {
    let spec = PresentationSpec::from_json(REQUEST).unwrap();
    let fail_fast = options().with_fail_fast(true);
    let err = assemble_outline(&registry(), &spec, fail_fast).unwrap_err();
    assert!(matches!(err, Error::UnknownTheme { .. }));
}

#[test]
fn test_light_theme_fills_every_slot() {
    let json = REQUEST.replace("\"dark\"", "\"light\"");
    let spec = PresentationSpec::from_json(&json).unwrap();
    let (deck, report) = assemble_outline(&registry(), &spec, options()).unwrap();

    assert_eq!(deck.slides[0].layout_index, 0);
    assert_eq!(deck.slides[0].placeholder(1).unwrap().plain_text(), "Finance team");
    assert_eq!(report.skipped.len(), 2);
}

#[test]
fn test_comparison_text_is_kept() {
    let json = REQUEST.replace("Highlights", "Margin < 5% & rising");
    let spec = PresentationSpec::from_json(&json).unwrap();
    let (deck, _) = assemble_outline(&registry(), &spec, AssemblyOptions::default()).unwrap();
    assert_eq!(deck.slides[1].placeholder(0).unwrap().plain_text(), "Margin < 5% & rising");
}

#[test]
fn test_invalid_requests() {
    assert!(matches!(
        PresentationSpec::from_json(r#"{"filename": "x", "theme_mode": "light", "slides": []}"#),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        PresentationSpec::from_json(r#"{"filename": "x", "theme_mode": "sepia", "slides": []}"#),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn test_rendered_outputs() {
    let spec = PresentationSpec::from_json(REQUEST).unwrap();
    let (deck, _) = assemble_outline(&registry(), &spec, options()).unwrap();

    let md = to_markdown(&deck, &RenderOptions::default().with_frontmatter(true)).unwrap();
    assert!(md.starts_with("---\ntitle: \"q3-review\"\ntheme: dark\nslides: 2\n---"));
    assert!(md.contains("## Slide 1: Title"));
    assert!(md.contains("**Q3** review"));
    assert!(md.contains("> **Notes:**\n> Welcome everyone."));
    assert!(md.contains("\n  Revenue up"));
    assert!(md.contains("[Full report](https://example.com/q3)"));

    let text = to_text(&deck, &RenderOptions::default().with_notes(false)).unwrap();
    assert!(text.contains("Slide 2: Title/Content"));
    assert!(!text.contains("Welcome"));

    let json: serde_json::Value = serde_json::from_str(&to_json_default(&deck).unwrap()).unwrap();
    assert_eq!(json["metadata"]["theme"], "dark");
    assert_eq!(json["slides"][1]["layout"], "Title/Content");
}
