//! # deckgen
//!
//! Layout resolution and rich-text projection for template-driven slide
//! decks.
//!
//! A presentation request names, for every slide, a layout and the content
//! of its placeholders. Names are resolved against a registry built from a
//! layout template, and every content string, a small HTML-like markup, is
//! projected onto a paragraph of styled runs. A rendering adapter (any
//! [`RenderTarget`]) writes the result into a concrete document.
//!
//! ## Quick Start
//!
//! ```
//! use deckgen::{build_registry, project_markup, resolve_layout, resolve_placeholder, Theme};
//! use deckgen::layout::LayoutTemplate;
//!
//! let template = LayoutTemplate::from_yaml_str(r#"
//! Title/Subtitle:
//!   alias: Title/Subtitle
//!   index: { light: 1, dark: 12 }
//!   placeholders:
//!     0: { alias: Title, place_holder_index: { light: 0, dark: 0 } }
//!     1: { alias: Subtitle, place_holder_index: { light: 1, dark: 1 } }
//! "#)?;
//! let registry = build_registry(&template)?;
//!
//! let layout = resolve_layout("title_subtitle", &registry)?;
//! assert_eq!(layout.layout_index(Theme::Dark)?, 12);
//! assert_eq!(resolve_placeholder(&layout, "Subtitle", Theme::Dark)?, 1);
//!
//! let paragraph = project_markup(r#"<p level="1">Q3 <span style="font-weight:bold">results</span></p>"#)?;
//! assert_eq!(paragraph.level, Some(1));
//! assert!(paragraph.runs[1].style.bold);
//! # Ok::<(), deckgen::Error>(())
//! ```
//!
//! ## Features
//!
//! - `inspect` (default): read `.pptx` templates to list their layouts
//! - `async`: async template loading with Tokio

pub mod assemble;
#[cfg(feature = "inspect")]
pub mod container;
pub mod error;
pub mod layout;
pub mod markup;
pub mod model;
pub mod render;

// Re-exports
pub use assemble::{
    assemble_outline, Assembler, AssemblyOptions, AssemblyReport, OutlineTarget, RenderTarget,
    ResolvedLayout, SkippedItem,
};
pub use error::{Error, Result};
pub use layout::{
    build_registry, resolve_layout, resolve_placeholder, LayoutCatalogue, LayoutRef, LayoutRegistry,
    LayoutTemplate, MatchPolicy, SlotIndex,
};
pub use markup::{project_markup, project_markup_with, ProjectOptions, StylePolicy};
pub use model::{
    DeckOutline, ParagraphProjection, PlaceholderSpec, PresentationSpec, Rgb, RunStyle, SlideSpec,
    StyledRun, Theme,
};

use std::path::Path;

/// Load a layout template file and build its registry.
///
/// # Example
///
/// ```no_run
/// let registry = deckgen::load_registry("layouts.yaml")?;
/// println!("{} layouts", registry.len());
/// # Ok::<(), deckgen::Error>(())
/// ```
pub fn load_registry(path: impl AsRef<Path>) -> Result<LayoutRegistry> {
    LayoutRegistry::load(path)
}

/// Render the layout catalogue of a template file as JSON.
///
/// # Example
///
/// ```no_run
/// let catalogue = deckgen::catalogue_json("layouts.yaml")?;
/// println!("{}", catalogue);
/// # Ok::<(), deckgen::Error>(())
/// ```
pub fn catalogue_json(path: impl AsRef<Path>) -> Result<String> {
    let template = LayoutTemplate::load(path)?;
    LayoutCatalogue::from_template(&template).to_json()
}

/// Assemble a JSON presentation request file into a deck outline.
///
/// # Example
///
/// ```no_run
/// use deckgen::{assemble_file, load_registry, render, AssemblyOptions};
///
/// let registry = load_registry("layouts.yaml")?;
/// let (deck, report) = assemble_file(&registry, "request.json", AssemblyOptions::default())?;
/// for item in &report.skipped {
///     eprintln!("skipped {}", item);
/// }
/// let markdown = render::to_markdown(&deck, &render::RenderOptions::default())?;
/// # Ok::<(), deckgen::Error>(())
/// ```
pub fn assemble_file(
    registry: &LayoutRegistry,
    request: impl AsRef<Path>,
    options: AssemblyOptions,
) -> Result<(DeckOutline, AssemblyReport)> {
    let json = std::fs::read_to_string(request.as_ref())?;
    let spec = PresentationSpec::from_json(&json)?;
    assemble_outline(registry, &spec, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_assemble_file() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("layouts.yaml");
        std::fs::write(
            &template,
            "Title:\n  alias: Title\n  index: { light: 0 }\n  description: Opening\n  placeholders:\n    0: { alias: Title, place_holder_index: { light: 0 } }\n",
        )
        .unwrap();

        let request = dir.path().join("request.json");
        let mut file = std::fs::File::create(&request).unwrap();
        write!(
            file,
            r#"{{"filename": "x", "theme_mode": "light", "slides": [{{"layout": "Title", "placeholders": [{{"placeholder_name": "Title", "content": ["Hi"]}}]}}]}}"#
        )
        .unwrap();

        let registry = load_registry(&template).unwrap();
        let (deck, report) = assemble_file(&registry, &request, AssemblyOptions::default()).unwrap();
        assert!(report.is_complete());
        assert_eq!(deck.plain_text(), "Hi");

        let catalogue = catalogue_json(&template).unwrap();
        assert!(catalogue.contains("\"Opening\""));
    }

    #[test]
    fn test_missing_request_file() {
        let registry = LayoutRegistry::default();
        assert!(matches!(
            assemble_file(&registry, "/nonexistent/request.json", AssemblyOptions::default()),
            Err(Error::Io(_))
        ));
    }
}
