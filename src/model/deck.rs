//! Presentation request model.
//!
//! A request names, for every slide, a layout and the content of some of its
//! placeholders. Layout and placeholder names may be inexact; they are
//! resolved against a [`LayoutRegistry`](crate::layout::LayoutRegistry).

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::Theme;
use crate::error::{Error, Result};

/// Content for one placeholder of a slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderSpec {
    /// Placeholder alias within the slide's layout
    pub placeholder_name: String,

    /// One markup string per paragraph. `None` claims the slot without
    /// writing any paragraph.
    #[serde(default)]
    pub content: Option<Vec<String>>,
}

impl PlaceholderSpec {
    /// Create a placeholder spec with the given paragraphs.
    pub fn new<I, S>(name: impl Into<String>, content: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            placeholder_name: name.into(),
            content: Some(content.into_iter().map(Into::into).collect()),
        }
    }

    /// Create a placeholder spec that claims the slot but writes nothing.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            placeholder_name: name.into(),
            content: None,
        }
    }

    /// Paragraph markup strings (empty when content is absent).
    pub fn paragraphs(&self) -> &[String] {
        self.content.as_deref().unwrap_or_default()
    }
}

/// One output slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideSpec {
    /// Ordering hint; the sequence order is what counts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slide_number: Option<NonZeroU32>,

    /// Layout name, possibly non-canonical
    pub layout: String,

    /// Placeholders to fill, in order
    #[serde(default)]
    pub placeholders: Vec<PlaceholderSpec>,

    /// Narration text for the slide's notes page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker_notes: Option<String>,
}

impl SlideSpec {
    /// Create a slide using the given layout.
    pub fn new(layout: impl Into<String>) -> Self {
        Self {
            layout: layout.into(),
            ..Default::default()
        }
    }

    /// Add a placeholder.
    pub fn with_placeholder(mut self, placeholder: PlaceholderSpec) -> Self {
        self.placeholders.push(placeholder);
        self
    }

    /// Set speaker notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.speaker_notes = Some(notes.into());
        self
    }
}

/// A complete presentation request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationSpec {
    /// Base name of the output file
    pub filename: String,

    /// Theme used to pick layout and placeholder variants
    pub theme_mode: Theme,

    /// Slides in output order
    pub slides: Vec<SlideSpec>,
}

impl PresentationSpec {
    /// Parse and validate a request from JSON.
    ///
    /// Unknown keys are ignored.
    pub fn from_json(json: &str) -> Result<Self> {
        let spec: PresentationSpec =
            serde_json::from_str(json).map_err(|e| Error::InvalidInput(e.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Check request-level invariants that serde cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.filename.trim().is_empty() {
            return Err(Error::InvalidInput("filename must not be empty".to_string()));
        }
        if self.slides.is_empty() {
            return Err(Error::InvalidInput(format!(
                "presentation '{}' has no slides",
                self.filename
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUEST: &str = r#"{
        "filename": "quarterly",
        "theme_mode": "dark",
        "audio": "female",
        "slides": [
            {
                "slide_number": 1,
                "layout": "Title",
                "placeholders": [
                    {"placeholder_name": "Title", "content": ["Q3 review"]},
                    {"placeholder_name": "Subtitle", "content": null}
                ],
                "speaker_notes": "Welcome everyone."
            },
            {"layout": "Title_Only", "placeholders": []}
        ]
    }"#;

    #[test]
    fn test_parse_request() {
        let spec = PresentationSpec::from_json(REQUEST).unwrap();
        assert_eq!(spec.filename, "quarterly");
        assert_eq!(spec.theme_mode, Theme::Dark);
        assert_eq!(spec.slides.len(), 2);

        let first = &spec.slides[0];
        assert_eq!(first.slide_number.map(NonZeroU32::get), Some(1));
        assert_eq!(first.placeholders[0].paragraphs(), ["Q3 review".to_string()]);
        assert!(first.placeholders[1].content.is_none());
        assert!(first.placeholders[1].paragraphs().is_empty());
        assert_eq!(first.speaker_notes.as_deref(), Some("Welcome everyone."));

        assert!(spec.slides[1].slide_number.is_none());
    }

    #[test]
    fn test_zero_slide_number_rejected() {
        let json = r#"{"filename": "x", "theme_mode": "light",
            "slides": [{"slide_number": 0, "layout": "Title"}]}"#;
        let err = PresentationSpec::from_json(json).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_unknown_theme_rejected() {
        let json = r#"{"filename": "x", "theme_mode": "sepia", "slides": [{"layout": "Title"}]}"#;
        assert!(PresentationSpec::from_json(json).is_err());
    }

    #[test]
    fn test_empty_deck_rejected() {
        let json = r#"{"filename": "x", "theme_mode": "light", "slides": []}"#;
        let err = PresentationSpec::from_json(json).unwrap_err();
        assert!(err.to_string().contains("no slides"));
    }

    #[test]
    fn test_builders() {
        let slide = SlideSpec::new("Agenda")
            .with_placeholder(PlaceholderSpec::new("Body", ["one", "two"]))
            .with_placeholder(PlaceholderSpec::empty("Footer"))
            .with_notes("Walk through the agenda");
        assert_eq!(slide.placeholders.len(), 2);
        assert_eq!(slide.placeholders[0].paragraphs().len(), 2);
        assert!(slide.speaker_notes.is_some());
    }
}
