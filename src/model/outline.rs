//! Assembled deck model.

use super::{ParagraphProjection, Theme};
use serde::{Deserialize, Serialize};

/// Deck-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckMetadata {
    /// Output base name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Theme the deck was assembled for
    pub theme: Theme,
}

/// A placeholder slot and the paragraphs written into it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderOutline {
    /// Placeholder index within the slide layout
    pub slot: u32,

    /// Paragraphs in order
    #[serde(default)]
    pub paragraphs: Vec<ParagraphProjection>,
}

impl PlaceholderOutline {
    /// Create an empty slot.
    pub fn new(slot: u32) -> Self {
        Self {
            slot,
            paragraphs: Vec::new(),
        }
    }

    /// Get the plain text content, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One assembled slide.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideOutline {
    /// Slide index (0-based)
    pub index: usize,

    /// Canonical layout alias
    pub layout: String,

    /// Layout position for the deck's theme
    pub layout_index: u32,

    /// Claimed placeholders in claim order
    #[serde(default)]
    pub placeholders: Vec<PlaceholderOutline>,

    /// Speaker notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl SlideOutline {
    /// Create a new slide.
    pub fn new(index: usize, layout: impl Into<String>, layout_index: u32) -> Self {
        Self {
            index,
            layout: layout.into(),
            layout_index,
            ..Default::default()
        }
    }

    /// Get a claimed placeholder by slot.
    pub fn placeholder(&self, slot: u32) -> Option<&PlaceholderOutline> {
        self.placeholders.iter().find(|p| p.slot == slot)
    }

    /// Get or claim a placeholder by slot.
    pub fn placeholder_mut(&mut self, slot: u32) -> &mut PlaceholderOutline {
        let pos = match self.placeholders.iter().position(|p| p.slot == slot) {
            Some(pos) => pos,
            None => {
                self.placeholders.push(PlaceholderOutline::new(slot));
                self.placeholders.len() - 1
            }
        };
        &mut self.placeholders[pos]
    }

    /// Check if no placeholder received a paragraph.
    pub fn is_empty(&self) -> bool {
        self.placeholders.iter().all(|p| p.paragraphs.is_empty())
    }
}

/// An assembled deck.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckOutline {
    /// Deck metadata
    pub metadata: DeckMetadata,

    /// Slides in output order
    #[serde(default)]
    pub slides: Vec<SlideOutline>,
}

impl DeckOutline {
    /// Create a new empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a slide.
    pub fn add_slide(&mut self, slide: SlideOutline) {
        self.slides.push(slide);
    }

    /// Get the total number of paragraphs across all slides.
    pub fn total_paragraphs(&self) -> usize {
        self.slides
            .iter()
            .flat_map(|s| &s.placeholders)
            .map(|p| p.paragraphs.len())
            .sum()
    }

    /// Check if the deck has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Extract all text content as a single string.
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for slide in &self.slides {
            for placeholder in &slide.placeholders {
                for para in &placeholder.paragraphs {
                    text.push_str(&para.plain_text());
                    text.push('\n');
                }
            }
            text.push('\n');
        }
        text.trim().to_string()
    }
}
