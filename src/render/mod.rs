//! Output rendering for assembled decks.
//!
//! This module provides renderers for converting a [`DeckOutline`]
//! to various output formats: Markdown, plain text, and JSON.
//!
//! # Example
//!
//! ```
//! use deckgen::model::{DeckOutline, ParagraphProjection, SlideOutline};
//! use deckgen::render::*;
//!
//! let mut deck = DeckOutline::new();
//! let mut slide = SlideOutline::new(0, "Title", 0);
//! slide.placeholder_mut(0).paragraphs.push(ParagraphProjection::with_text("Hello"));
//! deck.add_slide(slide);
//!
//! let md = to_markdown(&deck, &RenderOptions::default())?;
//! assert!(md.starts_with("## Slide 1: Title"));
//!
//! let text = to_text(&deck, &RenderOptions::default())?;
//! let json = to_json(&deck, JsonFormat::Pretty)?;
//! # Ok::<(), deckgen::Error>(())
//! ```
//!
//! [`DeckOutline`]: crate::model::DeckOutline

mod json;
mod markdown;
mod options;
mod text;

pub use json::{to_json, to_json_default, JsonFormat};
pub use markdown::to_markdown;
pub use options::RenderOptions;
pub use text::to_text;
