//! JSON renderer implementation.

use crate::error::{Error, Result};
use crate::model::DeckOutline;

/// JSON output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonFormat {
    /// Compact single-line JSON
    Compact,
    /// Pretty-printed with 2-space indentation
    #[default]
    Pretty,
}

/// Convert a deck to JSON.
pub fn to_json(deck: &DeckOutline, format: JsonFormat) -> Result<String> {
    let json = match format {
        JsonFormat::Compact => serde_json::to_string(deck),
        JsonFormat::Pretty => serde_json::to_string_pretty(deck),
    };
    json.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

/// Convert a deck to JSON with default formatting.
pub fn to_json_default(deck: &DeckOutline) -> Result<String> {
    to_json(deck, JsonFormat::Pretty)
}
