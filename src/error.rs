//! Error types for the deckgen library.

use std::io;
use thiserror::Error;

use crate::model::Theme;

/// Result type alias for deckgen operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving layouts, projecting markup, or
/// assembling a deck.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The layout template is malformed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// No registry layout matches the requested name.
    #[error("Layout '{requested}' not recognized. Valid layouts: {}", .valid_names.join(", "))]
    UnknownLayout {
        /// The name as supplied by the caller
        requested: String,
        /// Every canonical layout alias, sorted
        valid_names: Vec<String>,
    },

    /// The requested name collapses onto more than one registry layout.
    #[error("Layout '{requested}' is ambiguous. Candidates: {}", .candidates.join(", "))]
    AmbiguousLayout {
        /// The name as supplied by the caller
        requested: String,
        /// Canonical aliases sharing the same fuzzy form, in template order
        candidates: Vec<String>,
    },

    /// The layout has no placeholder with the requested alias.
    #[error("Placeholder '{placeholder}' not found in layout '{layout}'")]
    UnknownPlaceholder {
        /// Canonical layout alias
        layout: String,
        /// Placeholder alias as supplied by the caller
        placeholder: String,
    },

    /// The layout (or one of its placeholders) has no index for the theme.
    #[error("{} has no '{theme}' variant", theme_subject(.layout, .placeholder.as_deref()))]
    UnknownTheme {
        /// Canonical layout alias
        layout: String,
        /// Placeholder alias, when the missing variant belongs to a placeholder
        placeholder: Option<String>,
        /// The theme that was requested
        theme: Theme,
    },

    /// A content string could not be projected.
    #[error("Markup parse error: {0}")]
    MarkupParse(String),

    /// A presentation request failed to deserialize or validate.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required package component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// Error during rendering.
    #[error("Render error: {0}")]
    Render(String),
}

fn theme_subject(layout: &str, placeholder: Option<&str>) -> String {
    match placeholder {
        Some(p) => format!("Placeholder '{}' of layout '{}'", p, layout),
        None => format!("Layout '{}'", layout),
    }
}

impl Error {
    /// Whether the error is confined to one slide or placeholder, so an
    /// assembly loop may skip the item and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownLayout { .. }
                | Error::AmbiguousLayout { .. }
                | Error::UnknownPlaceholder { .. }
                | Error::UnknownTheme { .. }
                | Error::MarkupParse(_)
                | Error::Render(_)
        )
    }
}

#[cfg(feature = "inspect")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
