//! Inline `style` attribute parsing.

use crate::error::{Error, Result};
use crate::model::{Rgb, RunStyle};

/// How to treat a style declaration without a `:` separator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StylePolicy {
    /// Skip the declaration and keep the rest
    #[default]
    Lenient,
    /// Reject the whole attribute with [`Error::MarkupParse`]
    Strict,
}

/// Parsed `property: value` declarations in source order.
///
/// Property names are lower-cased; values are trimmed but otherwise kept as
/// written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InlineStyle {
    declarations: Vec<(String, String)>,
}

impl InlineStyle {
    /// Value of a property; the last declaration wins.
    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    /// Check if nothing was declared.
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    fn is(&self, property: &str, keyword: &str) -> bool {
        self.get(property)
            .is_some_and(|v| v.eq_ignore_ascii_case(keyword))
    }

    /// Run formatting expressed by these declarations.
    ///
    /// Only `font-weight: bold`, `font-style: italic`,
    /// `text-decoration: underline` and `color: #RRGGBB` are interpreted.
    pub fn run_style(&self) -> RunStyle {
        RunStyle {
            bold: self.is("font-weight", "bold"),
            italic: self.is("font-style", "italic"),
            underline: self.is("text-decoration", "underline"),
            color: self.get("color").and_then(parse_color),
        }
    }
}

/// Parse a `style` attribute value.
///
/// Declarations are separated by `;`. Empty declarations (trailing or
/// doubled semicolons) are ignored. A declaration is split at its first `:`,
/// so values may themselves contain colons.
pub fn parse_style(style: &str, policy: StylePolicy) -> Result<InlineStyle> {
    let mut declarations = Vec::new();

    for token in style.split(';').map(str::trim).filter(|t| !t.is_empty()) {
        match token.split_once(':') {
            Some((property, value)) => {
                declarations.push((property.trim().to_ascii_lowercase(), value.trim().to_string()));
            }
            None if policy == StylePolicy::Strict => {
                return Err(Error::MarkupParse(format!(
                    "style declaration '{}' has no ':' separator",
                    token
                )));
            }
            None => tracing::debug!(token, "skipping malformed style declaration"),
        }
    }

    Ok(InlineStyle { declarations })
}

/// Parse a `#RRGGBB` color. Other color syntaxes are not interpreted.
pub fn parse_color(value: &str) -> Option<Rgb> {
    Rgb::from_hex(value)
}
