//! Projection of one content string onto a paragraph of styled runs.
//!
//! The accepted markup is a small HTML-like subset: an optional
//! `<p level="N">` wrapper around plain text and
//! `<span style="..." data-link="...">` runs. Only one level of runs is
//! interpreted; anything nested deeper contributes its text only.

use super::style::{parse_style, StylePolicy};
use super::tree::{Element, Fragment, Node};
use crate::error::Result;
use crate::model::{ParagraphProjection, StyledRun};

/// Options for markup projection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProjectOptions {
    /// Handling of malformed `style` declarations
    pub style_policy: StylePolicy,
}

impl ProjectOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the style declaration policy.
    pub fn with_style_policy(mut self, policy: StylePolicy) -> Self {
        self.style_policy = policy;
        self
    }

    /// Reject malformed style declarations.
    pub fn strict(self) -> Self {
        self.with_style_policy(StylePolicy::Strict)
    }
}

/// Project a content string with default options.
pub fn project_markup(content: &str) -> Result<ParagraphProjection> {
    project_markup_with(content, &ProjectOptions::default())
}

/// Project a content string.
///
/// - Without any `<p>` or `<span>`, the result is one unstyled run over the
///   tag-stripped text.
/// - The first `<p>` (at any depth) supplies the outline level from its
///   `level` attribute, when that parses as an integer in `0..=255` (any
///   other value leaves the level unset), and is then replaced by its
///   children. Later `<p>` elements are left as
///   they are.
/// - If a `<span>` exists anywhere, every top-level node becomes one run:
///   text as is, a `<span>` styled from its `style` and `data-link`
///   attributes, any other element unstyled over its text.
/// - Otherwise the result is one unstyled run over the unwrapped text.
pub fn project_markup_with(content: &str, options: &ProjectOptions) -> Result<ParagraphProjection> {
    let mut fragment = Fragment::parse(content);
    let has_p = fragment.contains("p");
    let has_span = fragment.contains("span");

    if !has_p && !has_span {
        return Ok(ParagraphProjection::with_text(fragment.text()));
    }

    let mut projection = ParagraphProjection::new();

    if let Some(attrs) = fragment.unwrap_first("p") {
        projection.level = attrs
            .iter()
            .find(|(k, _)| k == "level")
            .and_then(|(_, v)| parse_level(v));
    }

    if !has_span {
        projection.add_run(StyledRun::plain(fragment.text()));
        return Ok(projection);
    }

    for node in fragment.nodes() {
        let run = match node {
            Node::Text(text) => StyledRun::plain(text.clone()),
            Node::Element(e) if e.name == "span" => span_run(e, options)?,
            Node::Element(e) => StyledRun::plain(e.text()),
        };
        projection.add_run(run);
    }

    Ok(projection)
}

fn parse_level(value: &str) -> Option<u8> {
    match value.trim().parse() {
        Ok(level) => Some(level),
        Err(_) => {
            tracing::debug!(value, "ignoring paragraph level that is not an integer in 0..=255");
            None
        }
    }
}

fn span_run(span: &Element, options: &ProjectOptions) -> Result<StyledRun> {
    let style = match span.attr("style") {
        Some(style) => parse_style(style, options.style_policy)?.run_style(),
        None => Default::default(),
    };

    let mut run = StyledRun::styled(span.text(), style);
    run.hyperlink = span
        .attr("data-link")
        .map(str::trim)
        .filter(|link| !link.is_empty())
        .map(String::from);
    Ok(run)
}
