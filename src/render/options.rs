//! Rendering options configuration.

/// Options for rendering an assembled deck.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Include YAML frontmatter with deck metadata (Markdown only)
    pub include_frontmatter: bool,

    /// Render speaker notes after each slide
    pub include_notes: bool,

    /// Include paragraphs without visible text
    pub include_empty_paragraphs: bool,

    /// Add blank line between paragraphs
    pub paragraph_spacing: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Spaces of indentation per outline level
    pub indent_width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            include_frontmatter: false,
            include_notes: true,
            include_empty_paragraphs: false,
            paragraph_spacing: true,
            escape_special_chars: true,
            indent_width: 2,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable YAML frontmatter.
    pub fn with_frontmatter(mut self, include: bool) -> Self {
        self.include_frontmatter = include;
        self
    }

    /// Render or omit speaker notes.
    pub fn with_notes(mut self, include: bool) -> Self {
        self.include_notes = include;
        self
    }

    /// Keep paragraphs without visible text.
    pub fn with_empty_paragraphs(mut self, include: bool) -> Self {
        self.include_empty_paragraphs = include;
        self
    }

    /// Set indentation per outline level (at most 8 spaces).
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width.min(8);
        self
    }

    pub(crate) fn indent(&self, level: Option<u8>) -> String {
        " ".repeat(self.indent_width * usize::from(level.unwrap_or(0)))
    }
}
