//! Best-effort assembly of a presentation request onto a render target.
//!
//! The [`Assembler`] walks the request in order, resolves every layout and
//! placeholder against the registry, projects every content string, and
//! hands the results to a [`RenderTarget`]. A failure is confined to the
//! smallest unit it affects: an unresolvable layout skips its slide, an
//! unresolvable placeholder skips that placeholder, unparseable markup
//! skips that paragraph. Every skip is logged and recorded in the
//! [`AssemblyReport`]. With [`AssemblyOptions::fail_fast`] the first failure
//! aborts instead.
//!
//! # Example
//!
//! ```
//! use deckgen::assemble::{assemble_outline, AssemblyOptions};
//! use deckgen::layout::{LayoutRegistry, LayoutTemplate};
//! use deckgen::PresentationSpec;
//!
//! let template = LayoutTemplate::from_yaml_str(r#"
//! Title:
//!   alias: Title
//!   index: { light: 0, dark: 1 }
//!   placeholders:
//!     0: { alias: Title, place_holder_index: { light: 0, dark: 0 } }
//! "#)?;
//! let registry = LayoutRegistry::build(&template)?;
//!
//! let spec = PresentationSpec::from_json(r#"{
//!     "filename": "demo",
//!     "theme_mode": "dark",
//!     "slides": [
//!         { "layout": "title", "placeholders": [
//!             { "placeholder_name": "Title", "content": ["<span style=\"font-weight:bold\">Hello</span>"] },
//!             { "placeholder_name": "Subtitle", "content": ["missing"] }
//!         ] }
//!     ]
//! }"#)?;
//!
//! let (deck, report) = assemble_outline(&registry, &spec, AssemblyOptions::default())?;
//! assert_eq!(deck.slides[0].layout_index, 1);
//! assert_eq!(report.skipped.len(), 1);
//! # Ok::<(), deckgen::Error>(())
//! ```

mod outline;

pub use outline::OutlineTarget;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::layout::{resolve_layout, resolve_placeholder, LayoutRegistry, SlotIndex};
use crate::markup::{project_markup_with, ProjectOptions};
use crate::model::{DeckOutline, ParagraphProjection, PresentationSpec, SlideSpec, Theme};

/// A slide layout resolved for the request's theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLayout {
    /// Canonical layout alias
    pub alias: String,
    /// Position in the template's layout collection
    pub layout_index: u32,
    /// Theme the index was resolved for
    pub theme: Theme,
}

/// Rendering adapter: writes resolved slides into a concrete document.
///
/// Calls arrive in document order: `add_slide` opens a slide, the other
/// methods act on the most recently added one. An adapter may refuse an
/// operation (for example a slot its layout does not have) by returning an
/// error; the assembler then skips the affected unit.
pub trait RenderTarget {
    /// Append a slide using the given layout.
    fn add_slide(&mut self, layout: &ResolvedLayout) -> Result<()>;

    /// Claim a placeholder slot and remove its template text.
    fn clear_placeholder(&mut self, slot: SlotIndex) -> Result<()>;

    /// Append a paragraph to a claimed slot.
    fn push_paragraph(&mut self, slot: SlotIndex, paragraph: &ParagraphProjection) -> Result<()>;

    /// Set the slide's speaker notes.
    fn set_speaker_notes(&mut self, notes: &str) -> Result<()>;
}

/// Assembly options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Abort on the first failure instead of skipping
    pub fail_fast: bool,

    /// Markup projection options
    pub markup: ProjectOptions,
}

impl AssemblyOptions {
    /// Create options with defaults (best effort, lenient markup).
    pub fn new() -> Self {
        Self::default()
    }

    /// Abort on the first failure.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set markup projection options.
    pub fn with_markup(mut self, markup: ProjectOptions) -> Self {
        self.markup = markup;
        self
    }
}

/// One unit left out of the assembled deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedItem {
    /// 1-based slide position in the request
    pub slide: usize,
    /// Placeholder name, when the skip is below slide level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    /// 1-based paragraph position, when a single paragraph was skipped
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<usize>,
    /// Error message
    pub reason: String,
}

impl SkippedItem {
    fn slide(slide: usize, err: &Error) -> Self {
        Self {
            slide,
            placeholder: None,
            paragraph: None,
            reason: err.to_string(),
        }
    }

    fn placeholder(slide: usize, placeholder: &str, err: &Error) -> Self {
        Self {
            placeholder: Some(placeholder.to_string()),
            ..Self::slide(slide, err)
        }
    }

    fn paragraph(slide: usize, placeholder: &str, paragraph: usize, err: &Error) -> Self {
        Self {
            paragraph: Some(paragraph),
            ..Self::placeholder(slide, placeholder, err)
        }
    }
}

impl std::fmt::Display for SkippedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "slide {}", self.slide)?;
        if let Some(placeholder) = &self.placeholder {
            write!(f, ", placeholder '{}'", placeholder)?;
        }
        if let Some(paragraph) = self.paragraph {
            write!(f, ", paragraph {}", paragraph)?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Outcome of an assembly run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyReport {
    /// Slides added to the target
    pub slides_built: usize,
    /// Everything that was left out
    pub skipped: Vec<SkippedItem>,
}

impl AssemblyReport {
    /// Check if nothing was skipped.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Drives a [`RenderTarget`] from a presentation request.
#[derive(Debug, Clone, Copy)]
pub struct Assembler<'r> {
    registry: &'r LayoutRegistry,
    options: AssemblyOptions,
}

impl<'r> Assembler<'r> {
    /// Create an assembler over a registry with default options.
    pub fn new(registry: &'r LayoutRegistry) -> Self {
        Self {
            registry,
            options: AssemblyOptions::default(),
        }
    }

    /// Set the assembly options.
    pub fn with_options(mut self, options: AssemblyOptions) -> Self {
        self.options = options;
        self
    }

    /// Assemble the request onto the target.
    ///
    /// Only an invalid request, an unrecoverable target failure (such as
    /// I/O), or any failure under `fail_fast` is returned as an error.
    pub fn assemble<T>(&self, spec: &PresentationSpec, target: &mut T) -> Result<AssemblyReport>
    where
        T: RenderTarget + ?Sized,
    {
        spec.validate()?;

        let mut report = AssemblyReport::default();
        for (i, slide) in spec.slides.iter().enumerate() {
            let position = i + 1;
            let layout = match self.resolve_slide(slide, spec.theme_mode) {
                Ok(layout) => layout,
                Err(err) => {
                    self.skip(&mut report, SkippedItem::slide(position, &err), err)?;
                    continue;
                }
            };
            if let Err(err) = target.add_slide(&layout) {
                self.skip(&mut report, SkippedItem::slide(position, &err), err)?;
                continue;
            }
            report.slides_built += 1;

            self.fill_slide(position, slide, &layout, spec.theme_mode, target, &mut report)?;
        }

        tracing::info!(
            filename = %spec.filename,
            slides = report.slides_built,
            skipped = report.skipped.len(),
            "assembled presentation"
        );
        Ok(report)
    }

    fn resolve_slide(&self, slide: &SlideSpec, theme: Theme) -> Result<ResolvedLayout> {
        let layout = resolve_layout(&slide.layout, self.registry)?;
        Ok(ResolvedLayout {
            alias: layout.alias().to_string(),
            layout_index: layout.layout_index(theme)?,
            theme,
        })
    }

    fn fill_slide<T>(
        &self,
        position: usize,
        slide: &SlideSpec,
        layout: &ResolvedLayout,
        theme: Theme,
        target: &mut T,
        report: &mut AssemblyReport,
    ) -> Result<()>
    where
        T: RenderTarget + ?Sized,
    {
        let Some(entry) = self.registry.get(&layout.alias) else {
            return Ok(());
        };

        for placeholder in &slide.placeholders {
            let name = placeholder.placeholder_name.as_str();
            let slot = match entry
                .placeholder_index(name, theme)
                .and_then(|slot| target.clear_placeholder(slot).map(|_| slot))
            {
                Ok(slot) => slot,
                Err(err) => {
                    self.skip(report, SkippedItem::placeholder(position, name, &err), err)?;
                    continue;
                }
            };

            for (j, content) in placeholder.paragraphs().iter().enumerate() {
                let pushed = project_markup_with(content, &self.options.markup)
                    .and_then(|paragraph| target.push_paragraph(slot, &paragraph));
                if let Err(err) = pushed {
                    self.skip(report, SkippedItem::paragraph(position, name, j + 1, &err), err)?;
                }
            }
        }

        if let Some(notes) = slide.speaker_notes.as_deref().filter(|n| !n.trim().is_empty()) {
            if let Err(err) = target.set_speaker_notes(notes) {
                self.skip(report, SkippedItem::slide(position, &err), err)?;
            }
        }

        Ok(())
    }

    fn skip(&self, report: &mut AssemblyReport, item: SkippedItem, err: Error) -> Result<()> {
        if self.options.fail_fast || !err.is_recoverable() {
            return Err(err);
        }
        tracing::warn!(skipped = %item, "skipping");
        report.skipped.push(item);
        Ok(())
    }
}

/// Assemble a request into an in-memory [`DeckOutline`].
pub fn assemble_outline(
    registry: &LayoutRegistry,
    spec: &PresentationSpec,
    options: AssemblyOptions,
) -> Result<(DeckOutline, AssemblyReport)> {
    let mut target = OutlineTarget::for_spec(spec);
    let report = Assembler::new(registry)
        .with_options(options)
        .assemble(spec, &mut target)?;
    Ok((target.into_outline(), report))
}
