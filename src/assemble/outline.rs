use super::{RenderTarget, ResolvedLayout};
use crate::error::{Error, Result};
use crate::layout::SlotIndex;
use crate::model::{DeckMetadata, DeckOutline, ParagraphProjection, PresentationSpec, SlideOutline};

/// In-memory render target that records a [`DeckOutline`].
///
/// Every slot is accepted; it is up to a real document adapter to refuse
/// slots its layout does not have.
#[derive(Debug, Clone, Default)]
pub struct OutlineTarget {
    deck: DeckOutline,
}

impl OutlineTarget {
    /// Create an empty target.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a target whose metadata is taken from a request.
    pub fn for_spec(spec: &PresentationSpec) -> Self {
        Self {
            deck: DeckOutline {
                metadata: DeckMetadata {
                    title: Some(spec.filename.clone()),
                    theme: spec.theme_mode,
                },
                slides: Vec::new(),
            },
        }
    }

    /// The outline recorded so far.
    pub fn outline(&self) -> &DeckOutline {
        &self.deck
    }

    /// Consume the target and return the outline.
    pub fn into_outline(self) -> DeckOutline {
        self.deck
    }

    fn current(&mut self) -> Result<&mut SlideOutline> {
        self.deck
            .slides
            .last_mut()
            .ok_or_else(|| Error::Render("no slide has been added".to_string()))
    }
}

impl RenderTarget for OutlineTarget {
    fn add_slide(&mut self, layout: &ResolvedLayout) -> Result<()> {
        self.deck.metadata.theme = layout.theme;
        let index = self.deck.slides.len();
        self.deck
            .add_slide(SlideOutline::new(index, layout.alias.clone(), layout.layout_index));
        Ok(())
    }

    fn clear_placeholder(&mut self, slot: SlotIndex) -> Result<()> {
        self.current()?.placeholder_mut(slot).paragraphs.clear();
        Ok(())
    }

    fn push_paragraph(&mut self, slot: SlotIndex, paragraph: &ParagraphProjection) -> Result<()> {
        self.current()?
            .placeholder_mut(slot)
            .paragraphs
            .push(paragraph.clone());
        Ok(())
    }

    fn set_speaker_notes(&mut self, notes: &str) -> Result<()> {
        self.current()?.notes = Some(notes.to_string());
        Ok(())
    }
}
