//! Plain text renderer implementation.

use crate::error::Result;
use crate::model::DeckOutline;

use super::options::RenderOptions;

/// Convert a deck to plain text.
pub fn to_text(deck: &DeckOutline, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    for (i, slide) in deck.slides.iter().enumerate() {
        if i > 0 && options.paragraph_spacing {
            output.push('\n');
        }
        output.push_str(&format!("Slide {}: {}\n", slide.index + 1, slide.layout));

        for para in slide.placeholders.iter().flat_map(|p| &p.paragraphs) {
            let text = para.plain_text();
            if text.trim().is_empty() && !options.include_empty_paragraphs {
                continue;
            }
            output.push_str(&options.indent(para.level));
            output.push_str(&text);
            output.push('\n');
        }

        if options.include_notes {
            if let Some(ref notes) = slide.notes {
                output.push_str("Notes:\n");
                for line in notes.lines() {
                    output.push_str(line.trim_end());
                    output.push('\n');
                }
            }
        }
    }

    Ok(output.trim().to_string())
}
