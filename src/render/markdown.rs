//! Markdown renderer implementation.

use crate::error::Result;
use crate::model::{DeckOutline, ParagraphProjection, SlideOutline, StyledRun};

use super::options::RenderOptions;

/// Convert a deck to Markdown.
///
/// Each slide becomes a `## Slide N: <layout>` section holding its
/// paragraphs in placeholder claim order, indented by outline level.
pub fn to_markdown(deck: &DeckOutline, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    if options.include_frontmatter {
        output.push_str(&render_frontmatter(deck));
    }

    for (i, slide) in deck.slides.iter().enumerate() {
        if i > 0 {
            output.push_str("\n---\n\n");
        }
        output.push_str(&render_slide(slide, options));
    }

    Ok(output.trim().to_string())
}

fn render_frontmatter(deck: &DeckOutline) -> String {
    let mut fm = String::from("---\n");
    let meta = &deck.metadata;

    if let Some(ref title) = meta.title {
        fm.push_str(&format!("title: \"{}\"\n", escape_yaml(title)));
    }
    fm.push_str(&format!("theme: {}\n", meta.theme));
    fm.push_str(&format!("slides: {}\n", deck.slides.len()));

    fm.push_str("---\n\n");
    fm
}

/// Escape special characters in YAML strings.
fn escape_yaml(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn render_slide(slide: &SlideOutline, options: &RenderOptions) -> String {
    let mut output = format!("## Slide {}: {}\n\n", slide.index + 1, slide.layout);

    for placeholder in &slide.placeholders {
        for para in &placeholder.paragraphs {
            let md = render_paragraph(para, options);
            if md.trim().is_empty() && !options.include_empty_paragraphs {
                continue;
            }
            output.push_str(&md);
            if options.paragraph_spacing {
                output.push_str("\n\n");
            } else {
                output.push('\n');
            }
        }
    }

    if options.include_notes {
        if let Some(ref notes) = slide.notes {
            output.push_str("> **Notes:**\n");
            for line in notes.lines().filter(|l| !l.trim().is_empty()) {
                output.push_str(&format!("> {}\n", line.trim()));
            }
            output.push('\n');
        }
    }

    output
}

/// Render a paragraph to Markdown.
fn render_paragraph(para: &ParagraphProjection, options: &RenderOptions) -> String {
    let mut output = options.indent(para.level);
    for run in &para.runs {
        output.push_str(&render_run(run, options));
    }
    output
}

/// Render a styled run to Markdown.
fn render_run(run: &StyledRun, options: &RenderOptions) -> String {
    if run.text.is_empty() {
        return String::new();
    }

    let mut text = if options.escape_special_chars {
        escape_markdown(&run.text)
    } else {
        run.text.clone()
    };

    // Innermost first
    if run.style.underline {
        text = format!("<u>{}</u>", text);
    }
    if run.style.bold && run.style.italic {
        text = format!("***{}***", text);
    } else if run.style.bold {
        text = format!("**{}**", text);
    } else if run.style.italic {
        text = format!("*{}*", text);
    }

    if let Some(ref url) = run.hyperlink {
        text = format!("[{}]({})", text, url);
    }

    text
}

/// Escape Markdown special characters.
///
/// `\`, `` ` `` and `|` are always escaped. `*` and `_` are escaped only
/// where they could open or close emphasis, i.e. not next to whitespace,
/// brackets or the ends of the string.
fn escape_markdown(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        match c {
            '\\' | '`' | '|' => {
                result.push('\\');
                result.push(c);
            }
            '*' | '_' => {
                let prev = if i > 0 { Some(chars[i - 1]) } else { None };
                let next = chars.get(i + 1).copied();

                let after_opener = prev.is_none_or(|p| {
                    matches!(p, '(' | '[' | '{' | ':' | '-' | '/' | '\\') || p.is_whitespace()
                });
                let before_closer = next.is_none_or(|n| {
                    matches!(n, ')' | ']' | '}' | ':' | '-' | '/' | '\\') || n.is_whitespace()
                });

                if !(after_opener || before_closer) {
                    result.push('\\');
                }
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
