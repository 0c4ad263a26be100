//! Slide layout discovery in a `.pptx` template.
//!
//! Lists the layouts of the first slide master in collection order, which is
//! the order layout indices in a layout template refer to, and derives a
//! skeleton template from them that only needs aliases and descriptions
//! filled in by hand.

use std::collections::BTreeMap;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use serde::Serialize;

use super::template::{LayoutTemplate, TemplateLayout, TemplatePlaceholder};
use crate::container::TemplatePackage;
use crate::error::{Error, Result};
use crate::model::Theme;

/// Theme family a layout belongs to, judged by its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Light,
    Dark,
    /// Theme-neutral; usable with every theme
    Normal,
}

impl LayoutMode {
    /// Classify a layout by its name prefix.
    pub fn from_layout_name(name: &str) -> Self {
        let lower = name.trim_start().to_lowercase();
        if lower.starts_with("dark") {
            LayoutMode::Dark
        } else if lower.starts_with("light") {
            LayoutMode::Light
        } else {
            LayoutMode::Normal
        }
    }

    /// Themes this mode provides a variant for.
    pub fn themes(&self) -> &'static [Theme] {
        match self {
            LayoutMode::Light => &[Theme::Light],
            LayoutMode::Dark => &[Theme::Dark],
            LayoutMode::Normal => Theme::all(),
        }
    }
}

/// Layout name without its theme prefix or the separators around it.
///
/// `"Light - Title/Subtitle"` becomes `"Title/Subtitle"`.
pub fn short_name(name: &str) -> String {
    let trimmed = name.trim_start();
    let rest = ["light", "dark"]
        .iter()
        .find_map(|prefix| {
            trimmed
                .get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(prefix))
                .map(|_| &trimmed[prefix.len()..])
        })
        .unwrap_or(trimmed);
    rest.trim_matches(|c: char| c == ' ' || c == '-').to_string()
}

/// A placeholder shape of a slide layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderInfo {
    /// Position among the layout's placeholders
    pub position: usize,
    /// Placeholder `idx` (what a layout template refers to)
    pub idx: u32,
    /// Placeholder type (`title`, `body`, `obj`, ...)
    pub kind: String,
    /// Shape name
    pub name: String,
    /// Shape id
    pub shape_id: u32,
}

/// A slide layout of the template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutInfo {
    /// Position in the layout collection
    pub index: usize,
    /// Layout name as authored
    pub name: String,
    /// Theme family
    pub mode: LayoutMode,
    /// Name without theme prefix
    pub short_name: String,
    /// Placeholder shapes in document order
    pub placeholders: Vec<PlaceholderInfo>,
}

/// List the slide layouts of a `.pptx` file.
pub fn inspect_pptx(path: impl AsRef<Path>) -> Result<Vec<LayoutInfo>> {
    inspect_package(&TemplatePackage::open(path)?)
}

/// List the slide layouts of an in-memory `.pptx`.
pub fn inspect_pptx_bytes(data: Vec<u8>) -> Result<Vec<LayoutInfo>> {
    inspect_package(&TemplatePackage::from_bytes(data)?)
}

/// List the slide layouts of the package's first slide master.
pub fn inspect_package(package: &TemplatePackage) -> Result<Vec<LayoutInfo>> {
    const PRESENTATION: &str = "ppt/presentation.xml";

    if !package.exists(PRESENTATION) {
        return Err(Error::MissingComponent(format!(
            "{} (not a presentation package)",
            PRESENTATION
        )));
    }
    let presentation = package.read_xml(PRESENTATION)?;
    let master_rel = relationship_ids(&presentation, b"sldMasterId")?
        .into_iter()
        .next()
        .ok_or_else(|| Error::MissingComponent("slide master".to_string()))?;
    let rels = package.read_relationships(PRESENTATION)?;
    let master_path = rels
        .get(&master_rel)
        .map(|r| TemplatePackage::resolve_path(PRESENTATION, &r.target))
        .ok_or_else(|| Error::MissingComponent(format!("relationship {}", master_rel)))?;

    let master = package.read_xml(&master_path)?;
    let master_rels = package.read_relationships(&master_path)?;

    let mut layouts = Vec::new();
    for rel_id in relationship_ids(&master, b"sldLayoutId")? {
        let Some(rel) = master_rels.get(&rel_id) else {
            tracing::warn!(rel_id, master = %master_path, "dangling slide layout relationship");
            continue;
        };
        let layout_path = TemplatePackage::resolve_path(&master_path, &rel.target);
        let xml = package.read_xml(&layout_path)?;
        let (name, placeholders) = parse_layout(&xml)?;

        layouts.push(LayoutInfo {
            index: layouts.len(),
            mode: LayoutMode::from_layout_name(&name),
            short_name: short_name(&name),
            name,
            placeholders,
        });
    }

    tracing::info!(layouts = layouts.len(), master = %master_path, "inspected template");
    Ok(layouts)
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.as_ref() == key)
        .map(|a| match a.unescape_value() {
            Ok(v) => v.into_owned(),
            Err(_) => String::from_utf8_lossy(&a.value).into_owned(),
        })
}

/// The `r:id` of an element (any prefix bound to the `id` local name).
fn relationship_attr(e: &BytesStart<'_>) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| a.key.prefix().is_some() && a.key.local_name().as_ref() == b"id")
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

fn relationship_ids(xml: &str, element: &[u8]) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if e.local_name().as_ref() == element => {
                if let Some(id) = relationship_attr(&e) {
                    ids.push(id);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

fn parse_layout(xml: &str) -> Result<(String, Vec<PlaceholderInfo>)> {
    let mut name = String::new();
    let mut placeholders = Vec::new();
    let mut shape: Option<(u32, String)> = None;

    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"cSld" => {
                    name = attr_value(&e, b"name").unwrap_or_default();
                }
                b"cNvPr" => {
                    let id = attr_value(&e, b"id")
                        .and_then(|v| v.trim().parse().ok())
                        .unwrap_or_default();
                    shape = Some((id, attr_value(&e, b"name").unwrap_or_default()));
                }
                b"ph" => {
                    if let Some((shape_id, shape_name)) = shape.take() {
                        placeholders.push(PlaceholderInfo {
                            position: placeholders.len(),
                            idx: attr_value(&e, b"idx")
                                .and_then(|v| v.trim().parse().ok())
                                .unwrap_or(0),
                            kind: attr_value(&e, b"type").unwrap_or_else(|| "obj".to_string()),
                            name: shape_name,
                            shape_id,
                        });
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlParse(e.to_string())),
            _ => {}
        }
        buf.clear();
    }

    Ok((name, placeholders))
}

/// Derive a layout template from inspected layouts.
///
/// Layouts sharing a short name become one entry whose alias is the short
/// name; each variant contributes its index under its theme(s). Placeholders
/// are matched across variants by position and aliased by shape name.
/// Descriptions are left blank, so nothing is listed in the catalogue until
/// someone writes them.
pub fn skeleton_template(layouts: &[LayoutInfo]) -> LayoutTemplate {
    let mut template = LayoutTemplate::new();

    for layout in layouts {
        let themes = layout.mode.themes();
        let index = i64::try_from(layout.index).unwrap_or(i64::MAX);

        if template.get(&layout.short_name).is_none() {
            template.insert(
                layout.short_name.clone(),
                TemplateLayout {
                    alias: Some(layout.short_name.clone()),
                    index: Some(BTreeMap::new()),
                    layout_name: Some(BTreeMap::new()),
                    description: Some(String::new()),
                    ..Default::default()
                },
            );
        }
        let Some(entry) = template.get_mut(&layout.short_name) else {
            continue;
        };

        for theme in themes {
            let key = theme.as_str().to_string();
            entry.index.get_or_insert_with(BTreeMap::new).insert(key.clone(), index);
            entry
                .layout_name
                .get_or_insert_with(BTreeMap::new)
                .insert(key, layout.name.clone());
        }

        for placeholder in &layout.placeholders {
            let position = placeholder.position.to_string();
            if entry.placeholders.get(&position).is_none() {
                entry.placeholders.insert(
                    position.clone(),
                    TemplatePlaceholder {
                        alias: Some(placeholder.name.clone()),
                        name: Some(placeholder.name.clone()),
                        description: Some(String::new()),
                        place_holder_index: Some(BTreeMap::new()),
                    },
                );
            }
            if let Some(slot) = entry.placeholders.get_mut(&position) {
                let table = slot.place_holder_index.get_or_insert_with(BTreeMap::new);
                for theme in themes {
                    table.insert(theme.as_str().to_string(), i64::from(placeholder.idx));
                }
            }
        }
    }

    template
}
