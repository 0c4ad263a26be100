//! Catalogue of described layouts for briefing content authors.
//!
//! Only layouts with a non-blank description are listed, keyed by alias, in
//! template order. A layout without placeholders is listed with the literal
//! `"none"`; otherwise its described placeholders are listed by alias.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::template::LayoutTemplate;
use crate::error::{Error, Result};

/// Placeholders listed for one catalogue layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CataloguePlaceholders {
    /// The layout declares no placeholders
    None,
    /// Described placeholders as (alias, description)
    Described(Vec<(String, String)>),
}

impl Serialize for CataloguePlaceholders {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            CataloguePlaceholders::None => serializer.serialize_str("none"),
            CataloguePlaceholders::Described(items) => {
                let mut map = serializer.serialize_map(Some(items.len()))?;
                for (alias, description) in items {
                    map.serialize_entry(alias, description)?;
                }
                map.end()
            }
        }
    }
}

/// One described layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogueEntry {
    /// What the layout is for
    pub description: String,
    /// Its described placeholders
    pub placeholders: CataloguePlaceholders,
}

/// Described layouts keyed by alias, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutCatalogue {
    entries: Vec<(String, CatalogueEntry)>,
}

impl Serialize for LayoutCatalogue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (alias, entry) in &self.entries {
            map.serialize_entry(alias, entry)?;
        }
        map.end()
    }
}

impl LayoutCatalogue {
    /// Collect the described layouts of a template.
    ///
    /// Layouts without an alias are skipped; the registry build is where
    /// such entries are reported.
    pub fn from_template(template: &LayoutTemplate) -> Self {
        let mut entries = Vec::new();

        for (_, layout) in template.layouts() {
            let (Some(description), Some(alias)) = (layout.described(), layout.alias.as_deref())
            else {
                continue;
            };

            let placeholders = if layout.placeholders.is_empty() {
                CataloguePlaceholders::None
            } else {
                let described = layout
                    .placeholders
                    .iter()
                    .filter_map(|(_, p)| {
                        let description = p.description.as_deref()?.trim();
                        if description.is_empty() {
                            return None;
                        }
                        Some((p.alias.clone()?, description.to_string()))
                    })
                    .collect();
                CataloguePlaceholders::Described(described)
            };

            entries.push((
                alias.to_string(),
                CatalogueEntry {
                    description: description.to_string(),
                    placeholders,
                },
            ));
        }

        Self { entries }
    }

    /// Get an entry by layout alias.
    pub fn get(&self, alias: &str) -> Option<&CatalogueEntry> {
        self.entries.iter().find(|(a, _)| a == alias).map(|(_, e)| e)
    }

    /// Iterate entries in template order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogueEntry)> {
        self.entries.iter().map(|(a, e)| (a.as_str(), e))
    }

    /// Number of described layouts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no layout is described.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render as pretty-printed JSON (4-space indentation).
    pub fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))?;
        String::from_utf8(out).map_err(|e| Error::Render(e.to_string()))
    }

    /// Render as compact JSON.
    pub fn to_json_compact(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }
}
