//! Layout template as authored on disk.
//!
//! The template is a mapping from an arbitrary key to a layout description:
//!
//! ```yaml
//! Title:
//!   alias: Title
//!   index: { light: 0, dark: 21 }
//!   description: Opening slide with deck title
//!   placeholders:
//!     0:
//!       alias: Title
//!       description: Deck title
//!       place_holder_index: { light: 0, dark: 0 }
//! ```
//!
//! Fields are kept optional here so that a missing key surfaces as a
//! [`Error::Configuration`] naming the offending entry when the registry is
//! built, rather than as an opaque deserializer message. Document order is
//! preserved because fuzzy layout matching depends on it.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Theme key to position, as written in the template.
pub type ThemeIndexTable = BTreeMap<String, i64>;

/// Mapping that keeps its entries in document order.
///
/// Keys may be strings or integers in the source; integers are kept in
/// their decimal form. A sequence is accepted too and keyed by position.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing an existing entry with the same key in place.
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Get a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Get a mutable value by key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Iterate entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum KeyRepr {
    Text(String),
    Int(i64),
}

impl From<KeyRepr> for String {
    fn from(key: KeyRepr) -> Self {
        match key {
            KeyRepr::Text(s) => s,
            KeyRepr::Int(n) => n.to_string(),
        }
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping or a sequence")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<KeyRepr, V>()? {
            map.entries.push((key.into(), value));
        }
        Ok(map)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some(value) = access.next_element::<V>()? {
            let key = map.entries.len().to_string();
            map.entries.push((key, value));
        }
        Ok(map)
    }

    fn visit_unit<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(OrderedMap::new())
    }

    fn visit_none<E: serde::de::Error>(self) -> std::result::Result<Self::Value, E> {
        Ok(OrderedMap::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(OrderedMapVisitor(PhantomData))
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// One placeholder of a template layout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplatePlaceholder {
    /// Logical placeholder name used by requests
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Shape name in the source presentation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// What content belongs here (shown to content authors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Placeholder `idx` per theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_holder_index: Option<ThemeIndexTable>,
}

/// One layout of the template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateLayout {
    /// Canonical logical name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,

    /// Position in the layout collection per theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<ThemeIndexTable>,

    /// Layout name in the source presentation per theme
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_name: Option<BTreeMap<String, String>>,

    /// What the layout is for (shown to content authors)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Placeholders keyed by position
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub placeholders: OrderedMap<TemplatePlaceholder>,
}

impl TemplateLayout {
    /// Description with surrounding whitespace removed, if non-blank.
    pub fn described(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// A complete layout template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTemplate {
    layouts: OrderedMap<TemplateLayout>,
}

impl LayoutTemplate {
    /// Create an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a template from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::Configuration(format!("invalid layout template: {}", e)))
    }

    /// Parse a template from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::Configuration(format!("invalid layout template: {}", e)))
    }

    /// Load a template file, choosing the syntax by extension.
    ///
    /// `.json` is read as JSON; anything else as YAML.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deckgen::layout::LayoutTemplate;
    ///
    /// let template = LayoutTemplate::load("assets/layouts_template.yaml")?;
    /// println!("{} layouts", template.len());
    /// # Ok::<(), deckgen::Error>(())
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        Self::parse_for_path(path, &content)
    }

    /// Load a template file without blocking the runtime.
    #[cfg(feature = "async")]
    pub async fn load_async(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse_for_path(path, &content)
    }

    fn parse_for_path(path: &Path, content: &str) -> Result<Self> {
        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(content)
        } else {
            Self::from_yaml_str(content)
        }
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::Render(format!("YAML serialization error: {}", e)))
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
    }

    /// Add or replace a layout.
    pub fn insert(&mut self, key: impl Into<String>, layout: TemplateLayout) {
        self.layouts.insert(key, layout);
    }

    /// Get a layout by template key.
    pub fn get(&self, key: &str) -> Option<&TemplateLayout> {
        self.layouts.get(key)
    }

    /// Get a mutable layout by template key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut TemplateLayout> {
        self.layouts.get_mut(key)
    }

    /// Iterate layouts in document order.
    pub fn layouts(&self) -> impl Iterator<Item = (&str, &TemplateLayout)> {
        self.layouts.iter()
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    /// Check if the template has no layouts.
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML: &str = r#"
Title:
  alias: Title
  index: { light: 0, dark: 21 }
  description: Opening slide
  disabled: false
  placeholders:
    0:
      alias: Title
      name: Title 1
      description: Deck title
      place_holder_index: { light: 0, dark: 0 }
    1:
      alias: Subtitle
      place_holder_index: { light: 1 }
Agenda:
  alias: Agenda
  index: { light: 4 }
  placeholders: []
"#;

    #[test]
    fn test_yaml_preserves_order() {
        let template = LayoutTemplate::from_yaml_str(YAML).unwrap();
        let keys: Vec<&str> = template.layouts().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Title", "Agenda"]);

        let title = template.get("Title").unwrap();
        let placeholder_keys: Vec<&str> = title.placeholders.iter().map(|(k, _)| k).collect();
        assert_eq!(placeholder_keys, ["0", "1"]);
        assert_eq!(title.described(), Some("Opening slide"));
        assert_eq!(title.index.as_ref().unwrap()["dark"], 21);

        let agenda = template.get("Agenda").unwrap();
        assert!(agenda.placeholders.is_empty());
        assert!(agenda.described().is_none());
    }

    #[test]
    fn test_json_template() {
        let json = r#"{
            "Zeta": {"alias": "Zeta", "index": {"light": 1}},
            "Alpha": {"alias": "Alpha", "index": {"light": 0},
                      "placeholders": {"0": {"alias": "Body", "place_holder_index": {"light": 10}}}}
        }"#;
        let template = LayoutTemplate::from_json_str(json).unwrap();
        let keys: Vec<&str> = template.layouts().map(|(k, _)| k).collect();
        assert_eq!(keys, ["Zeta", "Alpha"]);
    }

    #[test]
    fn test_invalid_yaml_is_configuration_error() {
        let err = LayoutTemplate::from_yaml_str("Title: [unclosed").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_order() {
        let template = LayoutTemplate::from_yaml_str(YAML).unwrap();
        let yaml = template.to_yaml().unwrap();
        assert!(yaml.find("Title:").unwrap() < yaml.find("Agenda:").unwrap());
        let reparsed = LayoutTemplate::from_yaml_str(&yaml).unwrap();
        assert_eq!(reparsed, template);
    }

    #[test]
    fn test_ordered_map_insert_replaces_in_place() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        map.insert("a", 3);
        let entries: Vec<(&str, &i32)> = map.iter().collect();
        assert_eq!(entries, [("a", &3), ("b", &2)]);
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_load_async_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layouts.yml");
        std::fs::write(&path, YAML).unwrap();
        let template = LayoutTemplate::load_async(&path).await.unwrap();
        assert_eq!(template, LayoutTemplate::from_yaml_str(YAML).unwrap());
    }
}
