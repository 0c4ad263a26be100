//! Layout registry and name resolution.
//!
//! The registry is a reverse index built once from a [`LayoutTemplate`]:
//! canonical layout alias to per-theme layout positions, and per layout,
//! placeholder alias to per-theme placeholder indices. It is immutable after
//! construction and can be shared freely across threads.
//!
//! Caller-supplied layout names are resolved in three passes, first match
//! wins:
//!
//! 1. exact alias;
//! 2. underscores replaced by `/`, surrounding whitespace trimmed;
//! 3. fuzzy: whitespace, `_` and `/` removed, case folded.
//!
//! # Example
//!
//! ```
//! use deckgen::layout::{build_registry, resolve_layout, resolve_placeholder, LayoutTemplate};
//! use deckgen::Theme;
//!
//! let template = LayoutTemplate::from_yaml_str(r#"
//! Title/Only:
//!   alias: Title/Only
//!   index: { light: 2, dark: 9 }
//!   placeholders:
//!     0: { alias: Title, place_holder_index: { light: 0, dark: 0 } }
//! "#)?;
//! let registry = build_registry(&template)?;
//!
//! let layout = resolve_layout("TITLE ONLY", &registry)?;
//! assert_eq!(layout.alias(), "Title/Only");
//! assert_eq!(layout.layout_index(Theme::Dark)?, 9);
//! assert_eq!(resolve_placeholder(&layout, "Title", Theme::Light)?, 0);
//! # Ok::<(), deckgen::Error>(())
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use unicode_normalization::UnicodeNormalization;

use super::template::{LayoutTemplate, ThemeIndexTable};
use crate::error::{Error, Result};
use crate::model::Theme;

/// Placeholder index within a slide layout.
pub type SlotIndex = u32;

/// What to do when a fuzzy name collapses onto several layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MatchPolicy {
    /// Take the first candidate in template order (logged as a warning)
    #[default]
    FirstWins,
    /// Fail with [`Error::AmbiguousLayout`]
    Strict,
}

/// Which resolution pass matched a layout name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// The name was a canonical alias
    Exact,
    /// The name matched after underscore/slash normalization
    Normalized,
    /// The name matched after separator and case folding
    Fuzzy,
}

/// Canonical identity of one logical layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutRegistryEntry {
    /// Canonical alias
    pub alias: String,
    /// Layout position per theme
    pub layout_index: BTreeMap<Theme, u32>,
    /// Placeholder alias to placeholder index per theme
    pub placeholders: BTreeMap<String, BTreeMap<Theme, SlotIndex>>,
}

impl LayoutRegistryEntry {
    /// Layout position for a theme.
    pub fn layout_index(&self, theme: Theme) -> Result<u32> {
        self.layout_index
            .get(&theme)
            .copied()
            .ok_or_else(|| Error::UnknownTheme {
                layout: self.alias.clone(),
                placeholder: None,
                theme,
            })
    }

    /// Placeholder index for a theme.
    ///
    /// A placeholder that exists for another theme only is an
    /// [`Error::UnknownTheme`]; the other theme's index is never substituted.
    pub fn placeholder_index(&self, placeholder: &str, theme: Theme) -> Result<SlotIndex> {
        let variants = self
            .placeholders
            .get(placeholder)
            .ok_or_else(|| Error::UnknownPlaceholder {
                layout: self.alias.clone(),
                placeholder: placeholder.to_string(),
            })?;
        variants.get(&theme).copied().ok_or_else(|| Error::UnknownTheme {
            layout: self.alias.clone(),
            placeholder: Some(placeholder.to_string()),
            theme,
        })
    }

    /// Placeholder aliases, sorted.
    pub fn placeholder_names(&self) -> Vec<&str> {
        self.placeholders.keys().map(String::as_str).collect()
    }
}

/// A resolved layout.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRef<'a> {
    entry: &'a LayoutRegistryEntry,
    kind: MatchKind,
}

impl<'a> LayoutRef<'a> {
    /// Canonical alias.
    pub fn alias(&self) -> &'a str {
        &self.entry.alias
    }

    /// The registry entry.
    pub fn entry(&self) -> &'a LayoutRegistryEntry {
        self.entry
    }

    /// Which pass matched.
    pub fn match_kind(&self) -> MatchKind {
        self.kind
    }

    /// Layout position for a theme.
    pub fn layout_index(&self, theme: Theme) -> Result<u32> {
        self.entry.layout_index(theme)
    }
}

/// Immutable reverse index over a layout template.
#[derive(Debug, Clone, Default)]
pub struct LayoutRegistry {
    entries: Vec<LayoutRegistryEntry>,
    by_alias: HashMap<String, usize>,
    fuzzy_keys: Vec<String>,
    policy: MatchPolicy,
}

/// Collapse a layout name to its fuzzy form.
///
/// Whitespace, underscores and slashes are dropped and the rest is case
/// folded after NFC normalization.
pub fn fuzzy_key(name: &str) -> String {
    name.nfc()
        .filter(|c| !(c.is_whitespace() || *c == '_' || *c == '/'))
        .flat_map(char::to_lowercase)
        .collect()
}

fn theme_table(table: &ThemeIndexTable, context: &str) -> Result<BTreeMap<Theme, u32>> {
    let mut out = BTreeMap::new();
    for (key, value) in table {
        let theme: Theme = key
            .parse()
            .map_err(|e| Error::Configuration(format!("{}: {}", context, e)))?;
        let index = u32::try_from(*value).map_err(|_| {
            Error::Configuration(format!(
                "{}: index {} for theme '{}' is out of range",
                context, value, key
            ))
        })?;
        out.insert(theme, index);
    }
    if out.is_empty() {
        return Err(Error::Configuration(format!(
            "{}: no theme index declared",
            context
        )));
    }
    Ok(out)
}

impl LayoutRegistry {
    /// Build the registry from a template.
    ///
    /// Fails with [`Error::Configuration`] when a layout lacks `alias` or
    /// `index`, a placeholder lacks `alias` or `place_holder_index`, a theme
    /// key is unknown, an index is negative, or an alias is declared twice.
    pub fn build(template: &LayoutTemplate) -> Result<Self> {
        let mut registry = LayoutRegistry::default();

        for (key, layout) in template.layouts() {
            let alias = layout
                .alias
                .as_deref()
                .filter(|a| !a.trim().is_empty())
                .ok_or_else(|| {
                    Error::Configuration(format!("layout '{}' is missing 'alias'", key))
                })?;
            let context = format!("layout '{}'", alias);

            let index = layout.index.as_ref().ok_or_else(|| {
                Error::Configuration(format!("{} is missing 'index'", context))
            })?;
            let layout_index = theme_table(index, &context)?;

            let mut placeholders = BTreeMap::new();
            for (pkey, placeholder) in layout.placeholders.iter() {
                let p_alias = placeholder
                    .alias
                    .as_deref()
                    .filter(|a| !a.trim().is_empty())
                    .ok_or_else(|| {
                        Error::Configuration(format!(
                            "{} placeholder '{}' is missing 'alias'",
                            context, pkey
                        ))
                    })?;
                let p_context = format!("{} placeholder '{}'", context, p_alias);
                let table = placeholder.place_holder_index.as_ref().ok_or_else(|| {
                    Error::Configuration(format!("{} is missing 'place_holder_index'", p_context))
                })?;
                let variants = theme_table(table, &p_context)?;
                if placeholders.insert(p_alias.to_string(), variants).is_some() {
                    return Err(Error::Configuration(format!(
                        "{} is declared twice",
                        p_context
                    )));
                }
            }

            if registry.by_alias.contains_key(alias) {
                return Err(Error::Configuration(format!(
                    "{} is declared twice (template key '{}')",
                    context, key
                )));
            }
            registry.by_alias.insert(alias.to_string(), registry.entries.len());
            registry.fuzzy_keys.push(fuzzy_key(alias));
            registry.entries.push(LayoutRegistryEntry {
                alias: alias.to_string(),
                layout_index,
                placeholders,
            });
        }

        tracing::info!(layouts = registry.entries.len(), "layout registry built");
        Ok(registry)
    }

    /// Load a template file and build the registry from it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::build(&LayoutTemplate::load(path)?)
    }

    /// Set the policy for ambiguous fuzzy matches.
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The policy for ambiguous fuzzy matches.
    pub fn match_policy(&self) -> MatchPolicy {
        self.policy
    }

    /// Get an entry by canonical alias.
    pub fn get(&self, alias: &str) -> Option<&LayoutRegistryEntry> {
        self.by_alias.get(alias).map(|&i| &self.entries[i])
    }

    /// Iterate entries in template order.
    pub fn iter(&self) -> impl Iterator<Item = &LayoutRegistryEntry> {
        self.entries.iter()
    }

    /// Number of layouts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every canonical alias, sorted.
    pub fn valid_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.iter().map(|e| e.alias.clone()).collect();
        names.sort();
        names
    }

    /// Resolve a possibly inexact layout name.
    pub fn resolve(&self, requested: &str) -> Result<LayoutRef<'_>> {
        if let Some(entry) = self.get(requested) {
            return Ok(LayoutRef {
                entry,
                kind: MatchKind::Exact,
            });
        }

        let normalized = requested.replace('_', "/");
        if let Some(entry) = self.get(normalized.trim()) {
            tracing::debug!(requested, alias = %entry.alias, "layout matched after normalization");
            return Ok(LayoutRef {
                entry,
                kind: MatchKind::Normalized,
            });
        }

        let key = fuzzy_key(requested);
        let candidates: Vec<&LayoutRegistryEntry> = if key.is_empty() {
            Vec::new()
        } else {
            self.fuzzy_keys
                .iter()
                .zip(&self.entries)
                .filter(|(k, _)| **k == key)
                .map(|(_, e)| e)
                .collect()
        };

        match candidates.as_slice() {
            [] => Err(Error::UnknownLayout {
                requested: requested.to_string(),
                valid_names: self.valid_names(),
            }),
            [entry] => {
                tracing::debug!(requested, alias = %entry.alias, "layout matched fuzzily");
                Ok(LayoutRef {
                    entry: *entry,
                    kind: MatchKind::Fuzzy,
                })
            }
            [first, ..] => {
                let names: Vec<String> = candidates.iter().map(|e| e.alias.clone()).collect();
                match self.policy {
                    MatchPolicy::FirstWins => {
                        tracing::warn!(
                            requested,
                            chosen = %first.alias,
                            candidates = ?names,
                            "ambiguous layout name, using first candidate"
                        );
                        Ok(LayoutRef {
                            entry: *first,
                            kind: MatchKind::Fuzzy,
                        })
                    }
                    MatchPolicy::Strict => Err(Error::AmbiguousLayout {
                        requested: requested.to_string(),
                        candidates: names,
                    }),
                }
            }
        }
    }

    /// Placeholder index for a canonical layout alias.
    pub fn placeholder_index(&self, alias: &str, placeholder: &str, theme: Theme) -> Result<SlotIndex> {
        let entry = self.get(alias).ok_or_else(|| Error::UnknownLayout {
            requested: alias.to_string(),
            valid_names: self.valid_names(),
        })?;
        entry.placeholder_index(placeholder, theme)
    }
}

/// Build a registry from a layout template.
pub fn build_registry(template: &LayoutTemplate) -> Result<LayoutRegistry> {
    LayoutRegistry::build(template)
}

/// Resolve a possibly inexact layout name against the registry.
pub fn resolve_layout<'a>(name: &str, registry: &'a LayoutRegistry) -> Result<LayoutRef<'a>> {
    registry.resolve(name)
}

/// Resolve a placeholder of a resolved layout to its slot for a theme.
pub fn resolve_placeholder(layout: &LayoutRef<'_>, placeholder_name: &str, theme: Theme) -> Result<SlotIndex> {
    layout.entry.placeholder_index(placeholder_name, theme)
}
