//! Slide layout templates, the registry built from them, and name resolution.

pub mod catalogue;
#[cfg(feature = "inspect")]
pub mod inspect;
pub mod registry;
pub mod template;

pub use catalogue::{CatalogueEntry, CataloguePlaceholders, LayoutCatalogue};
#[cfg(feature = "inspect")]
pub use inspect::{inspect_pptx, inspect_pptx_bytes, skeleton_template, LayoutInfo, LayoutMode, PlaceholderInfo};
pub use registry::{
    build_registry, fuzzy_key, resolve_layout, resolve_placeholder, LayoutRef, LayoutRegistry,
    LayoutRegistryEntry, MatchKind, MatchPolicy, SlotIndex,
};
pub use template::{LayoutTemplate, OrderedMap, TemplateLayout, TemplatePlaceholder, ThemeIndexTable};
