//! HTML-like content markup and its projection onto styled runs.

pub mod project;
pub mod style;
pub mod tree;

pub use project::{project_markup, project_markup_with, ProjectOptions};
pub use style::{parse_color, parse_style, InlineStyle, StylePolicy};
pub use tree::{Element, Fragment, Node};
