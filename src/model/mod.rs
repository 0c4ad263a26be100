//! Data model shared by the resolver, the projector, and the assembly loop.
//!
//! Request types describe what the caller wants on each slide, projection
//! types describe styled text ready for a rendering adapter, and the outline
//! types capture an assembled deck in a format-agnostic way.

mod deck;
mod outline;
mod paragraph;
mod theme;

pub use deck::*;
pub use outline::*;
pub use paragraph::*;
pub use theme::*;
