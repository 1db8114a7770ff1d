//! Rendering: HTML serialization of element subtrees.

pub mod html;

pub use html::{escape_attr, escape_text};
