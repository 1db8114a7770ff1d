//! DOM arena: slotmap-backed element tree with attribute, value and class queries.

pub mod access;
pub mod instance;
pub mod node;
pub mod query;
pub mod spec;
pub mod tree;

pub use instance::{element_id, InstanceNo};
pub use node::{AttrValue, Content, NodeData, NodeId};
pub use spec::{Addable, ElementSpec};
pub use tree::{ClearHook, Dom, DomOptions};
