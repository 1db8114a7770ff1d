//! # element-forms
//!
//! A retained element tree with declarative forms and list widgets.
//!
//! Elements live in a slotmap-backed arena and are built from [`dom::ElementSpec`]
//! values. On top of that sit a JSON-driven form renderer ([`content::ContentEngine`])
//! and a multi-select [`widgets::Checklist`]. Everything serializes to HTML, so
//! output is easy to inspect and snapshot.
//!
//! ## Core Systems
//!
//! - **[`dom`]**: Element arena: creation from specs, attributes, values, `add`/`clear`, queries
//! - **[`event`]**: Click/change listeners with bubbling and synthetic triggers
//! - **[`render`]**: HTML serialization with escaping
//! - **[`widget`]**: Widget trait for mounted components
//! - **[`widgets`]**: Built-in widgets: Dropdown, Checklist
//! - **[`content`]**: Field descriptors, tree builder, `showIf` rules, command bar
//! - **[`testing`]**: Pilot and snapshot helpers for headless tests

extern crate self as element_forms;

// Core systems
pub mod dom;
pub mod event;
pub mod render;

// Widget system
pub mod widget;
pub mod widgets;

// Forms
pub mod content;

// Testing support
pub mod testing;

// Proc macros (feature-gated)
#[cfg(feature = "macros")]
pub use element_forms_macros::element;
