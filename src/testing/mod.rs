//! Headless testing helpers: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to drive a [`Dom`](crate::dom::Dom) the way a user
//! would. Use [`render_to_string`] and related helpers to capture subtrees as
//! text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{render_pretty, render_to_string, render_widget, visible_text};
