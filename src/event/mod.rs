//! Event system: listener registry, synthetic triggering, bubbling.

pub mod handler;

pub use handler::{bubble_path, Event, EventKind, Listener, ListenerFn};
