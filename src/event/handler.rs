//! Event dispatch: listener registry, synthetic triggering and bubbling.
//!
//! Listeners are registered per node and event kind. [`Dom::trigger`] walks
//! the bubble path from the target up to the root and calls every matching
//! listener, until one of them stops propagation.

use std::fmt;
use std::rc::Rc;

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

// ---------------------------------------------------------------------------
// EventKind / Event
// ---------------------------------------------------------------------------

/// Kinds of events a node can receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Change,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Change => "change",
        }
    }
}

/// An event in flight.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    /// Node the event was triggered on.
    pub target: NodeId,
    /// Node whose listeners are currently running.
    pub current: NodeId,
    stopped: bool,
}

impl Event {
    pub fn new(kind: EventKind, target: NodeId) -> Self {
        Self {
            kind,
            target,
            current: target,
            stopped: false,
        }
    }

    /// Stop the event from reaching further ancestors.
    ///
    /// Remaining listeners on the current node still run.
    pub fn stop_propagation(&mut self) {
        self.stopped = true;
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.stopped
    }
}

// ---------------------------------------------------------------------------
// Listener
// ---------------------------------------------------------------------------

/// Callback invoked with the DOM and the event.
pub type ListenerFn = dyn Fn(&mut Dom, &mut Event);

/// A registered listener: event kind plus shared callback.
#[derive(Clone)]
pub struct Listener {
    pub kind: EventKind,
    callback: Rc<ListenerFn>,
}

impl fmt::Debug for Listener {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener").field("kind", &self.kind).finish()
    }
}

/// Compute the bubble path from `start` up to the root (inclusive).
///
/// Returns `[start, parent, grandparent, ..., root]`.
/// If `start` does not exist in the DOM, returns an empty vec.
pub fn bubble_path(dom: &Dom, start: NodeId) -> Vec<NodeId> {
    if !dom.contains(start) {
        return Vec::new();
    }
    let mut path = vec![start];
    path.extend(dom.ancestors(start));
    path
}

impl Dom {
    /// Subscribe to `kind` events on `id`.
    pub fn on(&mut self, id: NodeId, kind: EventKind, f: impl Fn(&mut Dom, &mut Event) + 'static) {
        if !self.contains(id) {
            tracing::warn!(?id, kind = kind.as_str(), "on: node does not exist");
            return;
        }
        let listener = Listener {
            kind,
            callback: Rc::new(f),
        };
        match self.listeners.get_mut(id) {
            Some(list) => list.push(listener),
            None => {
                self.listeners.insert(id, vec![listener]);
            }
        }
    }

    /// Drop every listener on `id`.
    pub fn off(&mut self, id: NodeId) {
        self.listeners.remove(id);
    }

    pub fn listener_count(&self, id: NodeId, kind: EventKind) -> usize {
        self.listeners
            .get(id)
            .map_or(0, |list| list.iter().filter(|l| l.kind == kind).count())
    }

    /// Dispatch a synthetic event on `target` and bubble it to the root.
    ///
    /// Clicks on disabled nodes are dropped. The listener list of each node is
    /// snapshotted before it runs, so listeners may add or remove listeners.
    pub fn trigger(&mut self, target: NodeId, kind: EventKind) {
        let Some(data) = self.get(target) else {
            return;
        };
        if kind == EventKind::Click && data.has_attr("disabled") {
            tracing::debug!(?target, "click on disabled node dropped");
            return;
        }

        let mut event = Event::new(kind, target);
        for node in bubble_path(self, target) {
            // A listener further down may have removed this ancestor.
            if !self.contains(node) {
                break;
            }
            let callbacks: Vec<Rc<ListenerFn>> = self
                .listeners
                .get(node)
                .map(|list| {
                    list.iter()
                        .filter(|l| l.kind == kind)
                        .map(|l| Rc::clone(&l.callback))
                        .collect()
                })
                .unwrap_or_default();
            event.current = node;
            for callback in callbacks {
                callback(self, &mut event);
            }
            if event.is_propagation_stopped() {
                break;
            }
        }
    }

    /// Shorthand for `trigger(id, EventKind::Click)`.
    pub fn click(&mut self, id: NodeId) {
        self.trigger(id, EventKind::Click);
    }

    /// Shorthand for `trigger(id, EventKind::Change)`.
    pub fn change(&mut self, id: NodeId) {
        self.trigger(id, EventKind::Change);
    }
}

// ===========================================================================
// Tests
// ===========================================================================
