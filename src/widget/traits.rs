//! Widget trait: mounted components that own a subtree of the DOM.
//!
//! A widget is created against a [`Dom`], keeps the ids of the nodes it built,
//! and exposes its root so callers can place it anywhere in the tree.

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

/// Core trait implemented by mounted widgets.
pub trait Widget {
    /// Type name for diagnostics (e.g. "Checklist").
    fn widget_type(&self) -> &str;

    /// The node that contains everything this widget rendered.
    fn root(&self) -> NodeId;

    /// Append the widget's root under `parent`.
    fn mount(&self, dom: &mut Dom, parent: NodeId) {
        dom.add(parent, self.root());
    }

    /// Serialize the widget's subtree.
    fn to_html(&self, dom: &Dom) -> String {
        dom.outer_html(self.root())
    }
}
