//! Pilot: programmatic interaction with a headless element tree.
//!
//! The `Pilot` owns a [`Dom`] and provides methods that act the way a user
//! would: clicking buttons, typing into fields, toggling checkboxes and
//! picking options. Every input method fires the same events a browser would,
//! so listeners wired by widgets run as they would in real use.

use crate::dom::node::NodeId;
use crate::dom::tree::Dom;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless user driving a [`Dom`].
///
/// # Examples
///
/// ```
/// use element_forms::dom::ElementSpec;
/// use element_forms::testing::Pilot;
///
/// let mut pilot = Pilot::new();
/// let input = pilot.dom_mut().create(ElementSpec::new("input").id("name"));
/// pilot.type_text(input, "Ada");
/// assert_eq!(pilot.value_of("name").as_deref(), Some("Ada"));
/// ```
#[derive(Debug, Default)]
pub struct Pilot {
    dom: Dom,
}

impl Pilot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drive an existing tree.
    pub fn with_dom(dom: Dom) -> Self {
        Self { dom }
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Click a node. Disabled nodes ignore it.
    pub fn click(&mut self, id: NodeId) {
        self.dom.click(id);
    }

    /// Click the node whose `id` attribute is `element_id`.
    ///
    /// Returns `false` when no such node exists.
    pub fn click_id(&mut self, element_id: &str) -> bool {
        match self.dom.query_by_id(element_id) {
            Some(node) => {
                self.dom.click(node);
                true
            }
            None => false,
        }
    }

    /// Replace a control's value, then fire `change`.
    pub fn type_text(&mut self, id: NodeId, text: &str) {
        self.dom.set_val(id, text);
        self.dom.change(id);
    }

    /// Flip a checkbox, then fire `change`. Returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> bool {
        let checked = !self.dom.checked(id);
        self.dom.set_checked(id, checked);
        self.dom.change(id);
        checked
    }

    /// Choose the option with value `value` in a `select`, then fire `change`.
    pub fn select_option(&mut self, id: NodeId, value: &str) {
        self.type_text(id, value);
    }

    // ── Query ────────────────────────────────────────────────────────

    pub fn dom(&self) -> &Dom {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut Dom {
        &mut self.dom
    }

    pub fn into_dom(self) -> Dom {
        self.dom
    }

    /// Current value of the node whose `id` attribute is `element_id`.
    pub fn value_of(&self, element_id: &str) -> Option<String> {
        self.dom.query_by_id(element_id).map(|node| self.dom.val(node))
    }

    /// Whether `id` and all its ancestors are shown.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        self.dom.is_displayed(id)
    }

    // ── Render helpers ───────────────────────────────────────────────

    /// Compact HTML of a subtree.
    pub fn render(&self, id: NodeId) -> String {
        super::snapshot::render_to_string(&self.dom, id)
    }

    /// Indented HTML of a subtree.
    pub fn render_pretty(&self, id: NodeId) -> String {
        super::snapshot::render_pretty(&self.dom, id)
    }
}

// ===========================================================================
// Tests
// ===========================================================================
