//! Node accessors: attributes, properties, text and form values.
//!
//! These mirror what a browser element exposes. Properties that live in more
//! than one place in markup (an input's value attribute, a textarea's text, a
//! select's selected option) are resolved here by tag.

use super::node::{AttrValue, Content, NodeId};
use super::tree::Dom;

impl Dom {
    /// Attribute getter. `None` for missing nodes or attributes.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|data| data.attr(name))
    }

    /// Attribute setter. See [`NodeData::set_attr`](super::node::NodeData::set_attr).
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<AttrValue>) {
        if let Some(data) = self.get_mut(id) {
            data.set_attr(name, value);
        }
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(data) = self.get_mut(id) {
            data.remove_attr(name);
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|data| data.tag.as_str())
    }

    /// Text of the node and all its descendants, in document order.
    pub fn text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.walk_depth_first(id) {
            if let Some(data) = self.get(node) {
                out.push_str(data.own_text());
            }
        }
        out
    }

    /// Replace the node's own content with text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if let Some(data) = self.get_mut(id) {
            data.set_text(text);
        }
    }

    /// Replace the node's own content with raw html.
    pub fn set_html(&mut self, id: NodeId, html: impl Into<String>) {
        if let Some(data) = self.get_mut(id) {
            data.set_html(html);
        }
    }

    pub fn checked(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|data| data.has_attr("checked"))
    }

    pub fn set_checked(&mut self, id: NodeId, checked: bool) {
        self.set_attr(id, "checked", checked);
    }

    /// Current form value of a control.
    ///
    /// `textarea` reads its text, `select` its selected option (or the first
    /// option), everything else its `value` attribute.
    pub fn val(&self, id: NodeId) -> String {
        let Some(data) = self.get(id) else {
            return String::new();
        };
        match data.tag.as_str() {
            "textarea" => data.own_text().to_owned(),
            "select" => self
                .selected_option(id)
                .map(|option| self.option_value(option))
                .unwrap_or_default(),
            _ => data.attr("value").unwrap_or_default().to_owned(),
        }
    }

    /// Set the form value of a control. Counterpart of [`val`](Self::val).
    pub fn set_val(&mut self, id: NodeId, value: &str) {
        let Some(tag) = self.tag(id).map(str::to_owned) else {
            return;
        };
        match tag.as_str() {
            "textarea" => self.set_text(id, value),
            "select" => {
                let options = self.options_of(id);
                for option in options {
                    let selected = self.option_value(option) == value;
                    self.set_attr(option, "selected", selected);
                }
            }
            _ => self.set_attr(id, "value", value),
        }
    }

    pub fn show(&mut self, id: NodeId) {
        if let Some(data) = self.get_mut(id) {
            data.visible = true;
        }
    }

    pub fn hide(&mut self, id: NodeId) {
        if let Some(data) = self.get_mut(id) {
            data.visible = false;
        }
    }

    /// Own visibility flag of the node.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|data| data.visible)
    }

    /// Whether the node and all its ancestors are visible.
    pub fn is_displayed(&self, id: NodeId) -> bool {
        self.is_visible(id) && self.ancestors(id).iter().all(|&a| self.is_visible(a))
    }

    fn options_of(&self, select: NodeId) -> Vec<NodeId> {
        self.walk_depth_first(select)
            .into_iter()
            .filter(|&node| self.tag(node) == Some("option"))
            .collect()
    }

    fn selected_option(&self, select: NodeId) -> Option<NodeId> {
        let options = self.options_of(select);
        options
            .iter()
            .copied()
            .find(|&option| self.get(option).is_some_and(|d| d.has_attr("selected")))
            .or_else(|| options.first().copied())
    }

    fn option_value(&self, option: NodeId) -> String {
        match self.get(option) {
            Some(data) => match data.attr("value") {
                Some(value) => value.to_owned(),
                None => match &data.content {
                    Content::Text(text) => text.clone(),
                    _ => self.text(option),
                },
            },
            None => String::new(),
        }
    }
}
