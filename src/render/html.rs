//! HTML serialization of DOM subtrees.
//!
//! Attributes are written in name order. Flags render bare (`checked`), hidden
//! nodes gain `display: none;` in their `style`, and self-closing tags are
//! written as `<input ... />` with no content.

use std::fmt::Write as _;

use crate::dom::node::{AttrValue, Content, NodeId};
use crate::dom::tree::Dom;

/// Escape text for use between tags.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

/// Escape text for use inside a double-quoted attribute.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

impl Dom {
    /// Serialize `id` and its subtree.
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the content and children of `id`, without its own tags.
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_inner(id, &mut out);
        out
    }

    /// Alias for [`inner_html`](Self::inner_html), matching the element accessor pair.
    pub fn html(&self, id: NodeId) -> String {
        self.inner_html(id)
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };
        self.write_open_tag(id, out);
        if data.is_self_closing() {
            return;
        }
        self.write_inner(id, out);
        let _ = write!(out, "</{}>", data.tag);
    }

    /// Write `<tag attrs>`, or `<tag attrs />` for self-closing tags.
    pub(crate) fn write_open_tag(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };

        out.push('<');
        out.push_str(&data.tag);
        let mut style_written = false;
        for (name, value) in &data.attrs {
            match value {
                AttrValue::Flag(true) => {
                    out.push(' ');
                    out.push_str(name);
                }
                AttrValue::Flag(false) => {}
                AttrValue::Text(text) => {
                    let text = if name == "style" && !data.visible {
                        style_written = true;
                        hidden_style(text)
                    } else {
                        text.clone()
                    };
                    let _ = write!(out, " {}=\"{}\"", name, escape_attr(&text));
                }
            }
        }
        if !data.visible && !style_written {
            out.push_str(" style=\"display: none;\"");
        }
        out.push_str(if data.is_self_closing() { " />" } else { ">" });
    }

    fn write_inner(&self, id: NodeId, out: &mut String) {
        let Some(data) = self.get(id) else {
            return;
        };
        match &data.content {
            Content::Empty => {}
            Content::Text(text) => out.push_str(&escape_text(text)),
            Content::Html(html) => out.push_str(html),
        }
        for &child in self.children(id) {
            self.write_node(child, out);
        }
    }
}

fn hidden_style(existing: &str) -> String {
    let existing = existing.trim().trim_end_matches(';').trim();
    if existing.is_empty() {
        "display: none;".to_owned()
    } else {
        format!("{existing}; display: none;")
    }
}
