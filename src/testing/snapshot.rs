//! Snapshot rendering helpers.
//!
//! Functions for turning element subtrees into strings suitable for
//! snapshot testing and assertions.

use std::fmt::Write as _;

use crate::dom::node::{Content, NodeId};
use crate::dom::tree::Dom;
use crate::render::html::escape_text;
use crate::widget::Widget;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Render `id` and its subtree as compact HTML on one line.
///
/// # Examples
///
/// ```
/// use element_forms::dom::{Dom, ElementSpec};
/// use element_forms::testing::render_to_string;
///
/// let mut dom = Dom::new();
/// let p = dom.create(ElementSpec::new("p").text("Hello"));
/// assert_eq!(render_to_string(&dom, p), "<p>Hello</p>");
/// ```
pub fn render_to_string(dom: &Dom, id: NodeId) -> String {
    dom.outer_html(id)
}

/// Render a mounted widget as compact HTML.
pub fn render_widget(dom: &Dom, widget: &dyn Widget) -> String {
    widget.to_html(dom)
}

/// Render `id` as indented HTML, one element per line.
///
/// Text content sits on its own line under its element. Empty elements
/// close on the same line.
pub fn render_pretty(dom: &Dom, id: NodeId) -> String {
    let mut out = String::new();
    write_pretty(dom, id, 0, &mut out);
    out.truncate(out.trim_end().len());
    out
}

/// Text of every visible node under `id`, one entry per node that carries any.
pub fn visible_text(dom: &Dom, id: NodeId) -> Vec<String> {
    dom.walk_depth_first(id)
        .into_iter()
        .filter(|&node| dom.is_displayed(node))
        .filter_map(|node| dom.get(node))
        .map(|data| data.own_text().trim().to_owned())
        .filter(|text| !text.is_empty())
        .collect()
}

fn write_pretty(dom: &Dom, id: NodeId, depth: usize, out: &mut String) {
    let Some(data) = dom.get(id) else {
        return;
    };
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    dom.write_open_tag(id, out);
    if data.is_self_closing() {
        out.push('\n');
        return;
    }

    let children = dom.children(id);
    let content = match &data.content {
        Content::Text(text) if !text.is_empty() => Some(escape_text(text)),
        Content::Html(html) if !html.is_empty() => Some(html.clone()),
        _ => None,
    };
    if content.is_none() && children.is_empty() {
        let _ = writeln!(out, "</{}>", data.tag);
        return;
    }
    out.push('\n');
    if let Some(content) = content {
        let _ = writeln!(out, "{indent}  {content}");
    }
    for &child in children {
        write_pretty(dom, child, depth + 1, out);
    }
    let _ = writeln!(out, "{indent}</{}>", data.tag);
}

// ===========================================================================
// Tests
// ===========================================================================
