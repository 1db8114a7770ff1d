//! Node types: NodeId, NodeData, attribute values and content.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use super::instance::InstanceNo;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Tags that never carry content or a closing tag.
pub const SELF_CLOSING_TAGS: &[&str] = &[
    "area", "base", "br", "embed", "hr", "iframe", "img", "input", "link", "meta", "param",
    "source", "track",
];

/// Boolean attributes: rendered by presence only, removed when falsy.
pub const SINGLE_ATTRS: &[&str] = &[
    "required", "selected", "disabled", "checked", "multiple", "readonly",
];

/// Tag used when a spec does not name one.
pub const DEFAULT_TAG: &str = "div";

/// Whether `tag` is a self-closing (void) element.
pub fn is_self_closing(tag: &str) -> bool {
    SELF_CLOSING_TAGS
        .iter()
        .any(|t| t.eq_ignore_ascii_case(tag))
}

/// Whether `name` is a presence-only boolean attribute.
pub fn is_single_attr(name: &str) -> bool {
    SINGLE_ATTRS.iter().any(|a| a.eq_ignore_ascii_case(name))
}

// ---------------------------------------------------------------------------
// AttrValue
// ---------------------------------------------------------------------------

/// Value assigned to an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Regular `name="text"` attribute.
    Text(String),
    /// Presence flag. `Flag(false)` on a single attribute removes it.
    Flag(bool),
}

impl AttrValue {
    /// Truthiness in the sense of HTML boolean attributes.
    ///
    /// Empty text, `"false"` and `"0"` count as falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Flag(b) => *b,
            AttrValue::Text(s) => !(s.is_empty() || s == "false" || s == "0"),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<&String> for AttrValue {
    fn from(s: &String) -> Self {
        AttrValue::Text(s.clone())
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Flag(b)
    }
}

macro_rules! attr_from_number {
    ($($t:ty),*) => {
        $(
            impl From<$t> for AttrValue {
                fn from(n: $t) -> Self {
                    AttrValue::Text(n.to_string())
                }
            }
        )*
    };
}

attr_from_number!(i32, i64, u32, u64, usize, f64);

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

/// Own content of a node, rendered before its children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Content {
    #[default]
    Empty,
    /// Escaped on render.
    Text(String),
    /// Emitted verbatim on render.
    Html(String),
}

impl Content {
    pub fn is_empty(&self) -> bool {
        match self {
            Content::Empty => true,
            Content::Text(s) | Content::Html(s) => s.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// NodeData
// ---------------------------------------------------------------------------

/// Data associated with a single DOM node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Lowercase tag name (e.g. "div", "input").
    pub tag: String,
    /// Attributes, rendered in name order.
    pub attrs: BTreeMap<String, AttrValue>,
    /// Own text or html content.
    pub content: Content,
    /// Hidden nodes render with `display: none`.
    pub visible: bool,
    /// Creation number, assigned once.
    pub instance: InstanceNo,
}

impl NodeData {
    /// Create a new `NodeData` for `tag` with a fresh instance number.
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        Self {
            tag: if tag.is_empty() {
                DEFAULT_TAG.to_owned()
            } else {
                tag
            },
            attrs: BTreeMap::new(),
            content: Content::Empty,
            visible: true,
            instance: InstanceNo::next(),
        }
    }

    /// Set an attribute (builder).
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set text content (builder).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn is_self_closing(&self) -> bool {
        is_self_closing(&self.tag)
    }

    /// Attribute getter. Flags read back as their own name, like the DOM does.
    pub fn attr(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.attrs.get_key_value(&name).map(|(key, value)| match value {
            AttrValue::Text(s) => s.as_str(),
            AttrValue::Flag(_) => key.as_str(),
        })
    }

    /// Attribute setter.
    ///
    /// Names are stored lowercase. Single attributes are normalized to flags;
    /// a falsy value removes them.
    pub fn set_attr(&mut self, name: &str, value: impl Into<AttrValue>) {
        let name = name.to_ascii_lowercase();
        let value = value.into();
        if is_single_attr(&name) {
            if value.is_truthy() {
                self.attrs.insert(name, AttrValue::Flag(true));
            } else {
                self.attrs.remove(&name);
            }
            return;
        }
        let value = match value {
            AttrValue::Flag(b) => AttrValue::Text(b.to_string()),
            text => text,
        };
        self.attrs.insert(name, value);
    }

    /// Remove an attribute. No-op if absent.
    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.remove(&name.to_ascii_lowercase());
    }

    /// Whether a presence flag (or any attribute) named `name` is set.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(&name.to_ascii_lowercase())
    }

    /// The `id` attribute, if any.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Check whether this node has a given CSS class.
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Add a CSS class. No-op if already present.
    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.attr("class") {
            Some(existing) if !existing.trim().is_empty() => format!("{existing} {class}"),
            _ => class.to_owned(),
        };
        self.set_attr("class", joined);
    }

    /// Remove a CSS class. No-op if not present.
    pub fn remove_class(&mut self, class: &str) {
        let Some(existing) = self.attr("class") else {
            return;
        };
        let kept: Vec<&str> = existing.split_whitespace().filter(|c| *c != class).collect();
        let kept = kept.join(" ");
        self.set_attr("class", kept);
    }

    /// Own text content (not including descendants).
    pub fn own_text(&self) -> &str {
        match &self.content {
            Content::Text(s) => s,
            _ => "",
        }
    }

    /// Replace own content with text. Ignored on self-closing tags.
    pub fn set_text(&mut self, text: impl Into<String>) {
        if self.is_self_closing() {
            tracing::debug!(tag = %self.tag, "ignoring text on self-closing tag");
            return;
        }
        self.content = Content::Text(text.into());
    }

    /// Replace own content with raw html. Ignored on self-closing tags.
    pub fn set_html(&mut self, html: impl Into<String>) {
        if self.is_self_closing() {
            tracing::debug!(tag = %self.tag, "ignoring html on self-closing tag");
            return;
        }
        self.content = Content::Html(html.into());
    }
}
