//! Declarative element specs and the things `Dom::add` accepts.

use std::fmt;

use super::instance::{element_id, InstanceNo};
use super::node::{AttrValue, Content, NodeId, DEFAULT_TAG};

/// Computes an id from the new node's instance number.
pub type IdFn = Box<dyn FnOnce(InstanceNo) -> String>;

/// A plain description of an element tree, instantiated by [`Dom::create`].
///
/// [`Dom::create`]: super::tree::Dom::create
///
/// # Examples
///
/// ```
/// use element_forms::dom::{Dom, ElementSpec};
///
/// let mut dom = Dom::new();
/// let unit = dom.create(
///     ElementSpec::new("div")
///         .class("ce-unit")
///         .child(ElementSpec::new("label").text("Age")),
/// );
/// assert_eq!(dom.children(unit).len(), 1);
/// ```
pub struct ElementSpec {
    pub(crate) tag: String,
    pub(crate) attrs: Vec<(String, AttrValue)>,
    pub(crate) content: Content,
    pub(crate) children: Vec<Addable>,
    pub(crate) id_fn: Option<IdFn>,
    pub(crate) hidden: bool,
}

impl ElementSpec {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            content: Content::Empty,
            children: Vec::new(),
            id_fn: None,
            hidden: false,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Set an attribute (builder). Later values for the same name win.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Set the `class` attribute (builder).
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class.into())
    }

    /// Set the `id` attribute (builder).
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id.into())
    }

    /// Id computed as `prefix` followed by the node's instance number.
    pub fn generated_id(self, prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        self.id_with(move |instance| element_id(&prefix, instance))
    }

    /// Id computed from the node's instance number at construction time.
    pub fn id_with(mut self, f: impl FnOnce(InstanceNo) -> String + 'static) -> Self {
        self.id_fn = Some(Box::new(f));
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.content = Content::Text(text.into());
        self
    }

    pub fn html(mut self, html: impl Into<String>) -> Self {
        self.content = Content::Html(html.into());
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn child(mut self, child: impl Into<Addable>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Addable>>) -> Self {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }
}

impl Default for ElementSpec {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl fmt::Debug for ElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementSpec")
            .field("tag", &self.tag)
            .field("attrs", &self.attrs)
            .field("content", &self.content)
            .field("children", &self.children)
            .field("id_fn", &self.id_fn.is_some())
            .field("hidden", &self.hidden)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Addable
// ---------------------------------------------------------------------------

/// Anything that can be added under a parent node.
#[derive(Debug)]
pub enum Addable {
    /// An existing node, reparented.
    Node(NodeId),
    /// A spec, instantiated first.
    Spec(ElementSpec),
    /// Several of the above, in order.
    Many(Vec<Addable>),
}

impl From<NodeId> for Addable {
    fn from(id: NodeId) -> Self {
        Addable::Node(id)
    }
}

impl From<ElementSpec> for Addable {
    fn from(spec: ElementSpec) -> Self {
        Addable::Spec(spec)
    }
}

impl<T: Into<Addable>> From<Vec<T>> for Addable {
    fn from(items: Vec<T>) -> Self {
        Addable::Many(items.into_iter().map(Into::into).collect())
    }
}
