//! Tree operations: create, add, reparent, clear, remove, walk.

use std::collections::VecDeque;
use std::fmt;

use slotmap::{SecondaryMap, SlotMap};

use super::instance::element_id;
use super::node::{Content, NodeData, NodeId};
use super::spec::{Addable, ElementSpec};
use crate::event::handler::Listener;

/// Empty slice constant for returning when a node has no children.
const EMPTY_CHILDREN: &[NodeId] = &[];

/// Hook run on a node right before its children are cleared.
pub type ClearHook = Box<dyn FnMut(&Dom, NodeId)>;

// ---------------------------------------------------------------------------
// DomOptions
// ---------------------------------------------------------------------------

/// Arena-wide creation options.
#[derive(Debug, Clone)]
pub struct DomOptions {
    /// Give every created node an id, even when its spec names none.
    pub enforce_id: bool,
    /// Prefix for enforced ids.
    pub id_prefix: String,
}

impl Default for DomOptions {
    fn default() -> Self {
        Self {
            enforce_id: false,
            id_prefix: "E".to_owned(),
        }
    }
}

impl DomOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable enforced ids (builder).
    pub fn with_enforce_id(mut self, enforce: bool) -> Self {
        self.enforce_id = enforce;
        self
    }

    /// Set the prefix for enforced ids (builder).
    pub fn with_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.id_prefix = prefix.into();
        self
    }
}

// ---------------------------------------------------------------------------
// Dom
// ---------------------------------------------------------------------------

/// The central DOM tree, backed by a slotmap arena.
///
/// All nodes live in a single `SlotMap`. Parent/child relationships are stored
/// in secondary maps so that node removal is O(subtree size) and lookup is O(1).
/// Event listeners and pre-clear hooks are keyed the same way and are dropped
/// together with their node.
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    children: SecondaryMap<NodeId, Vec<NodeId>>,
    parent: SecondaryMap<NodeId, NodeId>,
    pub(crate) listeners: SecondaryMap<NodeId, Vec<Listener>>,
    clear_hooks: SecondaryMap<NodeId, Vec<ClearHook>>,
    root: Option<NodeId>,
    options: DomOptions,
}

impl Dom {
    /// Create an empty DOM.
    pub fn new() -> Self {
        Self::with_options(DomOptions::default())
    }

    /// Create an empty DOM with the given creation options.
    pub fn with_options(options: DomOptions) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            children: SecondaryMap::new(),
            parent: SecondaryMap::new(),
            listeners: SecondaryMap::new(),
            clear_hooks: SecondaryMap::new(),
            root: None,
            options,
        }
    }

    pub fn options(&self) -> &DomOptions {
        &self.options
    }

    /// Insert a root-level node (no parent).
    ///
    /// If no root has been set yet, this node becomes the root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        if self.root.is_none() {
            self.root = Some(id);
        }
        id
    }

    /// Insert a node as a child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics (debug) if `parent` does not exist in the tree.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        debug_assert!(
            self.nodes.contains_key(parent),
            "parent node does not exist"
        );
        let id = self.nodes.insert(data);
        self.children.insert(id, Vec::new());
        self.attach(id, parent);
        id
    }

    /// Instantiate a spec (and its children) as a detached subtree.
    pub fn create(&mut self, spec: ElementSpec) -> NodeId {
        let ElementSpec {
            tag,
            attrs,
            content,
            children,
            id_fn,
            hidden,
        } = spec;

        let mut data = NodeData::new(tag);
        for (name, value) in attrs {
            data.set_attr(&name, value);
        }
        match content {
            Content::Empty => {}
            Content::Text(text) => data.set_text(text),
            Content::Html(html) => data.set_html(html),
        }
        if let Some(id_fn) = id_fn {
            let id = id_fn(data.instance);
            data.set_attr("id", id);
        } else if self.options.enforce_id && data.id().is_none() {
            let id = element_id(&self.options.id_prefix, data.instance);
            data.set_attr("id", id);
        }
        data.visible = !hidden;

        let id = self.insert(data);
        for child in children {
            self.add(id, child);
        }
        id
    }

    /// Add a node, a spec, or a list of either under `parent`.
    ///
    /// Existing nodes are detached from their old parent first. Returns the
    /// added node for single items and `None` for lists. A node cannot be
    /// added under itself or its own descendants.
    pub fn add(&mut self, parent: NodeId, item: impl Into<Addable>) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            tracing::warn!(?parent, "add: parent node does not exist");
            return None;
        }
        match item.into() {
            Addable::Node(node) => {
                if !self.nodes.contains_key(node) {
                    tracing::warn!(?node, "add: node does not exist");
                    return None;
                }
                if node == parent || self.ancestors(parent).contains(&node) {
                    tracing::warn!(?node, ?parent, "add: refusing to create a cycle");
                    return None;
                }
                self.reparent(node, parent);
                Some(node)
            }
            Addable::Spec(spec) => {
                let node = self.create(spec);
                self.reparent(node, parent);
                Some(node)
            }
            Addable::Many(items) => {
                for item in items {
                    self.add(parent, item);
                }
                None
            }
        }
    }

    /// Remove a node and all its descendants recursively.
    ///
    /// Returns the `NodeData` for the removed node, or `None` if it didn't exist.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if !self.nodes.contains_key(id) {
            return None;
        }

        self.detach(id);

        // Clear root if we're removing it.
        if self.root == Some(id) {
            self.root = None;
        }

        // Collect all descendants (BFS) to remove them.
        let mut to_remove = VecDeque::new();
        to_remove.push_back(id);
        let mut removed_root_data = None;

        while let Some(current) = to_remove.pop_front() {
            // Queue children before removing.
            if let Some(kids) = self.children.remove(current) {
                for &child in &kids {
                    to_remove.push_back(child);
                }
            }
            self.parent.remove(current);
            self.listeners.remove(current);
            self.clear_hooks.remove(current);
            let data = self.nodes.remove(current);
            if current == id {
                removed_root_data = data;
            }
        }

        removed_root_data
    }

    /// Register a hook that runs before `clear` empties `id`.
    pub fn on_before_clear(&mut self, id: NodeId, hook: impl FnMut(&Dom, NodeId) + 'static) {
        if !self.nodes.contains_key(id) {
            return;
        }
        match self.clear_hooks.get_mut(id) {
            Some(hooks) => hooks.push(Box::new(hook)),
            None => {
                self.clear_hooks.insert(id, vec![Box::new(hook)]);
            }
        }
    }

    /// Empty a node: children are cleared leaf-first, then dropped.
    ///
    /// Pre-clear hooks run only when there are children to clear, so a second
    /// call on an emptied node only resets its own content. The node itself
    /// stays attached to its parent.
    pub fn clear(&mut self, id: NodeId) {
        if !self.nodes.contains_key(id) {
            return;
        }
        let kids = self.children(id).to_vec();
        if !kids.is_empty() {
            if let Some(mut hooks) = self.clear_hooks.remove(id) {
                for hook in hooks.iter_mut() {
                    hook(self, id);
                }
                self.clear_hooks.insert(id, hooks);
            }
            for &child in &kids {
                self.clear(child);
            }
            for child in kids {
                self.remove(child);
            }
        }
        if let Some(data) = self.nodes.get_mut(id) {
            data.content = Content::Empty;
        }
    }

    /// Move `node` to become the last child of `new_parent`.
    ///
    /// The node keeps its subtree intact. If `node` was previously a child of
    /// another parent, it is detached first.
    ///
    /// # Panics
    ///
    /// Panics (debug) if either `node` or `new_parent` does not exist.
    pub fn reparent(&mut self, node: NodeId, new_parent: NodeId) {
        debug_assert!(self.nodes.contains_key(node), "node does not exist");
        debug_assert!(
            self.nodes.contains_key(new_parent),
            "new_parent does not exist"
        );
        self.detach(node);
        self.attach(node, new_parent);
    }

    fn attach(&mut self, node: NodeId, parent: NodeId) {
        self.parent.insert(node, parent);
        match self.children.get_mut(parent) {
            Some(siblings) => siblings.push(node),
            None => {
                self.children.insert(parent, vec![node]);
            }
        }
        if self.root == Some(node) {
            self.root = self.ancestors(node).last().copied();
        }
    }

    fn detach(&mut self, node: NodeId) {
        if let Some(old_parent) = self.parent.remove(node) {
            if let Some(siblings) = self.children.get_mut(old_parent) {
                siblings.retain(|&child| child != node);
            }
        }
    }

    /// Get the parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parent.get(id).copied()
    }

    /// Get the children of a node. Returns an empty slice if the node has no children
    /// or does not exist.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.children
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(EMPTY_CHILDREN)
    }

    /// Walk from `id` up to the root, collecting ancestor node ids.
    ///
    /// The returned vec does **not** include `id` itself; it starts with the
    /// immediate parent and ends at the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut current = id;
        while let Some(p) = self.parent.get(current).copied() {
            result.push(p);
            current = p;
        }
        result
    }

    /// Immutable access to a node's data.
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    /// Mutable access to a node's data.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    /// The first node inserted while no root was set, unless since attached elsewhere.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of nodes in the DOM.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the DOM is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether the DOM contains a node with the given id.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Pre-order depth-first traversal starting from `start`.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            // Push children in reverse so the first child is visited first.
            let kids = self.children(current);
            for &child in kids.iter().rev() {
                stack.push(child);
            }
        }
        result
    }

    /// Breadth-first traversal starting from `start`.
    pub fn walk_breadth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            if !self.nodes.contains_key(current) {
                continue;
            }
            result.push(current);
            queue.extend(self.children(current).iter().copied());
        }
        result
    }
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dom")
            .field("nodes", &self.nodes.len())
            .field("root", &self.root)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
