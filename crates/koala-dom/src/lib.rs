//! DOM tree used as the element source for selector matching.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/), reduced to what
//! selector matching needs: element names (with an optional namespace
//! prefix), attributes, and parent/sibling navigation.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues.
//! [`ElementRef`] pairs a tree with a node id so callers can walk elements
//! without threading the tree through every call.

use std::collections::HashMap;

/// Map of attribute names to values for an element.
///
/// Namespaced attributes are stored under their qualified `prefix:name` key.
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.7 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name..."
#[derive(Debug, Clone, Default)]
pub struct ElementData {
    /// "An element's local name"
    pub local_name: String,
    /// "An element's namespace prefix", if any.
    pub prefix: Option<String>,
    /// "An element has an associated attribute list"
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data from a possibly prefixed tag name (`svg:rect`).
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        let (prefix, local_name) = match tag_name.split_once(':') {
            Some((prefix, local)) => (Some(prefix.to_string()), local.to_string()),
            None => (None, tag_name.to_string()),
        };
        Self {
            local_name,
            prefix,
            attrs: AttributesMap::new(),
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        let _ = self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    /// Returns the element's id attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// Iterates the class names from the class attribute.
    ///
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attrs
            .get("class")
            .map(String::as_str)
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Look up an attribute by its (possibly `prefix:name` qualified) name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    /// The Document node is always at index 0 (`NodeId::ROOT`).
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (should always have at least the Document).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate an element from a tag name and `(name, value)` attributes.
    pub fn alloc_element(&mut self, tag_name: &str, attrs: &[(&str, &str)]) -> NodeId {
        let data = attrs
            .iter()
            .fold(ElementData::new(tag_name), |data, (name, value)| {
                data.with_attr(name, value)
            });
        self.alloc(NodeType::Element(data))
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// A child that already has a parent is removed from it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.remove_from_parent(child);
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Detach `child` from `parent`. Does nothing if `child` is not a child
    /// of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.remove_from_parent(child);
        }
    }

    fn remove_from_parent(&mut self, child: NodeId) {
        let Some(parent) = self.parent(child) else {
            return;
        };
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = None;
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Index of `id` within its parent's children.
    fn index_in_parent(&self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.parent(id)?;
        let index = self.children(parent).iter().position(|&c| c == id)?;
        Some((parent, index))
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (parent, index) = self.index_in_parent(id)?;
        self.children(parent).get(index + 1).copied()
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get an element handle if this node is an element.
    #[must_use]
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.as_element(id).map(|data| ElementRef {
            tree: self,
            id,
            data,
        })
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .copied()
            .find(|&id| self.as_element(id).is_some())
    }

    /// Iterate every element in tree order.
    pub fn elements(&self) -> impl Iterator<Item = ElementRef<'_>> {
        let mut stack = vec![NodeId::ROOT];
        std::iter::from_fn(move || {
            while let Some(id) = stack.pop() {
                stack.extend(self.children(id).iter().rev().copied());
                if let Some(element) = self.element(id) {
                    return Some(element);
                }
            }
            None
        })
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// A borrowed handle to one element of a [`DomTree`].
#[derive(Debug, Clone, Copy)]
pub struct ElementRef<'a> {
    tree: &'a DomTree,
    id: NodeId,
    data: &'a ElementData,
}

impl PartialEq for ElementRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for ElementRef<'_> {}

impl<'a> ElementRef<'a> {
    /// The node id of this element.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The element's data.
    #[must_use]
    pub const fn data(&self) -> &'a ElementData {
        self.data
    }

    /// The tree this element lives in.
    #[must_use]
    pub const fn tree(&self) -> &'a DomTree {
        self.tree
    }

    /// The parent element, or `None` at the document element.
    #[must_use]
    pub fn parent_element(&self) -> Option<Self> {
        self.tree
            .parent(self.id)
            .and_then(|parent| self.tree.element(parent))
    }

    /// The closest preceding sibling that is an element.
    #[must_use]
    pub fn prev_sibling_element(&self) -> Option<Self> {
        let mut current = self.tree.prev_sibling(self.id);
        while let Some(id) = current {
            if let Some(element) = self.tree.element(id) {
                return Some(element);
            }
            current = self.tree.prev_sibling(id);
        }
        None
    }

    /// The closest following sibling that is an element.
    #[must_use]
    pub fn next_sibling_element(&self) -> Option<Self> {
        let mut current = self.tree.next_sibling(self.id);
        while let Some(id) = current {
            if let Some(element) = self.tree.element(id) {
                return Some(element);
            }
            current = self.tree.next_sibling(id);
        }
        None
    }

    /// [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    ///
    /// True if the element has no element children and no non-whitespace text.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree
            .children(self.id)
            .iter()
            .all(|&c| match self.tree.get(c).map(|n| &n.node_type) {
                Some(NodeType::Text(t)) => t.trim().is_empty(),
                Some(NodeType::Comment(_)) => true,
                _ => false,
            })
    }

    /// Whether this is the document element.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.tree.document_element() == Some(self.id)
    }
}
