//! The element surface selector matching needs.

use koala_dom::ElementRef;

/// [§ 3.1 Structure and Terminology](https://www.w3.org/TR/selectors-4/#structure)
///
/// An element in a document tree. Matching only walks upward and sideways,
/// so a handle must be able to reach its parent and its element siblings.
pub trait Element: Clone {
    /// The element's local name, without a namespace prefix.
    fn local_name(&self) -> &str;

    /// The element's namespace prefix, if any.
    fn namespace_prefix(&self) -> Option<&str>;

    /// The value of the `id` attribute.
    fn element_id(&self) -> Option<&str>;

    /// Whether the `class` attribute contains `name`.
    fn has_class(&self, name: &str) -> bool;

    /// Attribute lookup by (possibly `prefix:name` qualified) name.
    fn attribute(&self, name: &str) -> Option<&str>;

    /// The parent element, or `None` at the root.
    fn parent_element(&self) -> Option<Self>;

    /// The closest preceding element sibling.
    fn prev_sibling_element(&self) -> Option<Self>;

    /// The closest following element sibling.
    fn next_sibling_element(&self) -> Option<Self>;

    /// True if the element has no element children and no non-whitespace text.
    fn is_empty(&self) -> bool;

    /// True for the document element.
    fn is_root(&self) -> bool;
}

impl Element for ElementRef<'_> {
    fn local_name(&self) -> &str {
        &self.data().local_name
    }

    fn namespace_prefix(&self) -> Option<&str> {
        self.data().prefix.as_deref()
    }

    fn element_id(&self) -> Option<&str> {
        self.data().id()
    }

    fn has_class(&self, name: &str) -> bool {
        self.data().classes().any(|class| class == name)
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.data().attribute(name)
    }

    fn parent_element(&self) -> Option<Self> {
        ElementRef::parent_element(self)
    }

    fn prev_sibling_element(&self) -> Option<Self> {
        ElementRef::prev_sibling_element(self)
    }

    fn next_sibling_element(&self) -> Option<Self> {
        ElementRef::next_sibling_element(self)
    }

    fn is_empty(&self) -> bool {
        ElementRef::is_empty(self)
    }

    fn is_root(&self) -> bool {
        ElementRef::is_root(self)
    }
}
