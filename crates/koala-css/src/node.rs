//! The node tree every rule is built from.
//!
//! [CSSOM § 6.4 CSS Rules](https://www.w3.org/TR/cssom-1/#css-rules)
//!
//! A rule is an ordered list of child nodes. Leaf children (a selector, a
//! declaration block, a media list, a raw string) are owned in place; nested
//! rules are referenced by [`RuleId`] into the owning stylesheet's rule table,
//! so parent and owner links are plain indices rather than references.

use crate::condition::ConditionFunction;
use crate::document::DocumentFunction;
use crate::media::MediaList;
use crate::properties::StyleDeclaration;
use crate::rules::KeyframeSelector;
use crate::selector::Selector;

/// A type-safe index into a stylesheet's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(pub usize);

/// An unquoted leaf string: a charset name, a namespace prefix, a keyframes
/// name, or the source text of an unknown rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawString(pub String);

/// A URL leaf as written in the source, before resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUrl(pub String);

/// One child of a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum CssNode {
    /// A nested rule.
    Rule(RuleId),
    /// The selector of a style or page rule.
    Selector(Selector),
    /// A declaration block.
    Declarations(StyleDeclaration),
    /// The media list of a media or import rule.
    Media(MediaList),
    /// The condition of a supports rule.
    Condition(ConditionFunction),
    /// One matcher of a document rule.
    Document(DocumentFunction),
    /// The key list of a keyframe rule.
    KeyText(KeyframeSelector),
    /// A raw string leaf.
    RawString(RawString),
    /// A raw URL leaf.
    RawUrl(RawUrl),
}

/// Where a node is attached: the stylesheet's top-level list or another rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Container {
    /// The stylesheet root.
    Sheet,
    /// A grouping rule.
    Rule(RuleId),
}

/// Types that can be stored as a [`CssNode`].
pub trait NodeValue: Sized + 'static {
    /// Borrow the value if `node` holds one.
    fn from_node(node: &CssNode) -> Option<&Self>;
    /// Mutably borrow the value if `node` holds one.
    fn from_node_mut(node: &mut CssNode) -> Option<&mut Self>;
    /// Unwrap the value if `node` holds one.
    fn take_node(node: CssNode) -> Option<Self>;
    /// Wrap the value in a node.
    fn into_node(self) -> CssNode;
}

macro_rules! node_value {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl NodeValue for $ty {
                fn from_node(node: &CssNode) -> Option<&Self> {
                    match node {
                        CssNode::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn from_node_mut(node: &mut CssNode) -> Option<&mut Self> {
                    match node {
                        CssNode::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn take_node(node: CssNode) -> Option<Self> {
                    match node {
                        CssNode::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                fn into_node(self) -> CssNode {
                    CssNode::$variant(self)
                }
            }
        )*
    };
}

node_value! {
    Rule => RuleId,
    Selector => Selector,
    Declarations => StyleDeclaration,
    Media => MediaList,
    Condition => ConditionFunction,
    Document => DocumentFunction,
    KeyText => KeyframeSelector,
    RawString => RawString,
    RawUrl => RawUrl,
}

/// Typed access to a list of children.
///
/// "The selector of a style rule is its unique Selector child": each accessor
/// looks for the first child holding the requested type.
pub trait NodeList {
    /// The first child of type `T`.
    fn value<T: NodeValue>(&self) -> Option<&T>;

    /// The first child of type `T`, mutably.
    fn value_mut<T: NodeValue>(&mut self) -> Option<&mut T>;

    /// Every child of type `T`, in order.
    fn values<T: NodeValue>(&self) -> impl Iterator<Item = &T>;
}

/// Typed edits on an owned list of children.
pub trait NodeListMut {
    /// Replace the first child of type `T`, or append one if there is none.
    fn set_value<T: NodeValue>(&mut self, value: T);

    /// Remove the first child of type `T`.
    fn remove_value<T: NodeValue>(&mut self) -> Option<T>;
}

impl NodeList for [CssNode] {
    fn value<T: NodeValue>(&self) -> Option<&T> {
        self.iter().find_map(T::from_node)
    }

    fn value_mut<T: NodeValue>(&mut self) -> Option<&mut T> {
        self.iter_mut().find_map(T::from_node_mut)
    }

    fn values<T: NodeValue>(&self) -> impl Iterator<Item = &T> {
        self.iter().filter_map(T::from_node)
    }
}

impl NodeListMut for Vec<CssNode> {
    fn set_value<T: NodeValue>(&mut self, value: T) {
        match self.value_mut::<T>() {
            Some(slot) => *slot = value,
            None => self.push(value.into_node()),
        }
    }

    fn remove_value<T: NodeValue>(&mut self) -> Option<T> {
        let index = self.iter().position(|node| T::from_node(node).is_some())?;
        T::take_node(self.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_accessors() {
        let mut children = vec![
            CssNode::RawString(RawString("x".into())),
            CssNode::Rule(RuleId(3)),
            CssNode::Rule(RuleId(5)),
        ];
        assert_eq!(children.value::<RawString>(), Some(&RawString("x".into())));
        assert_eq!(children.values::<RuleId>().copied().collect::<Vec<_>>(), [RuleId(3), RuleId(5)]);
        assert_eq!(children.value::<RawUrl>(), None);

        children.set_value(RawString("y".into()));
        assert_eq!(children.len(), 3);
        children.set_value(RawUrl("a.css".into()));
        assert_eq!(children.len(), 4);

        assert_eq!(children.remove_value::<RawString>(), Some(RawString("y".into())));
        assert_eq!(children.value::<RawString>(), None);
    }
}
