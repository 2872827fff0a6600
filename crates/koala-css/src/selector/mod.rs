//! CSS Selector matching and specificity
//!
//! This module implements the selector model of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/): simple, compound,
//! complex and list selectors, the child-indexed family, and a placeholder
//! for selectors that could not be parsed.

mod element;
mod nth;
mod parse;

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, AddAssign};
use std::borrow::Cow;
use std::iter::successors;

use serde::Serialize;

pub use element::Element;
pub use nth::{NthKind, NthSelector, matches_position, parse_an_plus_b};
pub(crate) use parse::parse_selector_list;

use crate::format::{serialize_identifier, serialize_string};

/// [§ 17 Calculating Specificity](https://www.w3.org/TR/selectors-4/#specificity-rules)
/// "A selector's specificity is calculated for a given element as follows:
///  - count the number of ID selectors in the selector (= A)
///  - count the number of class selectors, attributes selectors, and pseudo-classes in the selector (= B)
///  - count the number of type selectors and pseudo-elements in the selector (= C)
///
/// Specificities are compared by comparing the three components in order."
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    /// No weight at all (the universal selector).
    pub const ZERO: Self = Self(0, 0, 0);
    /// One type selector or pseudo-element.
    pub const ONE_TAG: Self = Self(0, 0, 1);
    /// One class, attribute selector or pseudo-class.
    pub const ONE_CLASS: Self = Self(0, 1, 0);
    /// One ID selector.
    pub const ONE_ID: Self = Self(1, 0, 0);

    /// Create a new specificity with (A, B, C) components.
    #[must_use]
    pub const fn new(a: u32, b: u32, c: u32) -> Self {
        Self(a, b, c)
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(
            self.0.saturating_add(rhs.0),
            self.1.saturating_add(rhs.1),
            self.2.saturating_add(rhs.2),
        )
    }
}

impl AddAssign for Specificity {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Specificity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Specificity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.0, self.1, self.2)
    }
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// [§ 14.1 :root](https://www.w3.org/TR/selectors-4/#the-root-pseudo)
    /// "The :root pseudo-class represents an element that is the root of the document."
    Root,
    /// [§ 14.4.3 :first-child](https://www.w3.org/TR/selectors-4/#the-first-child-pseudo)
    /// "The :first-child pseudo-class represents an element that is first among its
    /// inclusive siblings."
    FirstChild,
    /// [§ 14.4.4 :last-child](https://www.w3.org/TR/selectors-4/#the-last-child-pseudo)
    LastChild,
    /// [§ 14.4.5 :only-child](https://www.w3.org/TR/selectors-4/#the-only-child-pseudo)
    /// "The :only-child pseudo-class represents an element that has no siblings."
    OnlyChild,
    /// [§ 14.5.3 :first-of-type](https://www.w3.org/TR/selectors-4/#the-first-of-type-pseudo)
    FirstOfType,
    /// [§ 14.5.4 :last-of-type](https://www.w3.org/TR/selectors-4/#the-last-of-type-pseudo)
    LastOfType,
    /// [§ 14.5.5 :only-of-type](https://www.w3.org/TR/selectors-4/#the-only-of-type-pseudo)
    OnlyOfType,
    /// [§ 14.2 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
    /// "The :empty pseudo-class represents an element that has no children except,
    /// optionally, document white space characters."
    Empty,
    /// [§ 8.2 :link](https://www.w3.org/TR/selectors-4/#the-link-pseudo)
    /// Every link is treated as unvisited.
    Link,
    /// [§ 13.1.1 :enabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Enabled,
    /// [§ 13.1.1 :disabled](https://www.w3.org/TR/selectors-4/#enableddisabled)
    Disabled,
    /// [§ 13.3.3 :checked](https://www.w3.org/TR/selectors-4/#checked)
    Checked,
    /// `:hover`, never matches.
    Hover,
    /// `:focus`, never matches.
    Focus,
    /// `:active`, never matches.
    Active,
    /// `:visited`, never matches.
    Visited,
    /// `:target`, never matches.
    Target,
    /// [CSS Paged Media § 4.2](https://www.w3.org/TR/css-page-3/#page-selectors) `:first`.
    First,
    /// `:left` page.
    Left,
    /// `:right` page.
    Right,
    /// `:blank` page.
    Blank,
}

const PSEUDO_CLASSES: [(PseudoClass, &str); 21] = [
    (PseudoClass::Root, "root"),
    (PseudoClass::FirstChild, "first-child"),
    (PseudoClass::LastChild, "last-child"),
    (PseudoClass::OnlyChild, "only-child"),
    (PseudoClass::FirstOfType, "first-of-type"),
    (PseudoClass::LastOfType, "last-of-type"),
    (PseudoClass::OnlyOfType, "only-of-type"),
    (PseudoClass::Empty, "empty"),
    (PseudoClass::Link, "link"),
    (PseudoClass::Enabled, "enabled"),
    (PseudoClass::Disabled, "disabled"),
    (PseudoClass::Checked, "checked"),
    (PseudoClass::Hover, "hover"),
    (PseudoClass::Focus, "focus"),
    (PseudoClass::Active, "active"),
    (PseudoClass::Visited, "visited"),
    (PseudoClass::Target, "target"),
    (PseudoClass::First, "first"),
    (PseudoClass::Left, "left"),
    (PseudoClass::Right, "right"),
    (PseudoClass::Blank, "blank"),
];

/// Elements that can be enabled or disabled.
const FORM_ELEMENTS: [&str; 7] = ["button", "input", "select", "textarea", "option", "optgroup", "fieldset"];

impl PseudoClass {
    /// The pseudo-class name without the colon.
    #[must_use]
    pub fn name(self) -> &'static str {
        PSEUDO_CLASSES
            .iter()
            .find(|(pc, _)| *pc == self)
            .map_or("", |(_, name)| *name)
    }

    /// Look a pseudo-class up by name, ASCII case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        PSEUDO_CLASSES
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(pc, _)| *pc)
    }

    /// Match against an element.
    pub fn matches<E: Element>(self, element: &E) -> bool {
        let same_type = |sibling: &E| sibling.local_name().eq_ignore_ascii_case(element.local_name());
        match self {
            Self::Root => element.is_root(),
            Self::FirstChild => element.prev_sibling_element().is_none(),
            Self::LastChild => element.next_sibling_element().is_none(),
            Self::OnlyChild => {
                element.prev_sibling_element().is_none() && element.next_sibling_element().is_none()
            }
            Self::FirstOfType => !preceding(element).any(|s| same_type(&s)),
            Self::LastOfType => !following(element).any(|s| same_type(&s)),
            Self::OnlyOfType => {
                !preceding(element).any(|s| same_type(&s)) && !following(element).any(|s| same_type(&s))
            }
            Self::Empty => element.is_empty(),
            // "The :link pseudo-class applies to links that have not yet been visited."
            Self::Link => {
                ["a", "area", "link"]
                    .iter()
                    .any(|tag| element.local_name().eq_ignore_ascii_case(tag))
                    && element.attribute("href").is_some()
            }
            Self::Enabled => is_form_element(element) && element.attribute("disabled").is_none(),
            Self::Disabled => is_form_element(element) && element.attribute("disabled").is_some(),
            Self::Checked => {
                let name = element.local_name();
                (name.eq_ignore_ascii_case("input") && element.attribute("checked").is_some())
                    || (name.eq_ignore_ascii_case("option") && element.attribute("selected").is_some())
            }
            // Dynamic and page states are never true for a static document.
            Self::Hover
            | Self::Focus
            | Self::Active
            | Self::Visited
            | Self::Target
            | Self::First
            | Self::Left
            | Self::Right
            | Self::Blank => false,
        }
    }
}

fn is_form_element<E: Element>(element: &E) -> bool {
    FORM_ELEMENTS
        .iter()
        .any(|tag| element.local_name().eq_ignore_ascii_case(tag))
}

fn preceding<E: Element>(element: &E) -> impl Iterator<Item = E> {
    successors(element.prev_sibling_element(), E::prev_sibling_element)
}

fn following<E: Element>(element: &E) -> impl Iterator<Item = E> {
    successors(element.next_sibling_element(), E::next_sibling_element)
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeOp {
    /// `[att]` "Represents an element with the att attribute, whatever the value
    /// of the attribute."
    Exists,
    /// `[att=val]` "Represents an element with the att attribute whose value is
    /// exactly "val"."
    Equals,
    /// `[att~=val]` "Represents an element with the att attribute whose value is a
    /// whitespace-separated list of words, one of which is exactly "val"."
    Includes,
    /// `[att|=val]` "Represents an element with the att attribute, its value either
    /// being exactly "val" or beginning with "val" immediately followed by "-"."
    DashMatch,
    /// `[att^=val]` "Represents an element with the att attribute whose value begins
    /// with the prefix "val"."
    Prefix,
    /// `[att$=val]` "Represents an element with the att attribute whose value ends
    /// with the suffix "val"."
    Suffix,
    /// `[att*=val]` "Represents an element with the att attribute whose value
    /// contains at least one instance of the substring "val"."
    Substring,
}

impl AttributeOp {
    /// The operator as written, empty for [`AttributeOp::Exists`].
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Exists => "",
            Self::Equals => "=",
            Self::Includes => "~=",
            Self::DashMatch => "|=",
            Self::Prefix => "^=",
            Self::Suffix => "$=",
            Self::Substring => "*=",
        }
    }

    /// The operator for the delimiter preceding `=`, or `None` for a bare `=`.
    #[must_use]
    pub const fn from_delim(c: char) -> Option<Self> {
        match c {
            '~' => Some(Self::Includes),
            '|' => Some(Self::DashMatch),
            '^' => Some(Self::Prefix),
            '$' => Some(Self::Suffix),
            '*' => Some(Self::Substring),
            _ => None,
        }
    }
}

/// An attribute selector, optionally namespace-qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSelector {
    /// The attribute's local name.
    pub name: String,
    /// The namespace prefix: `None` for no `|`, `Some("")` for `|att`, `Some("*")` for any.
    pub prefix: Option<String>,
    /// The comparison.
    pub op: AttributeOp,
    /// The operand (empty for [`AttributeOp::Exists`]).
    pub value: String,
    /// The `i` flag.
    pub case_insensitive: bool,
}

impl AttributeSelector {
    /// `[name]`
    #[must_use]
    pub fn exists(name: &str) -> Self {
        Self::with_op(name, AttributeOp::Exists, "")
    }

    /// `[name<op>"value"]`
    #[must_use]
    pub fn with_op(name: &str, op: AttributeOp, value: &str) -> Self {
        Self {
            name: name.to_string(),
            prefix: None,
            op,
            value: value.to_string(),
            case_insensitive: false,
        }
    }

    /// Match against an element's attributes.
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        let qualified = match self.prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() && prefix != "*" => Cow::Owned(format!("{prefix}:{}", self.name)),
            _ => Cow::Borrowed(self.name.as_str()),
        };
        let Some(actual) = element.attribute(&qualified) else {
            return false;
        };
        let (actual, expected) = if self.case_insensitive {
            (
                Cow::Owned(actual.to_ascii_lowercase()),
                Cow::Owned(self.value.to_ascii_lowercase()),
            )
        } else {
            (Cow::Borrowed(actual), Cow::Borrowed(self.value.as_str()))
        };
        let (actual, expected) = (actual.as_ref(), expected.as_ref());
        match self.op {
            AttributeOp::Exists => true,
            AttributeOp::Equals => actual == expected,
            // "If "val" is the empty string, the selector does not represent anything."
            _ if expected.is_empty() => false,
            AttributeOp::Includes => actual.split_ascii_whitespace().any(|word| word == expected),
            AttributeOp::DashMatch => {
                actual == expected || actual.strip_prefix(expected).is_some_and(|rest| rest.starts_with('-'))
            }
            AttributeOp::Prefix => actual.starts_with(expected),
            AttributeOp::Suffix => actual.ends_with(expected),
            AttributeOp::Substring => actual.contains(expected),
        }
    }
}

impl fmt::Display for AttributeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        write_prefix(f, self.prefix.as_deref())?;
        f.write_str(&serialize_identifier(&self.name))?;
        if self.op != AttributeOp::Exists {
            write!(f, "{}{}", self.op.symbol(), serialize_string(&self.value))?;
            if self.case_insensitive {
                f.write_str(" i")?;
            }
        }
        f.write_str("]")
    }
}

fn write_prefix(f: &mut fmt::Formatter<'_>, prefix: Option<&str>) -> fmt::Result {
    match prefix {
        None => Ok(()),
        Some("*") => f.write_str("*|"),
        Some(prefix) => write!(f, "{}|", serialize_identifier(prefix)),
    }
}

fn namespace_matches<E: Element>(prefix: Option<&str>, element: &E) -> bool {
    match prefix {
        None | Some("*") => true,
        Some("") => element.namespace_prefix().is_none(),
        Some(prefix) => element.namespace_prefix() == Some(prefix),
    }
}

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
///
/// A simple selector is a single condition on an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// [§ 5.2 Universal selector](https://www.w3.org/TR/selectors-4/#universal-selector)
    /// "The universal selector is a single asterisk (*) and represents the
    /// qualified name of any element type."
    Universal(Option<String>),

    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    Type {
        /// The namespace prefix, as on [`AttributeSelector::prefix`].
        prefix: Option<String>,
        /// The local name.
        name: String,
    },

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    Class(String),

    /// [§ 6.7 ID selector](https://www.w3.org/TR/selectors-4/#id-selectors)
    Id(String),

    /// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
    PseudoClass(PseudoClass),

    /// [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
    /// Parsed and serialized, never matched against elements.
    PseudoElement(String),

    /// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
    Attribute(AttributeSelector),
}

impl SimpleSelector {
    /// A type selector without a namespace.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::Type {
            prefix: None,
            name: name.to_string(),
        }
    }

    /// Specificity of this simple selector alone.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        match self {
            // "ignore the universal selector"
            Self::Universal(_) => Specificity::ZERO,
            Self::Type { .. } | Self::PseudoElement(_) => Specificity::ONE_TAG,
            Self::Class(_) | Self::PseudoClass(_) | Self::Attribute(_) => Specificity::ONE_CLASS,
            Self::Id(_) => Specificity::ONE_ID,
        }
    }

    /// Check if this simple selector matches the given element.
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        match self {
            Self::Universal(prefix) => namespace_matches(prefix.as_deref(), element),
            // "A type selector written in the style sheet as an identifier represents
            // an element in the document tree with the same qualified name as the identifier."
            Self::Type { prefix, name } => {
                namespace_matches(prefix.as_deref(), element) && element.local_name().eq_ignore_ascii_case(name)
            }
            Self::Class(class) => element.has_class(class),
            Self::Id(id) => element.element_id() == Some(id.as_str()),
            Self::PseudoClass(pc) => pc.matches(element),
            Self::PseudoElement(_) => false,
            Self::Attribute(attribute) => attribute.matches(element),
        }
    }
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Universal(prefix) => {
                write_prefix(f, prefix.as_deref())?;
                f.write_str("*")
            }
            Self::Type { prefix, name } => {
                write_prefix(f, prefix.as_deref())?;
                f.write_str(&serialize_identifier(name))
            }
            Self::Class(class) => write!(f, ".{}", serialize_identifier(class)),
            Self::Id(id) => write!(f, "#{}", serialize_identifier(id)),
            Self::PseudoClass(pc) => write!(f, ":{}", pc.name()),
            Self::PseudoElement(name) => write!(f, "::{name}"),
            Self::Attribute(attribute) => write!(f, "{attribute}"),
        }
    }
}

/// [§ 16 Combinators](https://www.w3.org/TR/selectors-4/#combinators)
///
/// "A combinator is punctuation that represents a particular kind of
/// relationship between the selectors on either side."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    Descendant,
    /// [§ 16.2 Child combinator](https://www.w3.org/TR/selectors-4/#child-combinators)
    /// "A selector of the form 'A > B' represents an element B that is
    /// a direct child of element A."
    Child,
    /// [§ 16.3 Next-sibling combinator](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
    /// "A selector of the form 'A + B' represents an element B that
    /// immediately follows element A, where A and B share the same parent."
    NextSibling,
    /// [§ 16.4 Subsequent-sibling combinator](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
    /// "A selector of the form 'A ~ B' represents an element B that
    /// follows element A (not necessarily immediately), where A and B share the
    /// same parent."
    SubsequentSibling,
}

impl Combinator {
    /// The elements the left-hand selector is tried against, nearest first.
    fn candidates<E: Element>(self, element: &E) -> impl Iterator<Item = E> {
        let (step, limit): (fn(&E) -> Option<E>, usize) = match self {
            Self::Descendant => (E::parent_element, usize::MAX),
            Self::Child => (E::parent_element, 1),
            Self::NextSibling => (E::prev_sibling_element, 1),
            Self::SubsequentSibling => (E::prev_sibling_element, usize::MAX),
        };
        successors(step(element), step).take(limit)
    }

    const fn separator(self) -> &'static str {
        match self {
            Self::Descendant => " ",
            Self::Child => " > ",
            Self::NextSibling => " + ",
            Self::SubsequentSibling => " ~ ",
        }
    }
}

/// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
///
/// "A complex selector is a chain of one or more compound selectors separated
/// by combinators."
///
/// Example: `div.container > ul.nav li`
/// ```text
/// subject: li
/// links:   [(Descendant, ul.nav), (Child, div.container)]
/// ```
/// The order is right-to-left because matching starts at the subject.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexSelector {
    /// The rightmost compound (the subject of the selector).
    pub subject: Box<Selector>,
    /// `(combinator, compound)` pairs going left from the subject.
    pub links: Vec<(Combinator, Selector)>,
}

impl ComplexSelector {
    /// Specificity is the sum over every compound.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.subject.specificity() + self.links.iter().map(|(_, compound)| compound.specificity()).sum::<Specificity>()
    }

    /// The subject must match first; then each link must be satisfied by at
    /// least one related element, trying every candidate depth-first.
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        self.subject.matches(element) && self.matches_links(element, 0)
    }

    fn matches_links<E: Element>(&self, element: &E, index: usize) -> bool {
        let Some((combinator, compound)) = self.links.get(index) else {
            return true;
        };
        combinator
            .candidates(element)
            .any(|candidate| compound.matches(&candidate) && self.matches_links(&candidate, index + 1))
    }
}

impl fmt::Display for ComplexSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (combinator, compound) in self.links.iter().rev() {
            write!(f, "{compound}{}", combinator.separator())?;
        }
        write!(f, "{}", self.subject)
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// A single simple selector.
    Simple(SimpleSelector),
    /// The child-indexed family (`:nth-child()` and relatives).
    Child(NthSelector),
    /// [§ 4.3 :not()](https://www.w3.org/TR/selectors-4/#negation)
    Not(Box<Selector>),
    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    /// "a sequence of simple selectors that are not separated by a combinator"
    Compound(Vec<Selector>),
    /// Compounds joined by combinators.
    Complex(ComplexSelector),
    /// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
    List(Vec<Selector>),
    /// Source text that could not be parsed. Never matches.
    Unknown(String),
}

impl Selector {
    /// `*`
    #[must_use]
    pub const fn universal() -> Self {
        Self::Simple(SimpleSelector::Universal(None))
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// Lists report their most specific alternative.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Simple(simple) => simple.specificity(),
            Self::Child(nth) => nth.specificity(),
            // "The specificity of an :is(), :not(), or :has() pseudo-class is replaced
            // by the specificity of the most specific complex selector in its selector
            // list argument."
            Self::Not(inner) => inner.specificity(),
            Self::Compound(parts) => parts.iter().map(Self::specificity).sum(),
            Self::Complex(complex) => complex.specificity(),
            Self::List(alternatives) => alternatives
                .iter()
                .map(Self::specificity)
                .max()
                .unwrap_or_default(),
            Self::Unknown(_) => Specificity::ZERO,
        }
    }

    /// [§ 3.6.2 Match a selector against an element](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        match self {
            Self::Simple(simple) => simple.matches(element),
            Self::Child(nth) => nth.matches(element),
            Self::Not(inner) => !inner.matches(element),
            Self::Compound(parts) => parts.iter().all(|part| part.matches(element)),
            Self::Complex(complex) => complex.matches(element),
            Self::List(alternatives) => alternatives.iter().any(|alternative| alternative.matches(element)),
            Self::Unknown(_) => false,
        }
    }

    /// The specificity this selector applies with, or `None` if it does not
    /// match. For lists this is the most specific matching alternative.
    pub fn matching_specificity<E: Element>(&self, element: &E) -> Option<Specificity> {
        match self {
            Self::List(alternatives) => alternatives
                .iter()
                .filter(|alternative| alternative.matches(element))
                .map(Self::specificity)
                .max(),
            _ => self.matches(element).then(|| self.specificity()),
        }
    }

    /// True for the placeholder kept in place of unparsable text.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Simple(simple) => write!(f, "{simple}"),
            Self::Child(nth) => write!(f, "{nth}"),
            Self::Not(inner) => write!(f, ":not({inner})"),
            Self::Compound(parts) => parts.iter().try_for_each(|part| write!(f, "{part}")),
            Self::Complex(complex) => write!(f, "{complex}"),
            Self::List(alternatives) => {
                for (index, alternative) in alternatives.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{alternative}")?;
                }
                Ok(())
            }
            Self::Unknown(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    fn spec(a: u8, b: u8, c: u8) -> Specificity {
        Specificity::new(a.into(), b.into(), c.into())
    }

    #[test]
    fn test_specificity_ordering() {
        assert!(Specificity::ONE_ID > Specificity::ONE_CLASS);
        assert!(Specificity::ONE_CLASS > Specificity::ONE_TAG);
        assert!(Specificity::new(0, 1, 0) > Specificity::new(0, 0, 99));
    }

    #[test]
    fn test_compound_specificity_is_sum() {
        let compound = Selector::Compound(vec![
            Selector::Simple(SimpleSelector::tag("div")),
            Selector::Simple(SimpleSelector::Class("a".into())),
            Selector::Simple(SimpleSelector::Id("b".into())),
        ]);
        assert_eq!(compound.specificity(), Specificity::new(1, 1, 1));
        assert_eq!(compound.to_string(), "div.a#b");
    }

    #[test]
    fn test_attribute_display() {
        let mut attribute = AttributeSelector::with_op("lang", AttributeOp::DashMatch, "en");
        attribute.case_insensitive = true;
        assert_eq!(attribute.to_string(), "[lang|=\"en\" i]");
        assert_eq!(AttributeSelector::exists("href").to_string(), "[href]");
    }

    #[test]
    fn test_pseudo_class_names_round_trip() {
        for (pc, name) in PSEUDO_CLASSES {
            assert_eq!(PseudoClass::from_name(name), Some(pc));
            assert_eq!(pc.name(), name);
        }
    }

    #[quickcheck]
    fn specificity_addition_commutes(a: (u8, u8, u8), b: (u8, u8, u8)) -> bool {
        let (x, y) = (spec(a.0, a.1, a.2), spec(b.0, b.1, b.2));
        x + y == y + x
    }

    #[quickcheck]
    fn specificity_addition_associates(a: (u8, u8, u8), b: (u8, u8, u8), c: (u8, u8, u8)) -> bool {
        let (x, y, z) = (spec(a.0, a.1, a.2), spec(b.0, b.1, b.2), spec(c.0, c.1, c.2));
        (x + y) + z == x + (y + z)
    }
}
