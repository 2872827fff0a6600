//! Declarations and the property registry.
//!
//! [CSSOM § 6.6 CSS Declaration Blocks](https://www.w3.org/TR/cssom-1/#css-declaration-blocks)
//!
//! The registry knows which properties exist and which values each accepts.
//! It validates; it does not compute. `@supports` asks it questions without
//! storing anything, and [`StyleDeclaration::set_property`] consults it
//! before committing a value.

use core::fmt;

use crate::format::{StyleFormatter, ToCss};
use crate::parser::syntax::{ComponentValue, component_values, is_self_contained, serialize_values, trimmed};
use crate::tokenizer::{CSSToken, NumericType, tokenize};

/// A declaration value, kept as normalized source text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CssValue {
    text: String,
}

impl CssValue {
    /// Wrap already-normalized value text.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The value text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for CssValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// [CSSOM § 6.6](https://www.w3.org/TR/cssom-1/#css-declarations)
///
/// "A CSS declaration is an abstract concept that is not exposed as an object
/// in the DOM. A CSS declaration has the following associated properties:
/// property name, value, important flag."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// "The property name of the declaration."
    pub name: String,
    /// "The value of the declaration."
    pub value: CssValue,
    /// "Either set or unset. Can be changed."
    pub important: bool,
}

impl Property {
    /// Whether the registry knows this property.
    #[must_use]
    pub fn is_known(&self) -> bool {
        is_supported(&self.name)
    }
}

impl ToCss for Property {
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String {
        formatter.declaration(&self.name, self.value.as_str(), self.important)
    }
}

/// [CSSOM § 6.6.1 The CSSStyleDeclaration Interface](https://www.w3.org/TR/cssom-1/#the-cssstyledeclaration-interface)
///
/// An ordered list of declarations; a property appears at most once.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDeclaration {
    properties: Vec<Property>,
}

impl StyleDeclaration {
    /// An empty block.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            properties: Vec::new(),
        }
    }

    /// "The length attribute must return the number of CSS declarations in the declarations."
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if the block has no declarations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// The declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Property> {
        self.properties.iter()
    }

    /// The declaration for `name`, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Property> {
        let name = normalize_name(name);
        self.properties.iter().find(|p| p.name == name)
    }

    /// [getPropertyValue()](https://www.w3.org/TR/cssom-1/#dom-cssstyledeclaration-getpropertyvalue)
    #[must_use]
    pub fn get_property_value(&self, name: &str) -> Option<&str> {
        self.get(name).map(|p| p.value.as_str())
    }

    /// [getPropertyPriority()](https://www.w3.org/TR/cssom-1/#dom-cssstyledeclaration-getpropertypriority)
    ///
    /// "If property is an ASCII case-insensitive match for a property that has
    /// the important flag set, return the string "important". Return the empty string."
    #[must_use]
    pub fn get_property_priority(&self, name: &str) -> &'static str {
        if self.get(name).is_some_and(|p| p.important) {
            "important"
        } else {
            ""
        }
    }

    /// [setProperty()](https://www.w3.org/TR/cssom-1/#dom-cssstyledeclaration-setproperty)
    ///
    /// Returns false, leaving the block unchanged, if the property is unknown
    /// or the registry rejects the value.
    pub fn set_property(&mut self, name: &str, value: &str, important: bool) -> bool {
        // "If value is the empty string, invoke removeProperty() with property as
        // argument and return."
        if value.trim().is_empty() {
            let _ = self.remove_property(name);
            return true;
        }
        let tokens = tokenize(value);
        if !is_self_contained(&tokens, value) {
            return false;
        }
        let values = component_values(&tokens);
        if !accepts_values(name, &values) {
            return false;
        }
        self.push(Property {
            name: normalize_name(name),
            value: CssValue::new(serialize_values(&values, value)),
            important,
        });
        true
    }

    /// [removeProperty()](https://www.w3.org/TR/cssom-1/#dom-cssstyledeclaration-removeproperty)
    ///
    /// Returns the removed value.
    pub fn remove_property(&mut self, name: &str) -> Option<String> {
        let name = normalize_name(name);
        let index = self.properties.iter().position(|p| p.name == name)?;
        Some(self.properties.remove(index).value.text)
    }

    /// Add a declaration without validating it. A later declaration of the
    /// same property replaces the earlier one in place.
    pub fn push(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }
}

impl ToCss for StyleDeclaration {
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String {
        let declarations: Vec<String> = self.properties.iter().map(|p| p.to_css(formatter)).collect();
        formatter.declarations(&declarations)
    }
}

/// Property names are ASCII case-insensitive, custom properties are not.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    if is_custom(name) {
        name.to_string()
    } else {
        name.to_ascii_lowercase()
    }
}

/// [CSS Variables § 2](https://www.w3.org/TR/css-variables-1/#defining-variables)
///
/// "A custom property is any property whose name starts with two dashes."
fn is_custom(name: &str) -> bool {
    name.starts_with("--") && name.len() > 2
}

/// One accepted component.
#[derive(Debug, Clone, Copy)]
enum Term {
    Keyword(&'static [&'static str]),
    Length,
    Percentage,
    Number,
    Integer,
    Color,
}

/// What a property's value may look like: between `min` and `max`
/// whitespace-separated components, each matching one of `terms`.
#[derive(Debug, Clone, Copy)]
enum Grammar {
    Terms {
        terms: &'static [Term],
        min: usize,
        max: usize,
    },
    Any,
}

const fn one(terms: &'static [Term]) -> Grammar {
    Grammar::Terms { terms, min: 1, max: 1 }
}

const fn up_to(max: usize, terms: &'static [Term]) -> Grammar {
    Grammar::Terms { terms, min: 1, max }
}

const LENGTH_PERCENTAGE: &[Term] = &[Term::Length, Term::Percentage];
const LENGTH_PERCENTAGE_AUTO: &[Term] = &[Term::Length, Term::Percentage, Term::Keyword(&["auto"])];
const LENGTH_PERCENTAGE_NONE: &[Term] = &[Term::Length, Term::Percentage, Term::Keyword(&["none"])];
const COLOR: &[Term] = &[Term::Color];
const BORDER_STYLE: &[Term] = &[Term::Keyword(&[
    "none", "hidden", "dotted", "dashed", "solid", "double", "groove", "ridge", "inset", "outset",
])];
const BORDER_WIDTH: &[Term] = &[Term::Length, Term::Keyword(&["thin", "medium", "thick"])];
const OVERFLOW: &[Term] = &[Term::Keyword(&["visible", "hidden", "clip", "scroll", "auto"])];
const ALIGNMENT: &[Term] = &[Term::Keyword(&[
    "normal",
    "stretch",
    "center",
    "start",
    "end",
    "flex-start",
    "flex-end",
    "baseline",
    "space-between",
    "space-around",
    "space-evenly",
    "left",
    "right",
])];

/// The properties this registry recognizes.
const PROPERTIES: &[(&str, Grammar)] = &[
    (
        "display",
        one(&[Term::Keyword(&[
            "none",
            "block",
            "inline",
            "inline-block",
            "flex",
            "inline-flex",
            "grid",
            "inline-grid",
            "table",
            "table-row",
            "table-cell",
            "list-item",
            "contents",
            "flow-root",
        ])]),
    ),
    (
        "position",
        one(&[Term::Keyword(&["static", "relative", "absolute", "fixed", "sticky"])]),
    ),
    ("top", one(LENGTH_PERCENTAGE_AUTO)),
    ("right", one(LENGTH_PERCENTAGE_AUTO)),
    ("bottom", one(LENGTH_PERCENTAGE_AUTO)),
    ("left", one(LENGTH_PERCENTAGE_AUTO)),
    ("color", one(COLOR)),
    ("background-color", one(COLOR)),
    ("border-color", up_to(4, COLOR)),
    ("margin", up_to(4, LENGTH_PERCENTAGE_AUTO)),
    ("margin-top", one(LENGTH_PERCENTAGE_AUTO)),
    ("margin-right", one(LENGTH_PERCENTAGE_AUTO)),
    ("margin-bottom", one(LENGTH_PERCENTAGE_AUTO)),
    ("margin-left", one(LENGTH_PERCENTAGE_AUTO)),
    ("padding", up_to(4, LENGTH_PERCENTAGE)),
    ("padding-top", one(LENGTH_PERCENTAGE)),
    ("padding-right", one(LENGTH_PERCENTAGE)),
    ("padding-bottom", one(LENGTH_PERCENTAGE)),
    ("padding-left", one(LENGTH_PERCENTAGE)),
    ("width", one(LENGTH_PERCENTAGE_AUTO)),
    ("height", one(LENGTH_PERCENTAGE_AUTO)),
    ("min-width", one(LENGTH_PERCENTAGE_AUTO)),
    ("min-height", one(LENGTH_PERCENTAGE_AUTO)),
    ("max-width", one(LENGTH_PERCENTAGE_NONE)),
    ("max-height", one(LENGTH_PERCENTAGE_NONE)),
    (
        "font-size",
        one(&[
            Term::Length,
            Term::Percentage,
            Term::Keyword(&[
                "xx-small", "x-small", "small", "medium", "large", "x-large", "xx-large", "smaller", "larger",
            ]),
        ]),
    ),
    (
        "font-weight",
        one(&[Term::Integer, Term::Keyword(&["normal", "bold", "bolder", "lighter"])]),
    ),
    ("font-style", one(&[Term::Keyword(&["normal", "italic", "oblique"])])),
    ("font-family", Grammar::Any),
    ("font", Grammar::Any),
    (
        "line-height",
        one(&[Term::Number, Term::Length, Term::Percentage, Term::Keyword(&["normal"])]),
    ),
    ("opacity", one(&[Term::Number, Term::Percentage])),
    ("z-index", one(&[Term::Integer, Term::Keyword(&["auto"])])),
    ("visibility", one(&[Term::Keyword(&["visible", "hidden", "collapse"])])),
    ("float", one(&[Term::Keyword(&["left", "right", "none"])])),
    ("clear", one(&[Term::Keyword(&["none", "left", "right", "both"])])),
    ("overflow", up_to(2, OVERFLOW)),
    ("overflow-x", one(OVERFLOW)),
    ("overflow-y", one(OVERFLOW)),
    (
        "text-align",
        one(&[Term::Keyword(&["left", "right", "center", "justify", "start", "end"])]),
    ),
    ("text-decoration", Grammar::Any),
    ("text-transform", one(&[Term::Keyword(&["none", "capitalize", "uppercase", "lowercase"])])),
    (
        "white-space",
        one(&[Term::Keyword(&["normal", "nowrap", "pre", "pre-wrap", "pre-line", "break-spaces"])]),
    ),
    ("border", Grammar::Any),
    ("border-style", up_to(4, BORDER_STYLE)),
    ("border-width", up_to(4, BORDER_WIDTH)),
    ("border-radius", up_to(4, LENGTH_PERCENTAGE)),
    ("background", Grammar::Any),
    ("background-image", Grammar::Any),
    ("box-sizing", one(&[Term::Keyword(&["content-box", "border-box"])])),
    (
        "flex-direction",
        one(&[Term::Keyword(&["row", "row-reverse", "column", "column-reverse"])]),
    ),
    ("flex-wrap", one(&[Term::Keyword(&["nowrap", "wrap", "wrap-reverse"])])),
    ("flex-grow", one(&[Term::Number])),
    ("flex-shrink", one(&[Term::Number])),
    ("justify-content", one(ALIGNMENT)),
    ("align-items", one(ALIGNMENT)),
    ("gap", up_to(2, LENGTH_PERCENTAGE)),
    ("list-style-type", Grammar::Any),
    ("cursor", Grammar::Any),
    ("content", Grammar::Any),
    ("transform", Grammar::Any),
    ("transition", Grammar::Any),
    ("src", Grammar::Any),
    ("unicode-range", Grammar::Any),
];

/// [CSS Values § 3 CSS-wide keywords](https://www.w3.org/TR/css-values-4/#common-keywords)
const GLOBAL_KEYWORDS: [&str; 3] = ["inherit", "initial", "unset"];

/// [CSS Values § 6.2 Absolute lengths and § 6.1 Relative lengths](https://www.w3.org/TR/css-values-4/#lengths)
const LENGTH_UNITS: [&str; 14] = [
    "px", "em", "rem", "ex", "ch", "vw", "vh", "vmin", "vmax", "cm", "mm", "in", "pt", "pc",
];

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
const NAMED_COLORS: [&str; 24] = [
    "black",
    "white",
    "red",
    "green",
    "blue",
    "yellow",
    "gray",
    "grey",
    "orange",
    "purple",
    "silver",
    "maroon",
    "olive",
    "lime",
    "aqua",
    "teal",
    "navy",
    "fuchsia",
    "cyan",
    "magenta",
    "pink",
    "brown",
    "transparent",
    "currentcolor",
];

fn grammar(name: &str) -> Option<Grammar> {
    if is_custom(name) {
        return Some(Grammar::Any);
    }
    PROPERTIES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, grammar)| *grammar)
}

/// Whether `name` is a recognized property (custom properties always are).
#[must_use]
pub fn is_supported(name: &str) -> bool {
    grammar(name).is_some()
}

/// Whether the property `name` would accept `value`.
#[must_use]
pub fn accepts(name: &str, value: &str) -> bool {
    accepts_values(name, &component_values(&tokenize(value)))
}

/// Whether the property `name` would accept the component values.
#[must_use]
pub fn accepts_values(name: &str, values: &[ComponentValue]) -> bool {
    let Some(grammar) = grammar(name) else {
        return false;
    };
    let values = trimmed(values);
    if !is_declaration_value(values) {
        return false;
    }
    if is_custom(name) {
        return true;
    }
    if values.is_empty() {
        return false;
    }
    // "In addition to the property-specific values listed in their definitions,
    // all properties defined in this specification also accept the CSS-wide
    // keywords as their property value."
    if let [value] = values
        && GLOBAL_KEYWORDS.iter().any(|keyword| value.is_ident(keyword))
    {
        return true;
    }
    // A var() reference can only be checked at computed-value time.
    if values.iter().any(contains_var) {
        return true;
    }
    match grammar {
        Grammar::Any => true,
        Grammar::Terms { terms, min, max } => {
            let components: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
            (min..=max).contains(&components.len())
                && components
                    .iter()
                    .all(|value| terms.iter().any(|term| term_matches(*term, value)))
        }
    }
}

/// [CSS Syntax § 8.2](https://www.w3.org/TR/css-syntax-3/#typedef-declaration-value)
///
/// "`<declaration-value>` ... any sequence of one or more tokens, so long as
/// the sequence does not contain `<bad-string-token>`, `<bad-url-token>`,
/// unmatched `<)-token>`, `<]-token>`, or `<}-token>`, or top-level
/// `<semicolon-token>` tokens or `<delim-token>` tokens with a value of "!"."
pub(crate) fn is_declaration_value(values: &[ComponentValue]) -> bool {
    values.iter().all(|value| {
        !matches!(value.token(), Some(CSSToken::Semicolon | CSSToken::Delim('!'))) && is_nested_value(value)
    })
}

fn is_nested_value(value: &ComponentValue) -> bool {
    match value {
        ComponentValue::Token(token) => !matches!(
            token.kind,
            CSSToken::BadString
                | CSSToken::BadUrl
                | CSSToken::RightBrace
                | CSSToken::RightBracket
                | CSSToken::RightParen
        ),
        ComponentValue::Function { value, .. } | ComponentValue::Block { value, .. } => {
            value.iter().all(is_nested_value)
        }
    }
}

fn contains_var(value: &ComponentValue) -> bool {
    match value {
        ComponentValue::Function { name, value, .. } => {
            name.eq_ignore_ascii_case("var") || value.iter().any(contains_var)
        }
        ComponentValue::Block { value, .. } => value.iter().any(contains_var),
        ComponentValue::Token(_) => false,
    }
}

fn term_matches(term: Term, value: &ComponentValue) -> bool {
    if let ComponentValue::Function { name, .. } = value {
        // [CSS Values § 10.1](https://www.w3.org/TR/css-values-4/#calc-func)
        return match term {
            Term::Length | Term::Percentage | Term::Number | Term::Integer => name.eq_ignore_ascii_case("calc"),
            // [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
            Term::Color => ["rgb", "rgba", "hsl", "hsla"]
                .iter()
                .any(|f| name.eq_ignore_ascii_case(f)),
            Term::Keyword(_) => false,
        };
    }
    let Some(token) = value.token() else {
        return false;
    };
    match (term, token) {
        (Term::Keyword(keywords), CSSToken::Ident(ident)) => keywords.iter().any(|k| k.eq_ignore_ascii_case(ident)),
        (Term::Length, CSSToken::Dimension { unit, .. }) => LENGTH_UNITS.iter().any(|u| u.eq_ignore_ascii_case(unit)),
        // "unitless zero" is a valid <length>.
        (Term::Length, CSSToken::Number { value, .. }) => *value == 0.0,
        (Term::Percentage, CSSToken::Percentage { .. }) | (Term::Number, CSSToken::Number { .. }) => true,
        (
            Term::Integer,
            CSSToken::Number {
                numeric_type: NumericType::Integer,
                ..
            },
        ) => true,
        // "The syntax of a <hex-color> is a <hash-token> token whose value consists
        // of 3, 4, 6, or 8 hexadecimal digits."
        (Term::Color, CSSToken::Hash { value, .. }) => {
            matches!(value.len(), 3 | 4 | 6 | 8) && value.bytes().all(|b| b.is_ascii_hexdigit())
        }
        (Term::Color, CSSToken::Ident(ident)) => NAMED_COLORS.iter().any(|c| c.eq_ignore_ascii_case(ident)),
        _ => false,
    }
}
