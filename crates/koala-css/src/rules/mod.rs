//! The rule object model.
//!
//! [CSSOM § 6.4 CSS Rules](https://www.w3.org/TR/cssom-1/#css-rules)
//!
//! "A CSS rule is an abstract concept that denotes a rule as defined by the
//! CSS specification." Rules live in their stylesheet's rule table; a
//! [`RuleRef`] pairs the table with one rule so callers can read it without
//! threading the sheet through every call.

mod import;
mod stylesheet;

use core::fmt;

use serde::Serialize;
use url::Url;

pub use stylesheet::{SheetId, StyleSheet};

use crate::condition::ConditionFunction;
use crate::document::DocumentFunction;
use crate::error::CssError;
use crate::format::{StyleFormatter, ToCss, serialize_identifier, serialize_string, serialize_url};
use crate::media::{MediaList, RenderDevice};
use crate::node::{Container, CssNode, NodeList, RawString, RawUrl, RuleId};
use crate::parser::syntax::{ComponentValue, split_commas, trimmed};
use crate::properties::StyleDeclaration;
use crate::selector::{Selector, Specificity};
use crate::tokenizer::CSSToken;

/// [CSSOM § 6.4.2 The CSSRule Interface](https://www.w3.org/TR/cssom-1/#the-cssrule-interface)
///
/// The `type` attribute constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum RuleType {
    /// A rule this engine does not understand, kept as source text.
    Unknown = 0,
    /// `selector { declarations }`
    Style = 1,
    /// `@charset`
    Charset = 2,
    /// `@import`
    Import = 3,
    /// `@media`
    Media = 4,
    /// `@font-face`
    FontFace = 5,
    /// `@page`
    Page = 6,
    /// `@keyframes`
    Keyframes = 7,
    /// One keyframe inside `@keyframes`.
    Keyframe = 8,
    /// `@namespace`
    Namespace = 10,
    /// `@supports`
    Supports = 12,
    /// `@document`
    Document = 13,
}

impl RuleType {
    /// The numeric `type` value.
    #[must_use]
    pub const fn code(self) -> u16 {
        self as u16
    }

    /// Rules whose block holds further rules.
    #[must_use]
    pub const fn is_grouping(self) -> bool {
        matches!(self, Self::Media | Self::Supports | Self::Document | Self::Keyframes)
    }

    /// The children a freshly created rule starts with.
    pub(crate) fn default_children(self) -> Vec<CssNode> {
        match self {
            Self::Style => vec![
                CssNode::Selector(Selector::universal()),
                CssNode::Declarations(StyleDeclaration::new()),
            ],
            Self::Charset => vec![CssNode::RawString(RawString("UTF-8".to_string()))],
            Self::Import => vec![
                CssNode::RawUrl(RawUrl(String::new())),
                CssNode::Media(MediaList::default()),
            ],
            Self::Namespace => vec![CssNode::RawUrl(RawUrl(String::new()))],
            Self::Media => vec![CssNode::Media(MediaList::default())],
            Self::Supports => vec![CssNode::Condition(ConditionFunction::Empty)],
            Self::Document | Self::Unknown => Vec::new(),
            Self::Keyframes => vec![CssNode::RawString(RawString("none".to_string()))],
            Self::Keyframe => vec![
                CssNode::KeyText(KeyframeSelector::default()),
                CssNode::Declarations(StyleDeclaration::new()),
            ],
            Self::Page | Self::FontFace => vec![CssNode::Declarations(StyleDeclaration::new())],
        }
    }
}

impl fmt::Display for RuleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes)
///
/// `<keyframe-selector> = from | to | <percentage>`, comma separated.
/// Stored normalized: `from` is `0%`, `to` is `100%`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyframeSelector {
    /// The keys in source order.
    pub keys: Vec<String>,
}

impl fmt::Display for KeyframeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.keys.join(", "))
    }
}

/// Parse a keyframe selector from component values.
pub(crate) fn parse_keyframe_selector(values: &[ComponentValue]) -> Option<KeyframeSelector> {
    let values = trimmed(values);
    if values.is_empty() {
        return None;
    }
    let keys = split_commas(values)
        .into_iter()
        .map(|part| match trimmed(part) {
            [value] => match value.token()? {
                CSSToken::Ident(keyword) if keyword.eq_ignore_ascii_case("from") => Some("0%".to_string()),
                CSSToken::Ident(keyword) if keyword.eq_ignore_ascii_case("to") => Some("100%".to_string()),
                CSSToken::Percentage { value, .. } if (0.0..=100.0).contains(value) => Some(format!("{value}%")),
                _ => None,
            },
            _ => None,
        })
        .collect::<Option<Vec<_>>>()?;
    Some(KeyframeSelector { keys })
}

/// One entry of a stylesheet's rule table.
#[derive(Debug)]
pub(crate) struct RuleData {
    pub(crate) rule_type: RuleType,
    pub(crate) children: Vec<CssNode>,
    /// "The parent CSS rule ... null" until attached.
    pub(crate) parent: Option<Container>,
    /// "The parent CSS style sheet ... null" until attached.
    pub(crate) owner: Option<SheetId>,
    /// The stylesheet an `@import` loaded.
    pub(crate) imported: Option<Box<StyleSheet>>,
}

impl RuleData {
    pub(crate) const fn new(rule_type: RuleType, children: Vec<CssNode>) -> Self {
        Self {
            rule_type,
            children,
            parent: None,
            owner: None,
            imported: None,
        }
    }
}

/// A borrowed view of one rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleRef<'a> {
    sheet: &'a StyleSheet,
    id: RuleId,
    data: &'a RuleData,
}

impl<'a> RuleRef<'a> {
    pub(crate) const fn new(sheet: &'a StyleSheet, id: RuleId, data: &'a RuleData) -> Self {
        Self { sheet, id, data }
    }

    /// The rule's id in its stylesheet.
    #[must_use]
    pub const fn id(&self) -> RuleId {
        self.id
    }

    /// "The type attribute must return the CSS rule type."
    #[must_use]
    pub const fn rule_type(&self) -> RuleType {
        self.data.rule_type
    }

    /// The child nodes in order.
    #[must_use]
    pub fn children(&self) -> &'a [CssNode] {
        &self.data.children
    }

    /// Where the rule is attached, if it is.
    #[must_use]
    pub const fn parent(&self) -> Option<Container> {
        self.data.parent
    }

    /// "The parentRule attribute must return the parent CSS rule."
    /// `None` for top-level and detached rules.
    #[must_use]
    pub fn parent_rule(&self) -> Option<Self> {
        match self.data.parent? {
            Container::Rule(parent) => self.sheet.rule(parent),
            Container::Sheet => None,
        }
    }

    /// "The parentStyleSheet attribute must return the parent CSS style sheet."
    #[must_use]
    pub const fn owner(&self) -> Option<SheetId> {
        self.data.owner
    }

    /// The selector of a style or page rule.
    #[must_use]
    pub fn selector(&self) -> Option<&'a Selector> {
        self.data.children.value()
    }

    /// "The selectorText attribute ... must return the result of serializing the
    /// associated group of selectors."
    #[must_use]
    pub fn selector_text(&self) -> String {
        self.selector().map(ToString::to_string).unwrap_or_default()
    }

    /// The declaration block of a style, page, font-face, or keyframe rule.
    #[must_use]
    pub fn style(&self) -> Option<&'a StyleDeclaration> {
        self.data.children.value()
    }

    /// The media list of a media or import rule.
    #[must_use]
    pub fn media(&self) -> Option<&'a MediaList> {
        self.data.children.value()
    }

    /// The condition of a supports rule.
    #[must_use]
    pub fn condition(&self) -> Option<&'a ConditionFunction> {
        self.data.children.value()
    }

    /// The matchers of a document rule.
    pub fn document_functions(&self) -> impl Iterator<Item = &'a DocumentFunction> + use<'a> {
        self.data.children.values()
    }

    /// "The conditionText attribute ... must return a value representing the
    /// rule's condition."
    #[must_use]
    pub fn condition_text(&self) -> String {
        match self.data.rule_type {
            RuleType::Media => self.media().map(ToString::to_string).unwrap_or_default(),
            RuleType::Supports => self.condition().map(ToString::to_string).unwrap_or_default(),
            RuleType::Document => self
                .document_functions()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", "),
            _ => String::new(),
        }
    }

    /// The URL of an import rule, or the namespace URI of a namespace rule, as written.
    #[must_use]
    pub fn href(&self) -> Option<&'a str> {
        self.data.children.value::<RawUrl>().map(|url| url.0.as_str())
    }

    /// The encoding named by a charset rule.
    #[must_use]
    pub fn encoding(&self) -> Option<&'a str> {
        match self.data.rule_type {
            RuleType::Charset => self.raw_string(),
            _ => None,
        }
    }

    /// The prefix of a namespace rule. `""` for the default namespace.
    #[must_use]
    pub fn prefix(&self) -> Option<&'a str> {
        match self.data.rule_type {
            RuleType::Namespace => Some(self.raw_string().unwrap_or_default()),
            _ => None,
        }
    }

    /// The name of a keyframes rule.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        match self.data.rule_type {
            RuleType::Keyframes => self.raw_string(),
            _ => None,
        }
    }

    /// The keys of a keyframe rule.
    #[must_use]
    pub fn key_text(&self) -> Option<&'a KeyframeSelector> {
        self.data.children.value()
    }

    /// The source text kept for an unknown rule.
    #[must_use]
    pub fn source_text(&self) -> Option<&'a str> {
        match self.data.rule_type {
            RuleType::Unknown => self.raw_string(),
            _ => None,
        }
    }

    fn raw_string(&self) -> Option<&'a str> {
        self.data.children.value::<RawString>().map(|raw| raw.0.as_str())
    }

    /// The stylesheet an import rule loaded, if loading succeeded.
    #[must_use]
    pub fn style_sheet(&self) -> Option<&'a StyleSheet> {
        self.data.imported.as_deref()
    }

    /// "The cssRules attribute must return a CSSRuleList object for the child CSS rules."
    pub fn rules(&self) -> impl Iterator<Item = RuleRef<'a>> + use<'a> {
        let sheet = self.sheet;
        self.data
            .children
            .values::<RuleId>()
            .filter_map(move |id| sheet.rule(*id))
    }

    /// Whether the rule's condition holds for `device` and the document `url`.
    /// Rules without a condition are always valid.
    ///
    /// A document rule evaluated without a URL is not valid.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidRegex`] from a `regexp()` matcher.
    pub fn is_valid(&self, device: &RenderDevice, url: Option<&Url>) -> Result<bool, CssError> {
        match self.data.rule_type {
            RuleType::Media => Ok(self.media().is_none_or(|media| media.is_valid(device))),
            RuleType::Supports => Ok(self.condition().is_none_or(ConditionFunction::check)),
            RuleType::Document => {
                let Some(url) = url else {
                    return Ok(false);
                };
                for function in self.document_functions() {
                    if function.matches(url)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            _ => Ok(true),
        }
    }

    fn nested_css(&self, formatter: &dyn StyleFormatter) -> String {
        let rules: Vec<String> = self.rules().map(|rule| rule.to_css(formatter)).collect();
        formatter.block(&rules)
    }

    fn declarations_css(&self, formatter: &dyn StyleFormatter) -> String {
        self.style().map(|style| style.to_css(formatter)).unwrap_or_default()
    }
}

impl ToCss for RuleRef<'_> {
    /// [CSSOM § 6.4.1 Serializing CSS Rules](https://www.w3.org/TR/cssom-1/#serialize-a-css-rule)
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String {
        match self.data.rule_type {
            RuleType::Style => formatter.style(&self.selector_text(), &self.declarations_css(formatter)),
            // "The result of concatenating the following: The string "@charset" followed by
            // a single SPACE, the encoding name serialized as a string, the string ";"."
            RuleType::Charset => format!("@charset {};", serialize_string(self.encoding().unwrap_or_default())),
            // "The result of concatenating: "@import" followed by a single SPACE, the
            // result of performing serialize a URL on the rule's location, ... the
            // result of performing serialize a media query list on the rule's
            // associated media list, the string ";"."
            RuleType::Import => {
                let media = self.media().map(|media| media.to_css(formatter)).unwrap_or_default();
                let url = serialize_url(self.href().unwrap_or_default());
                format!("{};", formatter.rule("@import", &[url, media]))
            }
            RuleType::Namespace => {
                let prefix = self.prefix().map(serialize_identifier).unwrap_or_default();
                let url = serialize_url(self.href().unwrap_or_default());
                format!("{};", formatter.rule("@namespace", &[prefix, url]))
            }
            RuleType::Media => formatter.rule(
                "@media",
                &[self.condition_text(), self.nested_css(formatter)],
            ),
            RuleType::Supports => formatter.rule(
                "@supports",
                &[self.condition_text(), self.nested_css(formatter)],
            ),
            RuleType::Document => formatter.rule(
                "@document",
                &[self.condition_text(), self.nested_css(formatter)],
            ),
            RuleType::Keyframes => formatter.rule(
                "@keyframes",
                &[
                    serialize_identifier(self.name().unwrap_or_default()),
                    self.nested_css(formatter),
                ],
            ),
            RuleType::Keyframe => formatter.style(
                &self.key_text().map(ToString::to_string).unwrap_or_default(),
                &self.declarations_css(formatter),
            ),
            RuleType::Page => {
                let head = self
                    .selector()
                    .map_or_else(|| "@page".to_string(), |selector| format!("@page {selector}"));
                formatter.style(&head, &self.declarations_css(formatter))
            }
            RuleType::FontFace => formatter.style("@font-face", &self.declarations_css(formatter)),
            RuleType::Unknown => self.source_text().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for RuleRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css_text())
    }
}

/// A style rule whose selector matched an element.
#[derive(Debug, Clone, Copy)]
pub struct MatchedRule<'a> {
    /// The matched rule.
    pub rule: RuleRef<'a>,
    /// The specificity it applies with.
    pub specificity: Specificity,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::syntax::component_values;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_keyframe_selector_normalizes() {
        let keys = parse_keyframe_selector(&component_values(&tokenize("from, 50%, TO"))).unwrap();
        assert_eq!(keys.to_string(), "0%, 50%, 100%");
        assert_eq!(keys.keys, ["0%", "50%", "100%"]);
    }

    #[test]
    fn test_keyframe_selector_rejects() {
        assert_eq!(parse_keyframe_selector(&component_values(&tokenize("middle"))), None);
        assert_eq!(parse_keyframe_selector(&component_values(&tokenize("150%"))), None);
        assert_eq!(parse_keyframe_selector(&component_values(&tokenize(""))), None);
    }

    #[test]
    fn test_rule_type_codes() {
        assert_eq!(RuleType::Style.code(), 1);
        assert_eq!(RuleType::Namespace.code(), 10);
        assert_eq!(RuleType::Document.code(), 13);
        assert!(RuleType::Keyframes.is_grouping());
        assert!(!RuleType::Page.is_grouping());
    }
}
