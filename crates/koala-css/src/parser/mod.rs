//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! [`CssParser`] tokenizes text, groups it into component values and hands the
//! syntax-level rules to a builder that produces the rule object model. Every
//! single-construct entry point (`parse_rule`, `parse_selector`, ...) fails on
//! trailing input; only whole-stylesheet parsing consumes everything by
//! definition.

mod builder;
/// Component values and the generic rule/declaration grammar.
pub mod syntax;

use koala_common::net::{CancelSignal, ResourceLoader};
use url::Url;

use crate::condition::{ConditionFunction, parse_condition};
use crate::document::{DocumentFunction, parse_document_functions};
use crate::media::{MediaList, Medium, parse_media_list, parse_medium};
use crate::node::RuleId;
use crate::properties::{self, CssValue, Property, StyleDeclaration, normalize_name};
use crate::rules::{KeyframeSelector, StyleSheet, parse_keyframe_selector};
use crate::selector::{Selector, parse_selector_list};
use crate::tokenizer::{CSSToken, tokenize};
use builder::{Builder, Context};
use syntax::{SyntaxParser, component_values, is_opaque_prelude, is_self_contained, source_text, trimmed};

/// How forgiving a parse is. Every option defaults to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssParserOptions {
    /// Keep style rules with an unparsable selector as an unknown selector.
    pub tolerate_invalid_selectors: bool,
    /// Keep unrecognized or malformed rules as [`crate::rules::RuleType::Unknown`].
    pub include_unknown_rules: bool,
    /// Keep declarations of properties the registry does not know.
    pub include_unknown_declarations: bool,
    /// Keep declarations whose value the registry rejects.
    pub include_invalid_values: bool,
}

/// Entry point for every parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CssParser {
    options: CssParserOptions,
}

impl CssParser {
    /// A parser with the given options.
    #[must_use]
    pub const fn new(options: CssParserOptions) -> Self {
        Self { options }
    }

    /// The options this parser was created with.
    #[must_use]
    pub const fn options(&self) -> CssParserOptions {
        self.options
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    #[must_use]
    pub fn parse_stylesheet(&self, text: &str) -> StyleSheet {
        let mut sheet = StyleSheet::new(self.options);
        self.fill(&mut sheet, text);
        sheet
    }

    /// Parse a stylesheet located at `href` and load its imports.
    ///
    /// Import failures leave the affected rules without a sheet; the returned
    /// sheet always holds everything that parsed.
    pub async fn parse_stylesheet_async(
        &self,
        text: &str,
        href: Option<Url>,
        loader: Option<&dyn ResourceLoader>,
        cancel: &CancelSignal,
    ) -> StyleSheet {
        let mut sheet = self.parse_stylesheet(text);
        let base = href.clone();
        sheet.set_href(href);
        sheet.load_imports(loader, base.as_ref(), cancel).await;
        sheet
    }

    /// Append every top-level rule of `text` to `sheet`.
    pub(crate) fn fill(&self, sheet: &mut StyleSheet, text: &str) {
        let values = component_values(&tokenize(text));
        let rules = SyntaxParser::new(&values).consume_list_of_rules(true);
        Builder::new(text, self.options, sheet).stylesheet(&rules);
    }

    /// [§ 5.3.5 Parse a rule](https://www.w3.org/TR/css-syntax-3/#parse-rule)
    ///
    /// Builds one detached rule in `sheet`'s table. `None` if `text` is not
    /// exactly one rule.
    pub fn parse_rule(&self, sheet: &mut StyleSheet, text: &str) -> Option<RuleId> {
        self.parse_rule_in(sheet, text, Context::TopLevel)
    }

    /// Like [`Self::parse_rule`], for a rule that goes inside `@keyframes`.
    pub fn parse_keyframe_rule(&self, sheet: &mut StyleSheet, text: &str) -> Option<RuleId> {
        self.parse_rule_in(sheet, text, Context::Keyframes)
    }

    fn parse_rule_in(&self, sheet: &mut StyleSheet, text: &str, context: Context) -> Option<RuleId> {
        let values = component_values(&tokenize(text));
        let mut parser = SyntaxParser::new(&values);
        // "If the next input token is an <EOF-token>, return a syntax error."
        let rule = parser.consume_rule()?;
        // "If the next input token is an <EOF-token>, return rule. Otherwise,
        // return a syntax error."
        if !parser.at_end() {
            return None;
        }
        Builder::new(text, self.options, sheet).rule(&rule, context)
    }

    /// Parse a selector list. With `tolerate_invalid_selectors`, unparsable
    /// text becomes [`Selector::Unknown`].
    #[must_use]
    pub fn parse_selector(&self, text: &str) -> Option<Selector> {
        let tokens = tokenize(text);
        let values = component_values(&tokens);
        let values = trimmed(&values);
        if values.is_empty() {
            return None;
        }
        parse_selector_list(values, text).or_else(|| {
            (self.options.tolerate_invalid_selectors && is_opaque_prelude(&tokens, text))
                .then(|| Selector::Unknown(source_text(values, text).to_string()))
        })
    }

    /// [§ 5.3.6 Parse a declaration](https://www.w3.org/TR/css-syntax-3/#parse-declaration)
    #[must_use]
    pub fn parse_declaration(&self, text: &str) -> Option<Property> {
        let tokens = tokenize(text);
        if !is_self_contained(&tokens, text) {
            return None;
        }
        let values = component_values(&tokens);
        if values
            .iter()
            .any(|value| matches!(value.token(), Some(CSSToken::Semicolon)))
        {
            return None;
        }
        let declaration = SyntaxParser::new(&values).consume_declaration()?;
        builder::property(
            &declaration.name,
            &declaration.value,
            declaration.important,
            text,
            self.options,
        )
    }

    /// [§ 5.3.8 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    ///
    /// The body of a `style` attribute.
    #[must_use]
    pub fn parse_declarations(&self, text: &str) -> StyleDeclaration {
        let values = component_values(&tokenize(text));
        builder::declarations(&values, text, self.options)
    }

    /// Parse the value of property `name`.
    #[must_use]
    pub fn parse_value(&self, name: &str, text: &str) -> Option<CssValue> {
        let tokens = tokenize(text);
        if !is_self_contained(&tokens, text) {
            return None;
        }
        let values = component_values(&tokens);
        let values = trimmed(&values);
        if values.is_empty() || !properties::is_declaration_value(values) {
            return None;
        }
        let name = normalize_name(name);
        let known = properties::is_supported(&name);
        let keep = if known {
            properties::accepts_values(&name, values) || self.options.include_invalid_values
        } else {
            self.options.include_unknown_declarations
        };
        keep.then(|| CssValue::new(syntax::serialize_values(values, text)))
    }

    /// Parse a comma-separated media query list. Empty text is the empty list.
    #[must_use]
    pub fn parse_media_list(&self, text: &str) -> Option<MediaList> {
        parse_media_list(&component_values(&tokenize(text)))
    }

    /// Parse a single media query.
    #[must_use]
    pub fn parse_medium(&self, text: &str) -> Option<Medium> {
        let values = component_values(&tokenize(text));
        let values = trimmed(&values);
        if values.is_empty() || values.iter().any(|value| matches!(value.token(), Some(CSSToken::Comma))) {
            return None;
        }
        parse_medium(values)
    }

    /// Parse an `@supports` condition. Empty text is [`ConditionFunction::Empty`].
    #[must_use]
    pub fn parse_condition(&self, text: &str) -> Option<ConditionFunction> {
        parse_condition(&component_values(&tokenize(text)), text)
    }

    /// Parse the comma-separated matchers of an `@document` prelude.
    #[must_use]
    pub fn parse_document_functions(&self, text: &str) -> Option<Vec<DocumentFunction>> {
        parse_document_functions(&component_values(&tokenize(text)))
    }

    /// Parse a keyframe selector such as `from, 50%`.
    #[must_use]
    pub fn parse_keyframe_selector(&self, text: &str) -> Option<KeyframeSelector> {
        parse_keyframe_selector(&component_values(&tokenize(text)))
    }
}
