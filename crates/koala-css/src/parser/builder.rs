//! Turns syntax-level rules into the rule object model.
//!
//! [CSS Syntax 3 § 9 Defining Grammars for Rules and Other Values](https://www.w3.org/TR/css-syntax-3/#rule-defs)
//!
//! "The CSS Syntax spec ... only defines the generic syntax. Individual
//! at-rules define their own grammars." Each at-rule handler below checks its
//! prelude and block against its grammar; anything that fails becomes an
//! unknown rule or is dropped, depending on the parser options.

use super::CssParserOptions;
use super::syntax::{
    AtRule, ComponentValue, QualifiedRule, SyntaxParser, SyntaxRule, serialize_values, source_text, trimmed,
};
use crate::condition::{ConditionFunction, parse_condition};
use crate::document::parse_document_functions;
use crate::media::parse_media_list;
use crate::node::{Container, CssNode, RawString, RawUrl, RuleId};
use crate::properties::{self, CssValue, Property, StyleDeclaration, normalize_name};
use crate::rules::{RuleType, StyleSheet, parse_keyframe_selector};
use crate::selector::{Selector, parse_selector_list};
use crate::tokenizer::{CSSToken, SourceSpan};

/// Where a rule is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Context {
    /// Directly in a stylesheet.
    TopLevel,
    /// Inside a media, supports, or document block.
    Nested,
    /// Inside a keyframes block.
    Keyframes,
}

/// How far a stylesheet has progressed through its required ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Phase {
    Start,
    Imports,
    Namespaces,
    Body,
}

pub(crate) struct Builder<'a> {
    source: &'a str,
    options: CssParserOptions,
    sheet: &'a mut StyleSheet,
}

impl<'a> Builder<'a> {
    pub(crate) const fn new(source: &'a str, options: CssParserOptions, sheet: &'a mut StyleSheet) -> Self {
        Self { source, options, sheet }
    }

    /// Build every top-level rule and attach it to the sheet.
    ///
    /// [CSS Cascade 4 § 2](https://www.w3.org/TR/css-cascade-4/#at-import):
    /// "Any @import rules must precede all other valid at-rules and style rules
    /// in a style sheet (ignoring @charset ...) or else the @import rule is invalid."
    /// `@namespace` rules likewise follow imports and precede everything else.
    pub(crate) fn stylesheet(&mut self, rules: &[SyntaxRule]) {
        let mut phase = Phase::Start;
        for rule in rules {
            let Some(id) = self.rule(rule, Context::TopLevel) else {
                continue;
            };
            let rule_type = self.sheet.rules[id.0].rule_type;
            let (allowed, next) = match rule_type {
                RuleType::Charset => (phase == Phase::Start, Phase::Imports),
                RuleType::Import => (phase <= Phase::Imports, Phase::Imports),
                RuleType::Namespace => (phase <= Phase::Namespaces, Phase::Namespaces),
                RuleType::Unknown => (true, phase),
                _ => (true, Phase::Body),
            };
            if !allowed {
                log::debug!(target: "css", "dropping misplaced {rule_type} rule");
                continue;
            }
            phase = phase.max(next);
            self.sheet.push_child(Container::Sheet, CssNode::Rule(id));
        }
    }

    /// Build one rule, detached. `None` if it is dropped.
    pub(crate) fn rule(&mut self, rule: &SyntaxRule, context: Context) -> Option<RuleId> {
        match (rule, context) {
            (SyntaxRule::Qualified(qualified), Context::Keyframes) => self.keyframe(qualified),
            (SyntaxRule::Qualified(qualified), _) => self.style(qualified),
            (SyntaxRule::At(at), Context::Keyframes) => {
                log::debug!(target: "css", "@{} is not allowed inside @keyframes", at.name);
                self.unknown(at.span)
            }
            (SyntaxRule::At(at), _) => self.at_rule(at, context),
        }
    }

    fn at_rule(&mut self, at: &AtRule, context: Context) -> Option<RuleId> {
        let name = at.name.to_ascii_lowercase();
        let nested = context != Context::TopLevel;
        let built = match name.as_str() {
            "charset" | "import" | "namespace" if nested => {
                log::debug!(target: "css", "@{name} is only allowed at the top level");
                None
            }
            "charset" => self.charset(at),
            "import" => self.import(at),
            "namespace" => self.namespace(at),
            "media" => match parse_media_list(&at.prelude) {
                Some(media) => self.grouping(at, RuleType::Media, vec![CssNode::Media(media)], Context::Nested),
                None => None,
            },
            "supports" => {
                let condition =
                    parse_condition(&at.prelude, self.source).filter(|condition| *condition != ConditionFunction::Empty);
                match condition {
                    Some(condition) => {
                        self.grouping(at, RuleType::Supports, vec![CssNode::Condition(condition)], Context::Nested)
                    }
                    None => None,
                }
            }
            "document" | "-moz-document" => match parse_document_functions(&at.prelude) {
                Some(functions) => {
                    let prelude = functions.into_iter().map(CssNode::Document).collect();
                    self.grouping(at, RuleType::Document, prelude, Context::Nested)
                }
                None => None,
            },
            "keyframes" | "-webkit-keyframes" => self.keyframes(at),
            "page" => self.page(at),
            "font-face" if trimmed(&at.prelude).is_empty() => {
                let block = at.block.as_deref()?;
                let style = self.declarations(block);
                Some(self.sheet.alloc(RuleType::FontFace, vec![CssNode::Declarations(style)]))
            }
            _ => None,
        };
        built.or_else(|| {
            log::debug!(target: "css", "unrecognized or malformed @{name} rule");
            self.unknown(at.span)
        })
    }

    /// [CSS Syntax 3 § 8.4 The @charset Rule](https://www.w3.org/TR/css-syntax-3/#charset-rule)
    ///
    /// `@charset "<charset>";`
    fn charset(&mut self, at: &AtRule) -> Option<RuleId> {
        if at.block.is_some() {
            return None;
        }
        let [value] = trimmed(&at.prelude) else {
            return None;
        };
        let Some(CSSToken::String(encoding)) = value.token() else {
            return None;
        };
        let children = vec![CssNode::RawString(RawString(encoding.clone()))];
        Some(self.sheet.alloc(RuleType::Charset, children))
    }

    /// `@import [ <url> | <string> ] <media-query-list>? ;`
    fn import(&mut self, at: &AtRule) -> Option<RuleId> {
        if at.block.is_some() {
            return None;
        }
        let (first, rest) = trimmed(&at.prelude).split_first()?;
        let href = url_value(first)?;
        let media = parse_media_list(rest)?;
        let children = vec![CssNode::RawUrl(RawUrl(href)), CssNode::Media(media)];
        Some(self.sheet.alloc(RuleType::Import, children))
    }

    /// [CSS Namespaces § 3](https://www.w3.org/TR/css-namespaces-3/#syntax)
    ///
    /// `@namespace <namespace-prefix>? [ <string> | <url> ] ;`
    fn namespace(&mut self, at: &AtRule) -> Option<RuleId> {
        if at.block.is_some() {
            return None;
        }
        let terms: Vec<&ComponentValue> = at.prelude.iter().filter(|v| !v.is_whitespace()).collect();
        let children = match terms.as_slice() {
            [uri] => vec![CssNode::RawUrl(RawUrl(url_value(uri)?))],
            [prefix, uri] => {
                let Some(CSSToken::Ident(prefix)) = prefix.token() else {
                    return None;
                };
                vec![
                    CssNode::RawString(RawString(prefix.clone())),
                    CssNode::RawUrl(RawUrl(url_value(uri)?)),
                ]
            }
            _ => return None,
        };
        Some(self.sheet.alloc(RuleType::Namespace, children))
    }

    /// [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes)
    ///
    /// `@keyframes <keyframes-name> { <rule-list> }`
    fn keyframes(&mut self, at: &AtRule) -> Option<RuleId> {
        let [name] = trimmed(&at.prelude) else {
            return None;
        };
        let name = match name.token()? {
            CSSToken::Ident(name) | CSSToken::String(name) => name.clone(),
            _ => return None,
        };
        self.grouping(
            at,
            RuleType::Keyframes,
            vec![CssNode::RawString(RawString(name))],
            Context::Keyframes,
        )
    }

    /// [CSS Paged Media § 4](https://www.w3.org/TR/css-page-3/#at-page-rule)
    ///
    /// `@page <page-selector-list>? { <declaration-list> }`
    fn page(&mut self, at: &AtRule) -> Option<RuleId> {
        let block = at.block.as_deref()?;
        let prelude = trimmed(&at.prelude);
        let mut children = Vec::with_capacity(2);
        if !prelude.is_empty() {
            children.push(CssNode::Selector(parse_selector_list(prelude, self.source)?));
        }
        children.push(CssNode::Declarations(self.declarations(block)));
        Some(self.sheet.alloc(RuleType::Page, children))
    }

    /// A rule whose block holds a rule list. `prelude` nodes come first.
    fn grouping(
        &mut self,
        at: &AtRule,
        rule_type: RuleType,
        mut children: Vec<CssNode>,
        context: Context,
    ) -> Option<RuleId> {
        let block = at.block.as_deref()?;
        let nested = SyntaxParser::new(block).consume_list_of_rules(false);
        for rule in &nested {
            if let Some(id) = self.rule(rule, context) {
                children.push(CssNode::Rule(id));
            }
        }
        Some(self.sheet.alloc(rule_type, children))
    }

    /// [CSS Syntax 3 § 9.1 Style rules](https://www.w3.org/TR/css-syntax-3/#style-rules)
    ///
    /// "The prelude of the qualified rule is parsed as a <selector-list>. If this
    /// returns failure, the entire style rule is invalid."
    fn style(&mut self, rule: &QualifiedRule) -> Option<RuleId> {
        let prelude = trimmed(&rule.prelude);
        let selector = match parse_selector_list(prelude, self.source) {
            Some(selector) => selector,
            None if self.options.tolerate_invalid_selectors && !prelude.is_empty() => {
                let text = source_text(prelude, self.source);
                log::debug!(target: "css", "keeping unparsable selector `{text}`");
                Selector::Unknown(text.to_string())
            }
            None => {
                log::debug!(target: "css", "dropping rule with invalid selector `{}`", source_text(prelude, self.source));
                return self.unknown(rule.span);
            }
        };
        let style = self.declarations(&rule.block);
        Some(self.sheet.alloc(
            RuleType::Style,
            vec![CssNode::Selector(selector), CssNode::Declarations(style)],
        ))
    }

    /// [CSS Animations § 3](https://www.w3.org/TR/css-animations-1/#keyframes)
    ///
    /// "The <keyframe-block> rule accepts a list of declarations ... The
    /// <keyframe-selector> ... specifies the percentage along the duration."
    fn keyframe(&mut self, rule: &QualifiedRule) -> Option<RuleId> {
        let Some(keys) = parse_keyframe_selector(&rule.prelude) else {
            log::debug!(target: "css", "invalid keyframe selector `{}`", source_text(&rule.prelude, self.source));
            return self.unknown(rule.span);
        };
        let style = self.declarations(&rule.block);
        Some(self.sheet.alloc(
            RuleType::Keyframe,
            vec![CssNode::KeyText(keys), CssNode::Declarations(style)],
        ))
    }

    fn declarations(&self, block: &[ComponentValue]) -> StyleDeclaration {
        declarations(block, self.source, self.options)
    }

    /// An unknown rule keeping its source text, if the options allow one.
    fn unknown(&mut self, span: SourceSpan) -> Option<RuleId> {
        if !self.options.include_unknown_rules {
            return None;
        }
        let text = span.slice(self.source).trim().to_string();
        Some(self.sheet.alloc(RuleType::Unknown, vec![CssNode::RawString(RawString(text))]))
    }
}

/// [CSS Syntax 3 § 5.4.5](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
///
/// Unknown properties and rejected values are dropped unless the options keep them.
pub(crate) fn declarations(block: &[ComponentValue], source: &str, options: CssParserOptions) -> StyleDeclaration {
    let mut style = StyleDeclaration::new();
    for declaration in SyntaxParser::new(block).consume_list_of_declarations() {
        if let Some(property) = property(
            &declaration.name,
            &declaration.value,
            declaration.important,
            source,
            options,
        ) {
            style.push(property);
        }
    }
    style
}

/// Validate one declaration against the registry.
pub(crate) fn property(
    name: &str,
    value: &[ComponentValue],
    important: bool,
    source: &str,
    options: CssParserOptions,
) -> Option<Property> {
    let name = normalize_name(name);
    if !properties::is_supported(&name) {
        if !options.include_unknown_declarations {
            log::debug!(target: "css", "dropping unknown property `{name}`");
            return None;
        }
    } else if !properties::accepts_values(&name, value) && !options.include_invalid_values {
        log::debug!(target: "css", "dropping invalid value for `{name}`");
        return None;
    }
    Some(Property {
        value: CssValue::new(serialize_values(value, source)),
        name,
        important,
    })
}

/// A `<url>` or `<string>` operand: `url(x)`, `url("x")`, or `"x"`.
fn url_value(value: &ComponentValue) -> Option<String> {
    match value {
        ComponentValue::Token(token) => match &token.kind {
            CSSToken::Url(url) | CSSToken::String(url) => Some(url.clone()),
            _ => None,
        },
        ComponentValue::Function { name, value, .. } if name.eq_ignore_ascii_case("url") => {
            match trimmed(value) {
                [argument] => match argument.token()? {
                    CSSToken::String(url) => Some(url.clone()),
                    _ => None,
                },
                _ => None,
            }
        }
        _ => None,
    }
}
