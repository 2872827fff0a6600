//! CSS syntax layer per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! "The input to the parsing stage is a stream of tokens from the tokenization stage."
//!
//! Tokens are first grouped into component values (functions and simple
//! blocks nest), then rules and declarations are consumed from a list of
//! component values. Every node keeps its source span so later stages can
//! recover the author's text.

use crate::tokenizer::{CSSToken, SourceSpan, Token};

/// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
///
/// A preserved token, a function, or a simple block.
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(Token),
    /// A function with its contents.
    Function {
        /// The function name.
        name: String,
        /// The function arguments.
        value: Vec<ComponentValue>,
        /// Span from the name through the closing parenthesis.
        span: SourceSpan,
    },
    /// A simple block.
    Block {
        /// The opening token character.
        token: char,
        /// The block contents.
        value: Vec<ComponentValue>,
        /// Span from the opening through the closing bracket.
        span: SourceSpan,
    },
}

impl ComponentValue {
    /// The source span covered by this value.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::Token(token) => token.span,
            Self::Function { span, .. } | Self::Block { span, .. } => *span,
        }
    }

    /// The token, if this is a preserved token.
    #[must_use]
    pub const fn token(&self) -> Option<&CSSToken> {
        match self {
            Self::Token(token) => Some(&token.kind),
            _ => None,
        }
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self.token(), Some(CSSToken::Whitespace))
    }

    /// Returns true if this is the delimiter `c`.
    #[must_use]
    pub fn is_delim(&self, c: char) -> bool {
        matches!(self.token(), Some(CSSToken::Delim(d)) if *d == c)
    }

    /// Returns true if this is an ident matching `name` case-insensitively.
    #[must_use]
    pub fn is_ident(&self, name: &str) -> bool {
        self.token().is_some_and(|t| t.is_ident(name))
    }
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A CSS declaration (e.g., `color: red`).
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// The property name.
    pub name: String,
    /// The property value as component values, without `!important`.
    pub value: Vec<ComponentValue>,
    /// Whether the declaration has `!important`.
    pub important: bool,
    /// Span of the whole declaration.
    pub span: SourceSpan,
}

/// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    /// The at-keyword name (without the `@`).
    pub name: String,
    /// The prelude component values.
    pub prelude: Vec<ComponentValue>,
    /// The `{}` block contents, if the rule has one.
    pub block: Option<Vec<ComponentValue>>,
    /// Span of the whole rule.
    pub span: SourceSpan,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
#[derive(Debug, Clone, PartialEq)]
pub struct QualifiedRule {
    /// The prelude component values (a selector for style rules).
    pub prelude: Vec<ComponentValue>,
    /// The `{}` block contents.
    pub block: Vec<ComponentValue>,
    /// Span of the whole rule.
    pub span: SourceSpan,
}

/// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxRule {
    /// An at-rule.
    At(AtRule),
    /// A qualified rule.
    Qualified(QualifiedRule),
}

impl SyntaxRule {
    /// Span of the whole rule.
    #[must_use]
    pub const fn span(&self) -> SourceSpan {
        match self {
            Self::At(rule) => rule.span,
            Self::Qualified(rule) => rule.span,
        }
    }
}

/// [§ 5.3.1 Normalize into a token stream](https://www.w3.org/TR/css-syntax-3/#normalize-into-a-token-stream)
///
/// Group a token list into component values. The EOF token is dropped.
#[must_use]
pub fn component_values(tokens: &[Token]) -> Vec<ComponentValue> {
    let mut grouper = Grouper { tokens, position: 0 };
    let mut values = Vec::new();
    while let Some(value) = grouper.consume_component_value() {
        values.push(value);
    }
    values
}

struct Grouper<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl Grouper<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens
            .get(self.position)
            .filter(|token| !token.kind.is_eof())
    }

    fn consume(&mut self) -> Option<Token> {
        let token = self.peek()?.clone();
        self.position += 1;
        Some(token)
    }

    /// [§ 5.4.8 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        let token = self.consume()?;
        match &token.kind {
            // "If the current input token is a <{-token>, <[-token>, or <(-token>,
            // consume a simple block and return it."
            CSSToken::LeftBrace => {
                Some(self.consume_simple_block('{', &CSSToken::RightBrace, token.span))
            }
            CSSToken::LeftBracket => {
                Some(self.consume_simple_block('[', &CSSToken::RightBracket, token.span))
            }
            CSSToken::LeftParen => {
                Some(self.consume_simple_block('(', &CSSToken::RightParen, token.span))
            }

            // "Otherwise, if the current input token is a <function-token>,
            // consume a function and return it."
            CSSToken::Function(name) => {
                let name = name.clone();
                let (value, span) = self.consume_until(&CSSToken::RightParen, token.span);
                Some(ComponentValue::Function { name, value, span })
            }

            // "Otherwise, return the current input token."
            _ => Some(ComponentValue::Token(token)),
        }
    }

    /// [§ 5.4.9 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    fn consume_simple_block(
        &mut self,
        open: char,
        ending: &CSSToken,
        start: SourceSpan,
    ) -> ComponentValue {
        let (value, span) = self.consume_until(ending, start);
        ComponentValue::Block {
            token: open,
            value,
            span,
        }
    }

    fn consume_until(
        &mut self,
        ending: &CSSToken,
        start: SourceSpan,
    ) -> (Vec<ComponentValue>, SourceSpan) {
        let mut value = Vec::new();
        let mut span = start;
        loop {
            match self.peek() {
                // "ending token"
                // "Return the block."
                Some(token) if token.kind == *ending => {
                    span = span.to(token.span);
                    self.position += 1;
                    return (value, span);
                }
                // "<EOF-token>"
                // "This is a parse error. Return the block."
                None => return (value, span),
                // "anything else"
                // "Reconsume the current input token. Consume a component value
                // and append it to the value of the block."
                Some(_) => {
                    if let Some(v) = self.consume_component_value() {
                        span = span.to(v.span());
                        value.push(v);
                    }
                }
            }
        }
    }
}

/// Consumes rules and declarations from a list of component values.
pub struct SyntaxParser<'v> {
    values: &'v [ComponentValue],
    position: usize,
}

impl<'v> SyntaxParser<'v> {
    /// Create a parser over a list of component values.
    #[must_use]
    pub const fn new(values: &'v [ComponentValue]) -> Self {
        Self {
            values,
            position: 0,
        }
    }

    /// True once every value has been consumed (trailing whitespace ignored).
    pub fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.position >= self.values.len()
    }

    /// Skip whitespace values.
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(ComponentValue::is_whitespace) {
            self.position += 1;
        }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    pub fn consume_list_of_rules(&mut self, top_level: bool) -> Vec<SyntaxRule> {
        // "Create an initially empty list of rules."
        let mut rules = Vec::new();

        loop {
            match self.peek().map(ComponentValue::token) {
                // "<whitespace-token>"
                // "Do nothing."
                Some(Some(CSSToken::Whitespace)) => self.position += 1,

                // "<EOF-token>"
                // "Return the list of rules."
                None => return rules,

                // "<CDO-token>" or "<CDC-token>"
                Some(Some(CSSToken::CDO | CSSToken::CDC)) if top_level => {
                    // "If the top-level flag is set, do nothing."
                    self.position += 1;
                }

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule, and append
                // the returned value to the list of rules."
                Some(Some(CSSToken::AtKeyword(_))) => {
                    if let Some(rule) = self.consume_at_rule() {
                        rules.push(SyntaxRule::At(rule));
                    }
                }

                // "anything else"
                // "Reconsume the current input token. Consume a qualified rule. If
                // anything is returned, append it to the list of rules."
                Some(_) => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        rules.push(SyntaxRule::Qualified(rule));
                    }
                }
            }
        }
    }

    /// Consume exactly one rule, or `None` if the input does not start with one.
    pub fn consume_rule(&mut self) -> Option<SyntaxRule> {
        self.skip_whitespace();
        match self.peek()?.token() {
            Some(CSSToken::AtKeyword(_)) => self.consume_at_rule().map(SyntaxRule::At),
            _ => self.consume_qualified_rule().map(SyntaxRule::Qualified),
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn consume_at_rule(&mut self) -> Option<AtRule> {
        // "Consume the next input token."
        let first = self.consume()?;
        let Some(CSSToken::AtKeyword(name)) = first.token() else {
            return None;
        };

        // "Create a new at-rule with its name set to the value of the current input
        // token, its prelude initially set to an empty list, and its value initially
        // set to nothing."
        let name = name.clone();
        let mut span = first.span();
        let mut prelude = Vec::new();

        loop {
            match self.consume() {
                // "<semicolon-token>"
                // "Return the at-rule."
                Some(value) if matches!(value.token(), Some(CSSToken::Semicolon)) => {
                    span = span.to(value.span());
                    return Some(AtRule {
                        name,
                        prelude,
                        block: None,
                        span,
                    });
                }

                // "<EOF-token>"
                // "This is a parse error. Return the at-rule."
                None => {
                    return Some(AtRule {
                        name,
                        prelude,
                        block: None,
                        span,
                    });
                }

                // "<{-token>"
                // "Consume a simple block and assign it to the at-rule's block.
                // Return the at-rule."
                Some(ComponentValue::Block {
                    token: '{',
                    value,
                    span: block_span,
                }) => {
                    return Some(AtRule {
                        name,
                        prelude,
                        block: Some(value.clone()),
                        span: span.to(*block_span),
                    });
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the at-rule's prelude."
                Some(value) => {
                    span = span.to(value.span());
                    prelude.push(value.clone());
                }
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<QualifiedRule> {
        // "Create a new qualified rule with its prelude initially set to an empty list,
        // and its value initially set to nothing."
        let mut prelude: Vec<ComponentValue> = Vec::new();
        let mut span: Option<SourceSpan> = None;

        loop {
            match self.consume() {
                // "<EOF-token>"
                // "This is a parse error. Return nothing."
                None => return None,

                // "<{-token>"
                // "Consume a simple block and assign it to the qualified rule's block.
                // Return the qualified rule."
                Some(ComponentValue::Block {
                    token: '{',
                    value,
                    span: block_span,
                }) => {
                    return Some(QualifiedRule {
                        prelude,
                        block: value.clone(),
                        span: span.map_or(*block_span, |s| s.to(*block_span)),
                    });
                }

                // "anything else"
                // "Reconsume the current input token. Consume a component value.
                // Append the returned value to the qualified rule's prelude."
                Some(value) => {
                    span = Some(span.map_or(value.span(), |s| s.to(value.span())));
                    prelude.push(value.clone());
                }
            }
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    ///
    /// At-rules nested in a declaration list are consumed and discarded.
    pub fn consume_list_of_declarations(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();

        loop {
            match self.peek().map(ComponentValue::token) {
                // "<whitespace-token>" or "<semicolon-token>"
                // "Do nothing."
                Some(Some(CSSToken::Whitespace | CSSToken::Semicolon)) => self.position += 1,

                // "<EOF-token>"
                // "Return the list of declarations."
                None => return declarations,

                // "<at-keyword-token>"
                // "Reconsume the current input token. Consume an at-rule."
                Some(Some(CSSToken::AtKeyword(_))) => {
                    let _ = self.consume_at_rule();
                }

                // "<ident-token>"
                // "Consume a declaration. If anything was returned, append it to
                // the list of declarations."
                Some(Some(CSSToken::Ident(_))) => {
                    let end = self.find_semicolon();
                    let mut inner = SyntaxParser::new(&self.values[self.position..end]);
                    if let Some(declaration) = inner.consume_declaration() {
                        declarations.push(declaration);
                    }
                    self.position = end;
                }

                // "anything else"
                // "This is a parse error. Reconsume the current input token. As long as
                // the next input token is anything other than a <semicolon-token> or
                // <EOF-token>, consume a component value and throw away the returned value."
                Some(_) => {
                    log::debug!(target: "css", "skipping malformed declaration");
                    self.position = self.find_semicolon();
                }
            }
        }
    }

    fn find_semicolon(&self) -> usize {
        self.values[self.position..]
            .iter()
            .position(|v| matches!(v.token(), Some(CSSToken::Semicolon)))
            .map_or(self.values.len(), |offset| self.position + offset)
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    ///
    /// Consumes every remaining value; callers slice the input at the
    /// terminating semicolon first.
    pub fn consume_declaration(&mut self) -> Option<Declaration> {
        self.skip_whitespace();

        // "Consume the next input token."
        let first = self.consume()?;
        let Some(CSSToken::Ident(name)) = first.token() else {
            return None;
        };
        let name = name.clone();
        let start = first.span();

        // "While the next input token is a <whitespace-token>, consume the next input token."
        self.skip_whitespace();

        // "If the next input token is anything other than a <colon-token>, this is a parse error.
        // Return nothing."
        if !matches!(self.consume()?.token(), Some(CSSToken::Colon)) {
            return None;
        }

        // "As long as the next input token is anything other than an <EOF-token>, consume a
        // component value and append it to the declaration's value."
        let mut value: Vec<ComponentValue> = self.values[self.position..].to_vec();
        self.position = self.values.len();

        let span = value.last().map_or(start, |last| start.to(last.span()));

        // "If the last two non-<whitespace-token>s in the declaration's value are a
        // <delim-token> with the value "!" followed by an <ident-token> with a value
        // that is an ASCII case-insensitive match for "important", remove them from
        // the declaration's value and set the declaration's important flag to true."
        let important = strip_important(&mut value);

        // "While the last token in the declaration's value is a <whitespace-token>,
        // remove that token."
        trim_whitespace(&mut value);

        Some(Declaration {
            name,
            value,
            important,
            span,
        })
    }

    fn consume(&mut self) -> Option<&'v ComponentValue> {
        let value = self.values.get(self.position)?;
        self.position += 1;
        Some(value)
    }

    fn peek(&self) -> Option<&'v ComponentValue> {
        self.values.get(self.position)
    }
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// STEP 1: Skip trailing whitespace in the value.
/// STEP 2: Check for <ident-token> "important".
/// STEP 3: Skip any whitespace between "!" and "important".
/// STEP 4: Check for <delim-token> "!", and truncate the value there.
fn strip_important(value: &mut Vec<ComponentValue>) -> bool {
    let mut index = value.len();
    let mut previous_non_whitespace = || {
        while index > 0 {
            index -= 1;
            if !value[index].is_whitespace() {
                return Some(index);
            }
        }
        None
    };

    // STEP 1 + 2
    let Some(important) = previous_non_whitespace() else {
        return false;
    };
    // STEP 3 + 4
    let Some(bang) = previous_non_whitespace() else {
        return false;
    };

    if value[important].is_ident("important") && value[bang].is_delim('!') {
        value.truncate(bang);
        true
    } else {
        false
    }
}

/// Remove leading and trailing whitespace values.
pub fn trim_whitespace(values: &mut Vec<ComponentValue>) {
    while values.last().is_some_and(ComponentValue::is_whitespace) {
        let _ = values.pop();
    }
    let leading = values.iter().take_while(|v| v.is_whitespace()).count();
    let _ = values.drain(..leading);
}

/// Borrow `values` without leading and trailing whitespace.
#[must_use]
pub fn trimmed(values: &[ComponentValue]) -> &[ComponentValue] {
    let start = values.iter().take_while(|v| v.is_whitespace()).count();
    let trailing = values[start..]
        .iter()
        .rev()
        .take_while(|v| v.is_whitespace())
        .count();
    let end = values.len() - trailing;
    &values[start..end]
}

/// Split `values` at top-level comma tokens.
#[must_use]
pub fn split_commas(values: &[ComponentValue]) -> Vec<&[ComponentValue]> {
    values
        .split(|v| matches!(v.token(), Some(CSSToken::Comma)))
        .collect()
}

/// The author's text covered by `values`, from the first value to the last.
#[must_use]
pub fn source_text<'s>(values: &[ComponentValue], source: &'s str) -> &'s str {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) => first.span().to(last.span()).slice(source),
        _ => "",
    }
}

/// Whether `tokens` read back the same when written inside a larger text:
/// every block and function is closed, nothing closes a block it did not
/// open, strings and URLs are terminated, and the text does not end on a
/// lone backslash.
#[must_use]
pub fn is_self_contained(tokens: &[Token], source: &str) -> bool {
    let mut open = Vec::new();
    for token in tokens {
        match &token.kind {
            CSSToken::LeftBrace => open.push(CSSToken::RightBrace),
            CSSToken::LeftBracket => open.push(CSSToken::RightBracket),
            CSSToken::LeftParen | CSSToken::Function(_) => open.push(CSSToken::RightParen),
            closing @ (CSSToken::RightBrace | CSSToken::RightBracket | CSSToken::RightParen) => {
                // A mismatched closer is an ordinary token inside the open block,
                // but outside every block it would close the enclosing one.
                if open.is_empty() {
                    return false;
                }
                if open.last() == Some(closing) {
                    let _ = open.pop();
                }
            }
            CSSToken::String(_) if !is_terminated_string(token.text(source)) => return false,
            CSSToken::Url(_) if !token.text(source).ends_with(')') => return false,
            _ => {}
        }
    }
    let last = tokens
        .iter()
        .rev()
        .find(|token| !token.kind.is_eof() && !token.kind.is_whitespace());
    open.is_empty() && !last.is_some_and(|token| ends_with_escape(token.text(source)))
}

/// An odd run of trailing backslashes escapes whatever comes next.
fn ends_with_escape(text: &str) -> bool {
    text.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn is_terminated_string(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return false;
    };
    let Some(body) = chars.as_str().strip_suffix(quote) else {
        return false;
    };
    !ends_with_escape(body)
}

/// Whether unparsable `tokens` can be kept as the prelude of a style rule.
///
/// Written back out, the text sits in front of a `{ ... }` block, so it must
/// not open an at-rule or contain anything that ends or opens a block.
#[must_use]
pub fn is_opaque_prelude(tokens: &[Token], source: &str) -> bool {
    let starts_at_rule = tokens
        .iter()
        .find(|token| !token.kind.is_whitespace())
        .is_some_and(|token| matches!(token.kind, CSSToken::AtKeyword(_)));
    !starts_at_rule
        && !tokens.iter().any(|token| {
            matches!(
                token.kind,
                CSSToken::LeftBrace | CSSToken::RightBrace | CSSToken::Semicolon | CSSToken::CDO | CSSToken::CDC
            )
        })
        && is_self_contained(tokens, source)
}

/// [§ 9 Serialization](https://www.w3.org/TR/css-syntax-3/#serialization)
///
/// Serialize component values back to text. Each token is reproduced from
/// its source span, whitespace runs collapse to one space, and comments
/// are gone (the tokenizer drops them).
#[must_use]
pub fn serialize_values(values: &[ComponentValue], source: &str) -> String {
    let mut out = String::new();
    write_values(&mut out, trimmed(values), source);
    out
}

fn write_values(out: &mut String, values: &[ComponentValue], source: &str) {
    for value in values {
        match value {
            ComponentValue::Token(token) if token.kind.is_whitespace() => out.push(' '),
            ComponentValue::Token(token) => out.push_str(token.text(source)),
            ComponentValue::Function { name, value, .. } => {
                out.push_str(name);
                out.push('(');
                write_values(out, trimmed(value), source);
                out.push(')');
            }
            ComponentValue::Block { token, value, .. } => {
                let close = match token {
                    '{' => '}',
                    '[' => ']',
                    _ => ')',
                };
                out.push(*token);
                write_values(out, trimmed(value), source);
                out.push(close);
            }
        }
    }
}
