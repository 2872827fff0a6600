//! [§ 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar)
//!
//! "The grammar of Selectors is defined in terms of CSS syntax." Selectors
//! are read from component values, so functional pseudo-classes and
//! attribute blocks arrive already grouped.

use super::{
    AttributeOp, AttributeSelector, Combinator, ComplexSelector, NthKind, NthSelector, PseudoClass, Selector,
    SimpleSelector, parse_an_plus_b,
};
use crate::parser::syntax::{ComponentValue, serialize_values, split_commas, trimmed};
use crate::tokenizer::{CSSToken, HashType};

/// Pseudo-elements that parse. The first four also accept the legacy single-colon form.
const PSEUDO_ELEMENTS: [&str; 7] = [
    "before",
    "after",
    "first-line",
    "first-letter",
    "selection",
    "marker",
    "placeholder",
];

/// [§ 4.1 Selector lists](https://www.w3.org/TR/selectors-4/#grouping)
///
/// `<complex-selector-list> = <complex-selector>#`
///
/// Returns `None` if any alternative is invalid: "If just one of these
/// selectors were invalid, the entire selector list would be invalid."
pub(crate) fn parse_selector_list(values: &[ComponentValue], source: &str) -> Option<Selector> {
    let mut alternatives = split_commas(values)
        .into_iter()
        .map(|part| parse_complex(trimmed(part), source))
        .collect::<Option<Vec<_>>>()?;
    if alternatives.len() > 1 {
        Some(Selector::List(alternatives))
    } else {
        alternatives.pop()
    }
}

/// `<complex-selector> = <compound-selector> [ <combinator>? <compound-selector> ]*`
fn parse_complex(values: &[ComponentValue], source: &str) -> Option<Selector> {
    let mut cursor = Cursor {
        values,
        position: 0,
        source,
    };
    let mut compounds = vec![cursor.compound()?];
    let mut combinators = Vec::new();
    loop {
        let spaced = cursor.skip_whitespace();
        if cursor.peek().is_none() {
            break;
        }
        let combinator = match cursor.token_at(0) {
            Some(CSSToken::Delim('>')) => Combinator::Child,
            Some(CSSToken::Delim('+')) => Combinator::NextSibling,
            Some(CSSToken::Delim('~')) => Combinator::SubsequentSibling,
            _ if spaced => Combinator::Descendant,
            _ => return None,
        };
        if combinator != Combinator::Descendant {
            cursor.position += 1;
            let _ = cursor.skip_whitespace();
        }
        combinators.push(combinator);
        compounds.push(cursor.compound()?);
    }
    let subject = compounds.pop()?;
    if compounds.is_empty() {
        return Some(subject);
    }
    // Pair each compound with the combinator on its right, then flip so the
    // link nearest the subject comes first.
    let links = combinators.into_iter().zip(compounds).rev().collect();
    Some(Selector::Complex(ComplexSelector {
        subject: Box::new(subject),
        links,
    }))
}

struct Cursor<'a> {
    values: &'a [ComponentValue],
    position: usize,
    source: &'a str,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<&'a ComponentValue> {
        self.values.get(self.position)
    }

    fn token_at(&self, offset: usize) -> Option<&'a CSSToken> {
        self.values.get(self.position + offset)?.token()
    }

    fn ident_at(&self, offset: usize) -> Option<&'a str> {
        match self.token_at(offset) {
            Some(CSSToken::Ident(name)) => Some(name),
            _ => None,
        }
    }

    fn is_delim_at(&self, offset: usize, c: char) -> bool {
        matches!(self.token_at(offset), Some(CSSToken::Delim(d)) if *d == c)
    }

    /// Returns true if anything was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(ComponentValue::is_whitespace) {
            self.position += 1;
        }
        self.position > start
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    ///
    /// `<compound-selector> = [ <type-selector>? <subclass-selector>* [ <pseudo-element-selector> <pseudo-class-selector>* ]* ]!`
    fn compound(&mut self) -> Option<Selector> {
        let mut parts = Vec::new();
        if let Some(simple) = self.type_selector() {
            parts.push(Selector::Simple(simple));
        }
        while let Some(value) = self.peek() {
            let part = match value {
                ComponentValue::Block {
                    token: '[', value, ..
                } => {
                    self.position += 1;
                    Selector::Simple(SimpleSelector::Attribute(parse_attribute(value)?))
                }
                ComponentValue::Token(token) => match &token.kind {
                    // "An ID selector is a hash (#, U+0023) immediately followed by the ID value"
                    CSSToken::Hash {
                        value,
                        hash_type: HashType::Id,
                    } => {
                        self.position += 1;
                        Selector::Simple(SimpleSelector::Id(value.clone()))
                    }
                    // "The class selector is given as a full stop (. U+002E)
                    // immediately followed by an identifier."
                    CSSToken::Delim('.') => {
                        let name = self.ident_at(1)?;
                        self.position += 2;
                        Selector::Simple(SimpleSelector::Class(name.to_string()))
                    }
                    CSSToken::Colon => {
                        self.position += 1;
                        self.pseudo()?
                    }
                    _ => break,
                },
                _ => break,
            };
            parts.push(part);
        }
        match parts.len() {
            0 => None,
            1 => parts.pop(),
            _ => Some(Selector::Compound(parts)),
        }
    }

    /// [§ 5.3 Namespaces in Elemental Selectors](https://www.w3.org/TR/selectors-4/#type-nmsp)
    ///
    /// `ns|E`, `*|E`, `|E` and `E`, where `E` is a name or `*`.
    fn type_selector(&mut self) -> Option<SimpleSelector> {
        let name_at = |cursor: &Self, offset: usize| -> Option<String> {
            if cursor.is_delim_at(offset, '*') {
                Some("*".to_string())
            } else {
                cursor.ident_at(offset).map(str::to_string)
            }
        };
        let (prefix, name) = if self.is_delim_at(0, '|') {
            let name = name_at(self, 1)?;
            self.position += 2;
            (Some(String::new()), name)
        } else {
            let first = name_at(self, 0)?;
            match name_at(self, 2).filter(|_| self.is_delim_at(1, '|')) {
                Some(name) => {
                    self.position += 3;
                    (Some(first), name)
                }
                None => {
                    self.position += 1;
                    (None, first)
                }
            }
        };
        Some(if name == "*" {
            SimpleSelector::Universal(prefix)
        } else {
            SimpleSelector::Type { prefix, name }
        })
    }

    /// A pseudo-class or pseudo-element, after its first colon.
    fn pseudo(&mut self) -> Option<Selector> {
        let value = self.peek()?;
        self.position += 1;
        match value {
            // [§ 11 Pseudo-elements](https://www.w3.org/TR/selectors-4/#pseudo-elements)
            ComponentValue::Token(token) if token.kind == CSSToken::Colon => {
                let name = self.ident_at(0)?.to_ascii_lowercase();
                self.position += 1;
                PSEUDO_ELEMENTS
                    .contains(&name.as_str())
                    .then(|| Selector::Simple(SimpleSelector::PseudoElement(name)))
            }
            ComponentValue::Token(token) => {
                let CSSToken::Ident(name) = &token.kind else {
                    return None;
                };
                let lower = name.to_ascii_lowercase();
                if PSEUDO_ELEMENTS[..4].contains(&lower.as_str()) {
                    return Some(Selector::Simple(SimpleSelector::PseudoElement(lower)));
                }
                let pc = PseudoClass::from_name(&lower);
                if pc.is_none() {
                    log::debug!(target: "css", "unsupported pseudo-class :{name}");
                }
                pc.map(|pc| Selector::Simple(SimpleSelector::PseudoClass(pc)))
            }
            ComponentValue::Function { name, value, .. } => self.functional(name, value),
            ComponentValue::Block { .. } => None,
        }
    }

    fn functional(&self, name: &str, args: &[ComponentValue]) -> Option<Selector> {
        // [§ 4.3 The Negation Pseudo-class](https://www.w3.org/TR/selectors-4/#negation)
        // ":not( <complex-real-selector-list> )"
        if name.eq_ignore_ascii_case("not") {
            return parse_selector_list(args, self.source).map(|inner| Selector::Not(Box::new(inner)));
        }
        let Some(kind) = NthKind::from_name(name) else {
            log::debug!(target: "css", "unsupported functional pseudo-class :{name}()");
            return None;
        };
        // ":nth-child(An+B [of S]? )"
        let split = matches!(kind, NthKind::Child | NthKind::LastChild)
            .then(|| args.iter().position(|v| v.is_ident("of")))
            .flatten();
        let (formula, of) = match split {
            Some(index) => (
                &args[..index],
                Some(Box::new(parse_selector_list(&args[index + 1..], self.source)?)),
            ),
            None => (args, None),
        };
        let (step, offset) = parse_an_plus_b(&serialize_values(formula, self.source))?;
        Some(Selector::Child(NthSelector {
            kind,
            step,
            offset,
            of,
        }))
    }
}

/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
///
/// `[ <wq-name> ]` or `[ <wq-name> <attr-matcher> [ <string-token> | <ident-token> ] <attr-modifier>? ]`
fn parse_attribute(values: &[ComponentValue]) -> Option<AttributeSelector> {
    let mut cursor = Cursor {
        values,
        position: 0,
        source: "",
    };
    let _ = cursor.skip_whitespace();

    // A `|` only separates a namespace when a name follows it; `lang|=en` is a matcher.
    let (prefix, name) = match (cursor.token_at(0), cursor.token_at(1), cursor.ident_at(2)) {
        (Some(CSSToken::Delim('|')), _, _) => {
            let name = cursor.ident_at(1)?;
            cursor.position += 2;
            (Some(String::new()), name)
        }
        (Some(CSSToken::Delim('*')), Some(CSSToken::Delim('|')), Some(name)) => {
            cursor.position += 3;
            (Some("*".to_string()), name)
        }
        (Some(CSSToken::Ident(prefix)), Some(CSSToken::Delim('|')), Some(name)) => {
            cursor.position += 3;
            (Some(prefix.clone()), name)
        }
        (Some(CSSToken::Ident(name)), _, _) => {
            cursor.position += 1;
            (None, name.as_str())
        }
        _ => return None,
    };
    let mut selector = AttributeSelector::exists(name);
    selector.prefix = prefix;

    let _ = cursor.skip_whitespace();
    if cursor.peek().is_none() {
        return Some(selector);
    }

    selector.op = if cursor.is_delim_at(0, '=') {
        cursor.position += 1;
        AttributeOp::Equals
    } else {
        let Some(CSSToken::Delim(c)) = cursor.token_at(0) else {
            return None;
        };
        if !cursor.is_delim_at(1, '=') {
            return None;
        }
        cursor.position += 2;
        AttributeOp::from_delim(*c)?
    };

    let _ = cursor.skip_whitespace();
    selector.value = match cursor.token_at(0)? {
        CSSToken::Ident(value) | CSSToken::String(value) => value.clone(),
        _ => return None,
    };
    cursor.position += 1;

    // [§ 6.3 Case-sensitivity](https://www.w3.org/TR/selectors-4/#attribute-case)
    let _ = cursor.skip_whitespace();
    if let Some(flag) = cursor.ident_at(0) {
        if flag.eq_ignore_ascii_case("i") {
            selector.case_insensitive = true;
        } else if !flag.eq_ignore_ascii_case("s") {
            return None;
        }
        cursor.position += 1;
        let _ = cursor.skip_whitespace();
    }
    cursor.peek().is_none().then_some(selector)
}
