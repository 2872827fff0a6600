//! `@supports` conditions.
//!
//! [CSS Conditional Rules Level 3 § 6](https://www.w3.org/TR/css-conditional-3/#at-supports)
//!
//! ```text
//! <supports-condition> = not <supports-in-parens>
//!                      | <supports-in-parens> [ and <supports-in-parens> ]*
//!                      | <supports-in-parens> [ or <supports-in-parens> ]*
//! <supports-in-parens> = ( <supports-condition> ) | <supports-feature>
//! <supports-feature>   = ( <declaration> )
//! ```

use core::fmt;

use crate::format::{StyleFormatter, ToCss};
use crate::parser::syntax::{ComponentValue, SyntaxParser, serialize_values, trimmed};
use crate::properties::{self, CssValue, Property, normalize_name};
use crate::tokenizer::CSSToken;

/// A boolean expression over property support.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConditionFunction {
    /// No condition at all. Vacuously true.
    Empty,
    /// `(name: value)`: true if the property is known and accepts the value.
    Declaration(Property),
    /// `not <supports-in-parens>`
    Not(Box<ConditionFunction>),
    /// `a and b and ...`: true if no operand is false.
    And(Vec<ConditionFunction>),
    /// `a or b or ...`: true if any operand is true.
    Or(Vec<ConditionFunction>),
    /// `( <supports-condition> )`
    Group(Box<ConditionFunction>),
}

impl ConditionFunction {
    /// [§ 6.2 Definition of support](https://www.w3.org/TR/css-conditional-3/#support-definition)
    ///
    /// "A CSS processor is considered to support a declaration (consisting of a
    /// property and value) if it accepts that declaration (rather than discarding
    /// it as a parse error)."
    ///
    /// Only asks the registry; nothing is stored.
    #[must_use]
    pub fn check(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Declaration(property) => properties::accepts(&property.name, property.value.as_str()),
            // "The result is the negation of the <supports-in-parens> term."
            Self::Not(inner) => !inner.check(),
            // "The result is true if all of the <supports-in-parens> child terms are true,
            // and false otherwise."
            Self::And(terms) => terms.iter().all(Self::check),
            // "The result is true if any of the <supports-in-parens> child terms are true,
            // and false otherwise."
            Self::Or(terms) => terms.iter().any(Self::check),
            Self::Group(inner) => inner.check(),
        }
    }
}

impl ToCss for ConditionFunction {
    fn to_css(&self, _formatter: &dyn StyleFormatter) -> String {
        self.to_string()
    }
}

impl fmt::Display for ConditionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let join = |f: &mut fmt::Formatter<'_>, terms: &[Self], separator: &str| -> fmt::Result {
            for (index, term) in terms.iter().enumerate() {
                if index > 0 {
                    f.write_str(separator)?;
                }
                write!(f, "{term}")?;
            }
            Ok(())
        };
        match self {
            Self::Empty => Ok(()),
            Self::Declaration(property) => write!(f, "({}: {})", property.name, property.value),
            Self::Not(inner) => write!(f, "not {inner}"),
            Self::And(terms) => join(f, terms, " and "),
            Self::Or(terms) => join(f, terms, " or "),
            Self::Group(inner) => write!(f, "({inner})"),
        }
    }
}

/// Parse a whole `@supports` prelude. An empty prelude is [`ConditionFunction::Empty`].
pub(crate) fn parse_condition(values: &[ComponentValue], source: &str) -> Option<ConditionFunction> {
    let terms: Vec<&ComponentValue> = trimmed(values).iter().filter(|v| !v.is_whitespace()).collect();
    match terms.as_slice() {
        [] => Some(ConditionFunction::Empty),
        // "not <supports-in-parens>"
        [keyword, operand] if keyword.is_ident("not") => {
            parse_in_parens(operand, source).map(|inner| ConditionFunction::Not(Box::new(inner)))
        }
        [first, rest @ ..] => {
            let first = parse_in_parens(first, source)?;
            if rest.is_empty() {
                return Some(first);
            }
            let keyword = match rest.first()?.token()? {
                CSSToken::Ident(keyword) => keyword.to_ascii_lowercase(),
                _ => return None,
            };
            if keyword != "and" && keyword != "or" {
                return None;
            }
            // Mixing `and` and `or` at one level is invalid without parentheses.
            let mut operands = vec![first];
            for pair in rest.chunks(2) {
                let [connective, operand] = pair else {
                    return None;
                };
                if !connective.is_ident(&keyword) {
                    return None;
                }
                operands.push(parse_in_parens(operand, source)?);
            }
            Some(if keyword == "and" {
                ConditionFunction::And(operands)
            } else {
                ConditionFunction::Or(operands)
            })
        }
    }
}

/// `<supports-in-parens>`: a declaration test or a parenthesized condition.
fn parse_in_parens(value: &ComponentValue, source: &str) -> Option<ConditionFunction> {
    let ComponentValue::Block {
        token: '(', value, ..
    } = value
    else {
        return None;
    };
    let mut parser = SyntaxParser::new(value);
    if let Some(declaration) = parser.consume_declaration() {
        let property = Property {
            name: normalize_name(&declaration.name),
            value: CssValue::new(serialize_values(&declaration.value, source)),
            important: declaration.important,
        };
        return Some(ConditionFunction::Declaration(property));
    }
    let inner = parse_condition(value, source)?;
    (inner != ConditionFunction::Empty).then(|| ConditionFunction::Group(Box::new(inner)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::syntax::component_values;
    use crate::tokenizer::tokenize;

    fn parse(text: &str) -> Option<ConditionFunction> {
        parse_condition(&component_values(&tokenize(text)), text)
    }

    #[test]
    fn test_declaration() {
        let condition = parse("(display: flex)").unwrap();
        assert!(matches!(condition, ConditionFunction::Declaration(_)));
        assert!(condition.check());
        assert!(!parse("(display: old)").unwrap().check());
    }

    #[test]
    fn test_and_with_nested_not() {
        let condition = parse("(display: flex) and (not (display: old))").unwrap();
        assert!(condition.check());
        assert_eq!(condition.to_string(), "(display: flex) and (not (display: old))");
    }

    #[test]
    fn test_or_and_not() {
        assert!(parse("(display: old) or (color: red)").unwrap().check());
        assert!(!parse("not (color: red)").unwrap().check());
    }

    #[test]
    fn test_mixed_connectives_rejected() {
        assert_eq!(parse("(a: b) and (c: d) or (e: f)"), None);
        assert_eq!(parse("display: flex"), None);
        assert_eq!(parse("(display: flex) and"), None);
    }

    #[test]
    fn test_empty_is_true() {
        let condition = parse("").unwrap();
        assert_eq!(condition, ConditionFunction::Empty);
        assert!(condition.check());
        assert_eq!(condition.to_string(), "");
    }
}
