//! [§ 14.4 Child-indexed Pseudo-classes](https://www.w3.org/TR/selectors-4/#child-index)
//!
//! `:nth-child()`, `:nth-last-child()`, `:nth-of-type()` and `:nth-last-of-type()`.

use core::fmt;
use std::iter::successors;

use super::{Element, Selector, Specificity};

/// Which siblings are counted, and from which end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NthKind {
    /// `:nth-child()`, counting from the first sibling.
    Child,
    /// `:nth-last-child()`, counting from the last sibling.
    LastChild,
    /// `:nth-of-type()`, counting siblings of the same type.
    OfType,
    /// `:nth-last-of-type()`, counting siblings of the same type from the end.
    LastOfType,
}

impl NthKind {
    /// The pseudo-class name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Child => "nth-child",
            Self::LastChild => "nth-last-child",
            Self::OfType => "nth-of-type",
            Self::LastOfType => "nth-last-of-type",
        }
    }

    /// Look a pseudo-class name up, ASCII case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Child, Self::LastChild, Self::OfType, Self::LastOfType]
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    const fn from_end(self) -> bool {
        matches!(self, Self::LastChild | Self::LastOfType)
    }

    const fn same_type(self) -> bool {
        matches!(self, Self::OfType | Self::LastOfType)
    }
}

/// [§ 14.4.1 :nth-child()](https://www.w3.org/TR/selectors-4/#the-nth-child-pseudo)
///
/// "The :nth-child(An+B [of S]?) pseudo-class notation represents elements
/// that are among An+Bth elements from the list composed of their inclusive
/// siblings that match the selector list S."
#[derive(Debug, Clone, PartialEq)]
pub struct NthSelector {
    /// Which siblings are counted.
    pub kind: NthKind,
    /// The step `A`.
    pub step: i32,
    /// The offset `B`.
    pub offset: i32,
    /// The optional `of S` filter (only on the `-child` forms).
    pub of: Option<Box<Selector>>,
}

impl NthSelector {
    /// A selector matching positions `step·n + offset`.
    #[must_use]
    pub const fn new(kind: NthKind, step: i32, offset: i32) -> Self {
        Self {
            kind,
            step,
            offset,
            of: None,
        }
    }

    /// [§ 17](https://www.w3.org/TR/selectors-4/#specificity-rules)
    ///
    /// "The specificity of an :nth-child() or :nth-last-child() selector is the
    /// specificity of the pseudo class itself (counting as one pseudo-class
    /// selector) plus the specificity of the most specific complex selector in
    /// its selector list argument (if any)."
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        Specificity::ONE_CLASS + self.of.as_ref().map_or(Specificity::ZERO, |of| of.specificity())
    }

    /// Match against the element's 1-based index among the counted siblings.
    pub fn matches<E: Element>(&self, element: &E) -> bool {
        if let Some(of) = &self.of {
            if !of.matches(element) {
                return false;
            }
        }
        let step: fn(&E) -> Option<E> = if self.kind.from_end() {
            E::next_sibling_element
        } else {
            E::prev_sibling_element
        };
        let siblings = successors(step(element), step).filter(|sibling| self.counts(element, sibling));
        let Ok(position) = i32::try_from(siblings.count() + 1) else {
            return false;
        };
        matches_position(self.step, self.offset, position)
    }

    fn counts<E: Element>(&self, element: &E, sibling: &E) -> bool {
        if self.kind.same_type() {
            return sibling.local_name().eq_ignore_ascii_case(element.local_name());
        }
        self.of.as_ref().is_none_or(|of| of.matches(sibling))
    }
}

impl fmt::Display for NthSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}({}n", self.kind.name(), self.step)?;
        match self.offset {
            0 => {}
            b if b > 0 => write!(f, "+{b}")?,
            b => write!(f, "{b}")?,
        }
        if let Some(of) = &self.of {
            write!(f, " of {of}")?;
        }
        f.write_str(")")
    }
}

/// True if `position = step·n + offset` for some integer `n ≥ 0`.
#[must_use]
pub const fn matches_position(step: i32, offset: i32, position: i32) -> bool {
    let diff = position as i64 - offset as i64;
    if step == 0 {
        return diff == 0;
    }
    let step = step as i64;
    diff % step == 0 && diff / step >= 0
}

/// [CSS Syntax § 6 The An+B microsyntax](https://www.w3.org/TR/css-syntax-3/#anb-microsyntax)
///
/// Parse `odd`, `even`, `B`, `An`, `An+B` and `An-B` with optional whitespace
/// around the sign. Returns `(A, B)`.
#[must_use]
pub fn parse_an_plus_b(text: &str) -> Option<(i32, i32)> {
    let compact: String = text
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    match compact.as_str() {
        // "odd" "Equivalent to 2n+1."
        "odd" => return Some((2, 1)),
        // "even" "Equivalent to 2n."
        "even" => return Some((2, 0)),
        "" => return None,
        _ => {}
    }
    let Some((a, b)) = compact.split_once('n') else {
        return parse_signed(&compact).map(|b| (0, b));
    };
    let step = match a {
        "" | "+" => 1,
        "-" => -1,
        a => parse_signed(a)?,
    };
    let offset = if b.is_empty() {
        0
    } else if b.starts_with(['+', '-']) {
        parse_signed(b)?
    } else {
        return None;
    };
    Some((step, offset))
}

fn parse_signed(text: &str) -> Option<i32> {
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.strip_prefix('+').unwrap_or(text).parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_an_plus_b("odd"), Some((2, 1)));
        assert_eq!(parse_an_plus_b("EVEN"), Some((2, 0)));
    }

    #[test]
    fn test_parse_forms() {
        assert_eq!(parse_an_plus_b("3"), Some((0, 3)));
        assert_eq!(parse_an_plus_b("-n+3"), Some((-1, 3)));
        assert_eq!(parse_an_plus_b("2n + 1"), Some((2, 1)));
        assert_eq!(parse_an_plus_b("n"), Some((1, 0)));
        assert_eq!(parse_an_plus_b("0n+3"), Some((0, 3)));
        assert_eq!(parse_an_plus_b("4n-2"), Some((4, -2)));
        assert_eq!(parse_an_plus_b("2n1"), None);
        assert_eq!(parse_an_plus_b("x"), None);
    }

    #[test]
    fn test_odd_positions() {
        let hits: Vec<i32> = (1..=8).filter(|&p| matches_position(2, 1, p)).collect();
        assert_eq!(hits, vec![1, 3, 5, 7]);
    }

    #[test]
    fn test_negative_step_bounds_from_above() {
        let hits: Vec<i32> = (1..=8).filter(|&p| matches_position(-1, 3, p)).collect();
        assert_eq!(hits, vec![1, 2, 3]);
    }

    #[test]
    fn test_display() {
        assert_eq!(NthSelector::new(NthKind::Child, 2, 1).to_string(), ":nth-child(2n+1)");
        assert_eq!(NthSelector::new(NthKind::Child, 0, 3).to_string(), ":nth-child(0n+3)");
        assert_eq!(NthSelector::new(NthKind::LastOfType, 3, -1).to_string(), ":nth-last-of-type(3n-1)");
        assert_eq!(NthSelector::new(NthKind::OfType, 2, 0).to_string(), ":nth-of-type(2n)");
    }

    #[quickcheck]
    fn matches_position_agrees_with_enumeration(a: i8, b: i8, position: u8) -> bool {
        let (a, b, position) = (i32::from(a), i32::from(b), i32::from(position) + 1);
        let enumerated = (0..=600).any(|n| a * n + b == position);
        matches_position(a, b, position) == enumerated
    }
}
