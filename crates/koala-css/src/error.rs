//! Error kinds raised by the CSS object model.
//!
//! [CSSOM § 6 Interfaces](https://www.w3.org/TR/cssom-1/#css-object-model)
//! names its failures after the DOM exception types; each variant here
//! carries the same meaning.

use thiserror::Error;

use crate::rules::RuleType;

/// Errors raised by rule mutation and condition evaluation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CssError {
    /// "SyntaxError": the supplied text could not be parsed.
    #[error("syntax error: {0}")]
    Syntax(String),

    /// "InvalidModificationError": the text parsed into a rule of another type.
    #[error("cannot change a {expected:?} rule into a {found:?} rule")]
    InvalidModification {
        /// The type of the rule being modified.
        expected: RuleType,
        /// The type the new text parsed into.
        found: RuleType,
    },

    /// "InvalidStateError": the rule is in a position that forbids the change.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The node is already attached to a parent.
    #[error("node is already in use by another parent")]
    InUse,

    /// "HierarchyRequestError": attaching would make a rule its own ancestor.
    #[error("a rule cannot contain itself")]
    HierarchyRequest,

    /// "NotFoundError": the referenced child is not in the container.
    #[error("node not found in container")]
    NotFound,

    /// "IndexSizeError": the index is out of range.
    #[error("index {index} is out of range for a list of {len}")]
    IndexSize {
        /// The requested index.
        index: usize,
        /// The length of the list.
        len: usize,
    },

    /// A `@document regexp()` operand is not a valid pattern.
    #[error("invalid regular expression `{pattern}`: {message}")]
    InvalidRegex {
        /// The offending pattern.
        pattern: String,
        /// The compiler's explanation.
        message: String,
    },
}
