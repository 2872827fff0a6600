//! CSS tokenizer, parser, rule object model, selector matching, and condition
//! evaluation.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - All token types, each with a source span and line/column position
//!
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Stylesheets, single rules, declarations, selectors, media lists,
//!     `@supports` conditions, `@document` functions
//!   - Configurable tolerance for unknown rules, declarations, and selectors
//!
//! - **CSS Object Model** ([CSSOM § 6](https://www.w3.org/TR/cssom-1/#css-object-model))
//!   - Charset, import, namespace, style, page, font-face, media, supports,
//!     document, keyframes, and keyframe rules
//!   - `cssText` round-tripping, `insertRule`/`deleteRule`, and the node
//!     contract with parent/owner bookkeeping
//!   - Asynchronous, cancellable `@import` loading with cycle detection
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID, universal, attribute, pseudo-class, and
//!     pseudo-element selectors; `:not()` and the `:nth-*()` family
//!   - Complex selectors with all four combinators; selector lists
//!   - Specificity calculation
//!
//! - **Conditional Rules** ([CSS Conditional Rules Level 3](https://www.w3.org/TR/css-conditional-3/))
//!   - `@media` queries evaluated against a [`RenderDevice`]
//!   - `@supports` conditions evaluated against the property registry
//!   - `@document` URL matchers
//!
//! # Not Implemented
//!
//! - Computed values, the cascade's value resolution, and layout

/// `@supports` conditions per [CSS Conditional Rules Level 3 § 6](https://www.w3.org/TR/css-conditional-3/#at-supports).
pub mod condition;
/// `@document` URL matchers.
pub mod document;
/// Errors raised by rule mutation and evaluation.
pub mod error;
/// Compact and pretty serialization per [CSSOM § 6.7](https://www.w3.org/TR/cssom-1/#serializing-css-values).
pub mod format;
/// Media queries per [Media Queries Level 4](https://www.w3.org/TR/mediaqueries-4/).
pub mod media;
/// The node tree rules are built from.
pub mod node;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Declarations and the property registry.
pub mod properties;
/// The CSS rule object model per [CSSOM § 6.4](https://www.w3.org/TR/cssom-1/#css-rules).
pub mod rules;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use condition::ConditionFunction;
pub use document::DocumentFunction;
pub use error::CssError;
pub use format::{CompactFormatter, PrettyFormatter, StyleFormatter, ToCss};
pub use media::{MediaFeature, MediaList, Medium, RenderDevice};
pub use node::{Container, CssNode, RuleId};
pub use parser::{CssParser, CssParserOptions};
pub use properties::{CssValue, Property, StyleDeclaration};
pub use rules::{KeyframeSelector, MatchedRule, RuleRef, RuleType, SheetId, StyleSheet};
pub use selector::{Element, Selector, Specificity};
pub use tokenizer::{CSSToken, CSSTokenizer, tokenize};
