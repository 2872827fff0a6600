//! `@document` URL matching functions.
//!
//! [CSS Conditional Rules Level 3, 2012 draft § 7](https://www.w3.org/TR/2012/WD-css3-conditional-20120911/#at-document)
//!
//! "The @document rule is a conditional group rule whose condition depends on
//! the URL of the document being styled." The rule applies if **any** of its
//! comma-separated functions matches.

use core::fmt;

use regex::Regex;
use url::Url;

use crate::error::CssError;
use crate::format::{StyleFormatter, ToCss, serialize_string};
use crate::parser::syntax::{ComponentValue, split_commas, trimmed};
use crate::tokenizer::CSSToken;

/// One URL predicate with its raw operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentFunction {
    /// "url(), which matches an exact URL"
    Url(String),
    /// "url-prefix(), which matches a URL prefix"
    UrlPrefix(String),
    /// "domain(), which matches a domain name"
    Domain(String),
    /// "regexp(), which matches a regular expression"
    ///
    /// The pattern uses `regex` crate syntax, an unanchored search. Backreferences
    /// and lookaround have no equivalent there, so patterns using them fail
    /// with [`CssError::InvalidRegex`] instead of matching.
    Regexp(String),
}

impl DocumentFunction {
    /// The function name as written in CSS.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Url(_) => "url",
            Self::UrlPrefix(_) => "url-prefix",
            Self::Domain(_) => "domain",
            Self::Regexp(_) => "regexp",
        }
    }

    /// The raw operand.
    #[must_use]
    pub fn operand(&self) -> &str {
        match self {
            Self::Url(data) | Self::UrlPrefix(data) | Self::Domain(data) | Self::Regexp(data) => data,
        }
    }

    /// Whether `url` satisfies this function.
    ///
    /// # Errors
    ///
    /// [`CssError::InvalidRegex`] if a `regexp()` operand does not compile.
    pub fn matches(&self, url: &Url) -> Result<bool, CssError> {
        Ok(match self {
            // "The 'url()' function is the URL matching function. It matches the
            // document if the URL of the document is the same as the given URL."
            Self::Url(data) => Url::parse(data).is_ok_and(|expected| expected == *url),
            // "The 'url-prefix()' function ... matches a document if the document's
            // URL starts with the string provided."
            Self::UrlPrefix(data) => url
                .as_str()
                .to_ascii_lowercase()
                .starts_with(&data.to_ascii_lowercase()),
            // "The 'domain()' function ... matches a document if its host name is the
            // given domain name or a subdomain of it."
            Self::Domain(data) => url.host_str().is_some_and(|host| {
                let host = host.to_ascii_lowercase();
                let domain = data.to_ascii_lowercase();
                host == domain || host.strip_suffix(&domain).is_some_and(|rest| rest.ends_with('.'))
            }),
            // "The 'regexp()' function ... matches a document if the URL of the
            // document matches the given regular expression."
            Self::Regexp(pattern) => Regex::new(pattern)
                .map_err(|error| CssError::InvalidRegex {
                    pattern: pattern.clone(),
                    message: error.to_string(),
                })?
                .is_match(url.as_str()),
        })
    }
}

impl ToCss for DocumentFunction {
    fn to_css(&self, _formatter: &dyn StyleFormatter) -> String {
        self.to_string()
    }
}

impl fmt::Display for DocumentFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name(), serialize_string(self.operand()))
    }
}

/// Parse a comma-separated list of document functions. `None` if any entry is
/// not a recognized function with a single string operand, or if the list is empty.
pub(crate) fn parse_document_functions(values: &[ComponentValue]) -> Option<Vec<DocumentFunction>> {
    let values = trimmed(values);
    if values.is_empty() {
        return None;
    }
    split_commas(values)
        .into_iter()
        .map(|part| parse_function(trimmed(part)))
        .collect()
}

fn parse_function(values: &[ComponentValue]) -> Option<DocumentFunction> {
    let [value] = values else {
        return None;
    };
    match value {
        // An unquoted `url(...)` arrives as a single <url-token>.
        ComponentValue::Token(token) => match &token.kind {
            CSSToken::Url(data) => Some(DocumentFunction::Url(data.clone())),
            _ => None,
        },
        ComponentValue::Function { name, value, .. } => {
            let [argument] = trimmed(value) else {
                return None;
            };
            let Some(CSSToken::String(data)) = argument.token() else {
                return None;
            };
            let data = data.clone();
            match name.to_ascii_lowercase().as_str() {
                "url" => Some(DocumentFunction::Url(data)),
                "url-prefix" => Some(DocumentFunction::UrlPrefix(data)),
                "domain" => Some(DocumentFunction::Domain(data)),
                "regexp" => Some(DocumentFunction::Regexp(data)),
                _ => None,
            }
        }
        ComponentValue::Block { .. } => None,
    }
}
