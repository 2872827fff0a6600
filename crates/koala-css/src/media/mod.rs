//! Media queries per [Media Queries Level 4](https://www.w3.org/TR/mediaqueries-4/).
//!
//! "A media query is a method of testing certain aspects of the user agent or
//! device that the document is being displayed in."

mod device;
mod feature;

use core::fmt;

pub use device::{DeviceCategory, Pointer, RenderDevice};
pub use feature::{FeatureKind, FeatureMode, FeatureValue, MediaFeature};

use crate::format::{CompactFormatter, StyleFormatter, ToCss};
use crate::parser::syntax::{ComponentValue, split_commas, trimmed};
use crate::tokenizer::CSSToken;

/// The `only` / `not` prefix of a media query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaModifier {
    /// "The only keyword has no effect on the media query's result, but will
    /// cause the media query to be parsed by legacy user agents as specifying
    /// the unknown media type 'only', and thus be ignored."
    Only,
    /// "The not keyword ... negates the result of the media query."
    Not,
}

/// [§ 2 Media Queries](https://www.w3.org/TR/mediaqueries-4/#media)
///
/// One comma-separated entry of a media query list.
#[derive(Debug, Clone, PartialEq)]
pub struct Medium {
    /// `only` or `not`, if present.
    pub modifier: Option<MediaModifier>,
    /// The lowercase media type, absent when the query starts with a feature.
    pub media_type: Option<String>,
    /// Feature tests joined by `and`.
    pub features: Vec<MediaFeature>,
}

impl Medium {
    /// "A media query computes to true if the media type (if specified) matches
    /// the media type of the device where the user agent is running, and the media
    /// condition (if specified) is true."
    #[must_use]
    pub fn is_valid(&self, device: &RenderDevice) -> bool {
        let type_matches = self
            .media_type
            .as_deref()
            .is_none_or(|media_type| media_type == "all" || media_type == device.category.name());
        let result = type_matches && self.features.iter().all(|feature| feature.matches(device));
        if self.modifier == Some(MediaModifier::Not) {
            !result
        } else {
            result
        }
    }
}

impl ToCss for Medium {
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String {
        let constraints: Vec<String> = self
            .features
            .iter()
            .map(|feature| {
                let value = feature.value.as_ref().map(ToString::to_string);
                formatter.constraint(&feature.name(), value.as_deref())
            })
            .collect();
        formatter.medium(
            self.modifier == Some(MediaModifier::Only),
            self.modifier == Some(MediaModifier::Not),
            self.media_type.as_deref().unwrap_or_default(),
            &constraints,
        )
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(&CompactFormatter))
    }
}

/// [CSSOM § 4.1 The MediaList Interface](https://www.w3.org/TR/cssom-1/#the-medialist-interface)
///
/// "An object that implements the MediaList interface has an associated
/// collection of media queries."
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MediaList {
    /// The queries in source order.
    pub media: Vec<Medium>,
}

impl MediaList {
    /// True if the list has no queries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.media.is_empty()
    }

    /// "A media query list matches a user agent if any of its media queries match."
    /// An empty list matches every device.
    #[must_use]
    pub fn is_valid(&self, device: &RenderDevice) -> bool {
        self.media.is_empty() || self.media.iter().any(|medium| medium.is_valid(device))
    }
}

impl ToCss for MediaList {
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String {
        self.media
            .iter()
            .map(|medium| medium.to_css(formatter))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MediaList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css(&CompactFormatter))
    }
}

/// [§ 3.1 Parsing a media query list](https://www.w3.org/TR/mediaqueries-4/#error-handling)
///
/// An empty prelude yields an empty list. Any malformed query fails the whole list.
pub(crate) fn parse_media_list(values: &[ComponentValue]) -> Option<MediaList> {
    let values = trimmed(values);
    if values.is_empty() {
        return Some(MediaList::default());
    }
    let media = split_commas(values)
        .into_iter()
        .map(parse_medium)
        .collect::<Option<Vec<_>>>()?;
    Some(MediaList { media })
}

/// `<media-query> = [ not | only ]? <media-type> [ and <media-condition> ]? | <media-condition>`
pub(crate) fn parse_medium(values: &[ComponentValue]) -> Option<Medium> {
    let terms: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
    let mut terms = terms.as_slice();
    let mut medium = Medium {
        modifier: None,
        media_type: None,
        features: Vec::new(),
    };

    if let [first, rest @ ..] = terms
        && let Some(CSSToken::Ident(word)) = first.token()
    {
        let word = word.to_ascii_lowercase();
        match word.as_str() {
            "only" => medium.modifier = Some(MediaModifier::Only),
            "not" => medium.modifier = Some(MediaModifier::Not),
            "and" | "or" => return None,
            _ => medium.media_type = Some(word),
        }
        terms = rest;
        if medium.modifier.is_some() {
            // "only" and "not" must be followed by a media type.
            let (media_type, rest) = terms.split_first()?;
            let Some(CSSToken::Ident(media_type)) = media_type.token() else {
                return None;
            };
            medium.media_type = Some(media_type.to_ascii_lowercase());
            terms = rest;
        }
        if terms.is_empty() {
            return Some(medium);
        }
        let (connective, rest) = terms.split_first()?;
        if !connective.is_ident("and") {
            return None;
        }
        terms = rest;
    }

    loop {
        let (block, rest) = terms.split_first()?;
        let ComponentValue::Block {
            token: '(', value, ..
        } = block
        else {
            return None;
        };
        medium.features.push(feature::parse_feature(value)?);
        match rest {
            [] => return Some(medium),
            [connective, rest @ ..] if connective.is_ident("and") => terms = rest,
            _ => return None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::syntax::component_values;
    use crate::tokenizer::tokenize;

    fn media(text: &str) -> Option<MediaList> {
        parse_media_list(&component_values(&tokenize(text)))
    }

    #[test]
    fn test_type_and_feature() {
        let list = media("only screen and (min-width: 600px)").unwrap();
        assert_eq!(list.to_string(), "only screen and (min-width: 600px)");
        assert!(list.is_valid(&RenderDevice::default()));
        assert!(!list.is_valid(&RenderDevice::with_size(400.0, 300.0)));
    }

    #[test]
    fn test_not_inverts() {
        let list = media("not print").unwrap();
        assert!(list.is_valid(&RenderDevice::default()));
        let printer = RenderDevice {
            category: DeviceCategory::Print,
            ..RenderDevice::default()
        };
        assert!(!list.is_valid(&printer));
    }

    #[test]
    fn test_any_medium_matches() {
        let list = media("print, (max-width: 2000px)").unwrap();
        assert_eq!(list.media.len(), 2);
        assert!(list.is_valid(&RenderDevice::default()));
    }

    #[test]
    fn test_empty_list_always_valid() {
        let list = media("  ").unwrap();
        assert!(list.is_empty());
        assert!(list.is_valid(&RenderDevice::default()));
    }

    #[test]
    fn test_malformed_lists_fail() {
        assert_eq!(media("screen and"), None);
        assert_eq!(media("screen (width)"), None);
        assert_eq!(media("not (width)"), None);
        assert_eq!(media("screen, "), None);
        assert_eq!(media("(min-width: big)"), None);
    }

    #[test]
    fn test_unknown_type_never_matches() {
        assert!(!media("tv").unwrap().is_valid(&RenderDevice::default()));
        assert!(media("all").unwrap().is_valid(&RenderDevice::default()));
    }
}
