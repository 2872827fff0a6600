//! [Media Queries 4 § 4 Media features](https://www.w3.org/TR/mediaqueries-4/#media-descriptor-table)
//!
//! "A media feature is a more fine-grained test than media types, testing a
//! single, specific feature of the user agent or display device."

use core::fmt;

use super::device::{Pointer, RenderDevice};
use crate::format::serialize_number;
use crate::parser::syntax::{ComponentValue, trimmed};
use crate::tokenizer::CSSToken;

/// Tolerance for comparing converted lengths and ratios.
const EPSILON: f64 = 1e-6;

/// The features this engine can evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureKind {
    /// Viewport width.
    Width,
    /// Viewport height.
    Height,
    /// Viewport width divided by height.
    AspectRatio,
    /// Rendering surface width.
    DeviceWidth,
    /// Rendering surface height.
    DeviceHeight,
    /// Rendering surface width divided by height.
    DeviceAspectRatio,
    /// Character-cell device.
    Grid,
    /// Bits per pixel of a monochrome device.
    Monochrome,
    /// `portrait` or `landscape`.
    Orientation,
    /// Pointer accuracy.
    Pointer,
    /// Pixel density.
    Resolution,
    /// `interlace` or `progressive`.
    Scan,
}

const FEATURES: [(FeatureKind, &str); 12] = [
    (FeatureKind::Width, "width"),
    (FeatureKind::Height, "height"),
    (FeatureKind::AspectRatio, "aspect-ratio"),
    (FeatureKind::DeviceWidth, "device-width"),
    (FeatureKind::DeviceHeight, "device-height"),
    (FeatureKind::DeviceAspectRatio, "device-aspect-ratio"),
    (FeatureKind::Grid, "grid"),
    (FeatureKind::Monochrome, "monochrome"),
    (FeatureKind::Orientation, "orientation"),
    (FeatureKind::Pointer, "pointer"),
    (FeatureKind::Resolution, "resolution"),
    (FeatureKind::Scan, "scan"),
];

impl FeatureKind {
    /// The feature name without a `min-`/`max-` prefix.
    #[must_use]
    pub fn name(self) -> &'static str {
        FEATURES
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or("", |(_, name)| *name)
    }

    /// Look up a feature by unprefixed name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        FEATURES
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(kind, _)| *kind)
    }

    /// [§ 2.4.3 Range context](https://www.w3.org/TR/mediaqueries-4/#mq-range-context)
    ///
    /// "Media features with a 'range' type can be alternately written in a range
    /// context", which is also what permits the `min-`/`max-` prefixes.
    #[must_use]
    pub const fn is_range(self) -> bool {
        !matches!(self, Self::Grid | Self::Orientation | Self::Pointer | Self::Scan)
    }

    fn parse_value(self, values: &[ComponentValue]) -> Option<FeatureValue> {
        match self {
            Self::Width | Self::Height | Self::DeviceWidth | Self::DeviceHeight => parse_length(values),
            Self::AspectRatio | Self::DeviceAspectRatio => parse_ratio(values),
            Self::Monochrome => parse_integer(values).map(FeatureValue::Integer),
            Self::Resolution => parse_resolution(values),
            // "<mq-boolean> ... The only allowed values are 0 and 1."
            Self::Grid => parse_integer(values)
                .filter(|value| *value <= 1)
                .map(FeatureValue::Integer),
            Self::Orientation => parse_keyword(values, &["portrait", "landscape"]),
            Self::Pointer => parse_keyword(values, &["none", "coarse", "fine"]),
            Self::Scan => parse_keyword(values, &["interlace", "progressive"]),
        }
    }

    /// The device's value for a range feature.
    fn actual(self, device: &RenderDevice) -> f64 {
        match self {
            Self::Width => device.viewport_width,
            Self::Height => device.viewport_height,
            Self::AspectRatio => device.viewport_width / device.viewport_height,
            Self::DeviceWidth => device.device_width,
            Self::DeviceHeight => device.device_height,
            Self::DeviceAspectRatio => device.device_width / device.device_height,
            Self::Monochrome => f64::from(device.monochrome_bits),
            Self::Resolution => device.resolution_dpi,
            Self::Grid => f64::from(u8::from(device.is_grid)),
            Self::Orientation | Self::Pointer | Self::Scan => 0.0,
        }
    }

    /// The device's keyword for a discrete feature.
    fn keyword(self, device: &RenderDevice) -> &'static str {
        match self {
            // "portrait: The orientation media feature is portrait when the value of
            // the height media feature is greater than or equal to the value of the
            // width media feature."
            Self::Orientation if device.viewport_height >= device.viewport_width => "portrait",
            Self::Orientation => "landscape",
            Self::Pointer => device.pointer.name(),
            Self::Scan if device.is_interlaced => "interlace",
            Self::Scan => "progressive",
            _ => "",
        }
    }
}

/// How the device value is compared to the operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureMode {
    /// The bare feature name: equality.
    #[default]
    Exact,
    /// `min-`: the device value is at least the operand.
    Min,
    /// `max-`: the device value is at most the operand.
    Max,
}

impl FeatureMode {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Exact => "",
            Self::Min => "min-",
            Self::Max => "max-",
        }
    }
}

/// A parsed feature operand.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// A length with its unit as written.
    Length {
        /// The number.
        value: f64,
        /// The unit.
        unit: String,
    },
    /// `<ratio> = <number> / <number>`
    Ratio(f64, f64),
    /// A resolution with its unit as written.
    Resolution {
        /// The number.
        value: f64,
        /// The unit.
        unit: String,
    },
    /// A non-negative integer.
    Integer(u32),
    /// A lowercase keyword.
    Keyword(String),
}

impl FeatureValue {
    /// The value in the device's units: CSS pixels, dpi, or a plain number.
    #[must_use]
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Length { value, unit } => value * length_factor(unit).unwrap_or(1.0),
            Self::Ratio(numerator, denominator) => numerator / denominator,
            Self::Resolution { value, unit } => value * resolution_factor(unit).unwrap_or(1.0),
            Self::Integer(value) => f64::from(*value),
            Self::Keyword(_) => 0.0,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { value, unit } | Self::Resolution { value, unit } => {
                write!(f, "{}{unit}", serialize_number(*value))
            }
            Self::Ratio(numerator, denominator) => {
                write!(f, "{}/{}", serialize_number(*numerator), serialize_number(*denominator))
            }
            Self::Integer(value) => write!(f, "{value}"),
            Self::Keyword(keyword) => f.write_str(keyword),
        }
    }
}

/// [§ 3 Syntax](https://www.w3.org/TR/mediaqueries-4/#mq-syntax)
///
/// `<mf-plain> = <mf-name> : <mf-value>` or `<mf-boolean> = <mf-name>`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaFeature {
    /// Which feature.
    pub kind: FeatureKind,
    /// Exact, lower or upper bound.
    pub mode: FeatureMode,
    /// The operand, absent for a boolean test.
    pub value: Option<FeatureValue>,
}

impl MediaFeature {
    /// The feature name as written, including any `min-`/`max-` prefix.
    #[must_use]
    pub fn name(&self) -> String {
        format!("{}{}", self.mode.prefix(), self.kind.name())
    }

    /// Evaluate against `device`.
    #[must_use]
    pub fn matches(&self, device: &RenderDevice) -> bool {
        let Some(expected) = &self.value else {
            // [§ 2.4.4 Evaluating Media Features in a Boolean Context](https://www.w3.org/TR/mediaqueries-4/#mq-boolean-context)
            //
            // "the media feature is evaluated in a boolean context. If the feature
            // would be true for any value other than the number 0, a dimension with
            // the value 0, the keyword none, or a value explicitly defined by that
            // media feature to evaluate as false in a boolean context, the media
            // feature evaluates to true."
            return match self.kind {
                FeatureKind::Orientation | FeatureKind::Scan => true,
                FeatureKind::Pointer => device.pointer != Pointer::None,
                kind => kind.actual(device) > 0.0,
            };
        };
        if self.kind.is_range() || self.kind == FeatureKind::Grid {
            compare(self.mode, self.kind.actual(device), expected.to_number())
        } else {
            matches!(expected, FeatureValue::Keyword(keyword) if keyword == self.kind.keyword(device))
        }
    }
}

/// The comparison shared by every range feature.
fn compare(mode: FeatureMode, actual: f64, expected: f64) -> bool {
    match mode {
        FeatureMode::Exact => (actual - expected).abs() < EPSILON,
        FeatureMode::Min => actual >= expected - EPSILON,
        FeatureMode::Max => actual <= expected + EPSILON,
    }
}

/// Parse the contents of a `( ... )` feature block.
pub(crate) fn parse_feature(values: &[ComponentValue]) -> Option<MediaFeature> {
    let values = trimmed(values);
    let (first, rest) = values.split_first()?;
    let Some(CSSToken::Ident(name)) = first.token() else {
        return None;
    };
    let name = name.to_ascii_lowercase();
    let (mode, base) = if let Some(base) = name.strip_prefix("min-") {
        (FeatureMode::Min, base)
    } else if let Some(base) = name.strip_prefix("max-") {
        (FeatureMode::Max, base)
    } else {
        (FeatureMode::Exact, name.as_str())
    };
    let kind = FeatureKind::from_name(base)?;
    if mode != FeatureMode::Exact && !kind.is_range() {
        log::debug!(target: "css", "`{name}` has no range form");
        return None;
    }

    let rest = trimmed(rest);
    if rest.is_empty() {
        // "min-" and "max-" prefixes are not allowed in a boolean context.
        return (mode == FeatureMode::Exact).then_some(MediaFeature { kind, mode, value: None });
    }
    let (colon, operand) = rest.split_first()?;
    if !matches!(colon.token(), Some(CSSToken::Colon)) {
        return None;
    }
    let value = kind.parse_value(trimmed(operand))?;
    Some(MediaFeature {
        kind,
        mode,
        value: Some(value),
    })
}

fn parse_length(values: &[ComponentValue]) -> Option<FeatureValue> {
    match values {
        [value] => match value.token()? {
            CSSToken::Dimension { value, unit, .. } if length_factor(unit).is_some() => Some(FeatureValue::Length {
                value: *value,
                unit: unit.to_ascii_lowercase(),
            }),
            // A unitless zero is a length.
            CSSToken::Number { value, .. } if *value == 0.0 => Some(FeatureValue::Length {
                value: 0.0,
                unit: "px".to_string(),
            }),
            _ => None,
        },
        _ => None,
    }
}

fn parse_resolution(values: &[ComponentValue]) -> Option<FeatureValue> {
    match values {
        [value] => match value.token()? {
            CSSToken::Dimension { value, unit, .. } if resolution_factor(unit).is_some() => {
                Some(FeatureValue::Resolution {
                    value: *value,
                    unit: unit.to_ascii_lowercase(),
                })
            }
            _ => None,
        },
        _ => None,
    }
}

/// `<ratio> = <number [0,∞]> [ / <number [0,∞]> ]?`
fn parse_ratio(values: &[ComponentValue]) -> Option<FeatureValue> {
    let terms: Vec<&ComponentValue> = values.iter().filter(|v| !v.is_whitespace()).collect();
    let number = |value: &ComponentValue| match value.token() {
        Some(CSSToken::Number { value, .. }) if *value >= 0.0 => Some(*value),
        _ => None,
    };
    let (numerator, denominator) = match terms.as_slice() {
        [single] => (number(single)?, 1.0),
        [numerator, slash, denominator] if slash.is_delim('/') => (number(numerator)?, number(denominator)?),
        _ => return None,
    };
    (denominator > 0.0).then_some(FeatureValue::Ratio(numerator, denominator))
}

fn parse_integer(values: &[ComponentValue]) -> Option<u32> {
    match values {
        [value] => match value.token()? {
            CSSToken::Number {
                int_value: Some(value), ..
            } => u32::try_from(*value).ok(),
            _ => None,
        },
        _ => None,
    }
}

fn parse_keyword(values: &[ComponentValue], allowed: &[&str]) -> Option<FeatureValue> {
    match values {
        [value] => match value.token()? {
            CSSToken::Ident(keyword) => allowed
                .iter()
                .find(|known| known.eq_ignore_ascii_case(keyword))
                .map(|known| FeatureValue::Keyword((*known).to_string())),
            _ => None,
        },
        _ => None,
    }
}

/// [CSS Values 4 § 6.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
///
/// Pixels per unit. Font-relative units assume a 16px root font.
fn length_factor(unit: &str) -> Option<f64> {
    Some(match unit.to_ascii_lowercase().as_str() {
        "px" => 1.0,
        "em" | "rem" => 16.0,
        "pt" => 96.0 / 72.0,
        "pc" => 16.0,
        "in" => 96.0,
        "cm" => 96.0 / 2.54,
        "mm" => 96.0 / 25.4,
        "q" => 96.0 / 101.6,
        _ => return None,
    })
}

/// [CSS Values 4 § 7.4 Resolution units](https://www.w3.org/TR/css-values-4/#resolution)
///
/// Dots per inch per unit.
fn resolution_factor(unit: &str) -> Option<f64> {
    Some(match unit.to_ascii_lowercase().as_str() {
        "dpi" => 1.0,
        "dpcm" => 2.54,
        "dppx" | "x" => 96.0,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::syntax::component_values;
    use crate::tokenizer::tokenize;

    fn feature(text: &str) -> Option<MediaFeature> {
        parse_feature(&component_values(&tokenize(text)))
    }

    #[test]
    fn test_min_max_width() {
        let device = RenderDevice::with_size(800.0, 600.0);
        assert!(feature("min-width: 600px").unwrap().matches(&device));
        assert!(!feature("max-width: 600px").unwrap().matches(&device));
        assert!(feature("width: 50em").unwrap().matches(&device));
        assert!(feature("max-width: 800px").unwrap().matches(&device));
    }

    #[test]
    fn test_aspect_ratio() {
        let device = RenderDevice::with_size(1600.0, 900.0);
        assert!(feature("aspect-ratio: 16/9").unwrap().matches(&device));
        assert!(feature("min-aspect-ratio: 4 / 3").unwrap().matches(&device));
        assert_eq!(feature("aspect-ratio: 16/0"), None);
    }

    #[test]
    fn test_resolution_units() {
        let device = RenderDevice {
            resolution_dpi: 192.0,
            ..RenderDevice::default()
        };
        assert!(feature("resolution: 2dppx").unwrap().matches(&device));
        assert!(feature("min-resolution: 150dpi").unwrap().matches(&device));
        assert!(!feature("max-resolution: 1x").unwrap().matches(&device));
    }

    #[test]
    fn test_discrete_features() {
        let device = RenderDevice::with_size(600.0, 800.0);
        assert!(feature("orientation: portrait").unwrap().matches(&device));
        assert!(!feature("orientation: landscape").unwrap().matches(&device));
        assert!(feature("scan: progressive").unwrap().matches(&device));
        assert!(feature("pointer: fine").unwrap().matches(&device));
        assert!(feature("grid: 0").unwrap().matches(&device));
        assert!(!feature("grid").unwrap().matches(&device));
    }

    #[test]
    fn test_boolean_context() {
        let device = RenderDevice::default();
        assert!(feature("width").unwrap().matches(&device));
        assert!(!feature("monochrome").unwrap().matches(&device));
        assert_eq!(feature("min-width"), None);
        assert_eq!(feature("min-orientation: portrait"), None);
    }

    #[test]
    fn test_rejects_bad_operands() {
        assert_eq!(feature("width: red"), None);
        assert_eq!(feature("orientation: sideways"), None);
        assert_eq!(feature("grid: 2"), None);
        assert_eq!(feature("colour-depth: 8"), None);
    }

    #[test]
    fn test_display() {
        let parsed = feature("min-width: 600px").unwrap();
        assert_eq!(parsed.name(), "min-width");
        assert_eq!(parsed.value.unwrap().to_string(), "600px");
        assert_eq!(feature("aspect-ratio: 16/9").unwrap().value.unwrap().to_string(), "16/9");
    }
}
