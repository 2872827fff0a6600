//! Integration tests for conditional group rules evaluated through the
//! parsed object model: `@media`, `@supports`, and `@document`.

use koala_css::media::{DeviceCategory, Pointer};
use koala_css::{CssError, CssParser, RenderDevice, StyleSheet};
use url::Url;

fn parse(text: &str) -> StyleSheet {
    CssParser::default().parse_stylesheet(text)
}

fn valid(text: &str, device: &RenderDevice, url: Option<&Url>) -> Result<bool, CssError> {
    let sheet = parse(text);
    let rule = sheet
        .get(0)
        .unwrap_or_else(|| panic!("`{text}` should parse into a rule"));
    rule.is_valid(device, url)
}

fn on(device: &RenderDevice, text: &str) -> bool {
    valid(text, device, None).unwrap()
}

fn at(url: &str, text: &str) -> Result<bool, CssError> {
    let url = Url::parse(url).unwrap();
    valid(text, &RenderDevice::default(), Some(&url))
}

#[test]
fn test_media_viewport_queries() {
    let phone = RenderDevice::with_size(375.0, 667.0);
    let desktop = RenderDevice::default();

    let narrow = "@media (max-width: 600px) { }";
    assert!(on(&phone, narrow));
    assert!(!on(&desktop, narrow));

    let portrait = "@media screen and (orientation: portrait) { }";
    assert!(on(&phone, portrait));
    assert!(!on(&desktop, portrait));

    // Em lengths resolve against the 16px default font size.
    assert!(on(&desktop, "@media (min-width: 60em) { }"));
    assert!(!on(&desktop, "@media (min-width: 70em) { }"));
}

#[test]
fn test_media_device_queries() {
    let printer = RenderDevice {
        category: DeviceCategory::Print,
        resolution_dpi: 300.0,
        monochrome_bits: 1,
        pointer: Pointer::None,
        ..RenderDevice::default()
    };
    assert!(on(&printer, "@media print and (monochrome) { }"));
    assert!(on(&printer, "@media (min-resolution: 2dppx) { }"));
    assert!(on(&printer, "@media (pointer: none) { }"));
    assert!(!on(&printer, "@media screen { }"));
    assert!(on(&printer, "@media not screen { }"));
    assert!(on(&printer, "@media screen, print { }"));

    let screen = RenderDevice::default();
    assert!(!on(&screen, "@media (monochrome) { }"));
    assert!(on(&screen, "@media all { }"));
    assert!(on(&screen, "@media { }"));
}

#[test]
fn test_supports_conditions() {
    let device = RenderDevice::default();
    assert!(on(&device, "@supports (display: flex) { }"));
    assert!(!on(&device, "@supports (display: sideways) { }"));
    assert!(!on(&device, "@supports (colour: red) { }"));
    assert!(on(&device, "@supports not (colour: red) { }"));
    assert!(on(&device, "@supports (colour: red) or (color: red) { }"));
    assert!(!on(&device, "@supports (display: flex) and (colour: red) { }"));
    assert!(on(&device, "@supports ((display: grid) and (not (float: sideways))) { }"));
}

#[test]
fn test_invalid_supports_preludes_drop_the_rule() {
    assert!(parse("@supports display: flex { }").is_empty());
    assert!(parse("@supports (a: b) and (c: d) or (e: f) { }").is_empty());
    assert!(parse("@supports { }").is_empty());
}

#[test]
fn test_document_functions() {
    let rule = "@document url(http://www.w3.org/), url-prefix(\"http://www.w3.org/Style/\"), \
                domain(\"mozilla.org\"), regexp(\"https:.*\") { }";
    assert_eq!(at("http://www.w3.org/", rule), Ok(true));
    assert_eq!(at("http://www.w3.org/Style/CSS/", rule), Ok(true));
    assert_eq!(at("http://developer.mozilla.org/en/", rule), Ok(true));
    assert_eq!(at("https://example.com/", rule), Ok(true));
    assert_eq!(at("http://example.com/", rule), Ok(false));
    assert_eq!(at("http://notmozilla.org/", rule), Ok(false));
}

#[test]
fn test_document_rule_without_url_is_invalid() {
    let device = RenderDevice::default();
    assert_eq!(valid("@document url-prefix(\"\") { }", &device, None), Ok(false));
}

#[test]
fn test_document_regexp_errors_surface() {
    let result = at("http://example.com/", "@document regexp(\"([a-z\") { }");
    assert!(matches!(result, Err(CssError::InvalidRegex { ref pattern, .. }) if pattern == "([a-z"));

    // A matching earlier function short-circuits the broken pattern.
    let result = at("http://example.com/", "@document domain(\"example.com\"), regexp(\"(\") { }");
    assert_eq!(result, Ok(true));
}

#[test]
fn test_unconditional_rules_are_always_valid() {
    let device = RenderDevice::default();
    assert!(on(&device, "p { color: red }"));
    assert!(on(&device, "@keyframes k { }"));
}
