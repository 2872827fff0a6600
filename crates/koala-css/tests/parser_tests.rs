//! Integration tests for the parser façade and the rule builder.

use koala_css::{CssParser, CssParserOptions, RuleType, StyleSheet, ToCss};

fn parse(text: &str) -> StyleSheet {
    CssParser::default().parse_stylesheet(text)
}

fn types(sheet: &StyleSheet) -> Vec<RuleType> {
    sheet.rules().map(|rule| rule.rule_type()).collect()
}

const LENIENT: CssParserOptions = CssParserOptions {
    tolerate_invalid_selectors: true,
    include_unknown_rules: true,
    include_unknown_declarations: true,
    include_invalid_values: true,
};

#[test]
fn test_empty_stylesheet() {
    let sheet = parse("");
    assert!(sheet.is_empty());
    assert_eq!(sheet.css_text(), "");
}

#[test]
fn test_style_rule() {
    let sheet = parse("body { margin: 0; color: red !important }");
    let rule = sheet.get(0).unwrap();
    assert_eq!(rule.rule_type(), RuleType::Style);
    assert_eq!(rule.selector_text(), "body");
    let style = rule.style().unwrap();
    assert_eq!(style.len(), 2);
    assert_eq!(style.get_property_value("margin"), Some("0"));
    assert_eq!(style.get_property_priority("color"), "important");
    assert_eq!(rule.css_text(), "body { margin: 0; color: red !important }");
}

#[test]
fn test_every_rule_type() {
    let sheet = parse(
        r#"@charset "UTF-8";
        @import url("base.css") screen;
        @namespace svg url(http://www.w3.org/2000/svg);
        p { color: red }
        @media print { p { color: black } }
        @supports (display: grid) { div { display: grid } }
        @document domain("example.com") { a { color: blue } }
        @keyframes spin { from { opacity: 0 } to { opacity: 1 } }
        @page :first { margin: 1in }
        @font-face { font-family: Serif }"#,
    );
    assert_eq!(
        types(&sheet),
        [
            RuleType::Charset,
            RuleType::Import,
            RuleType::Namespace,
            RuleType::Style,
            RuleType::Media,
            RuleType::Supports,
            RuleType::Document,
            RuleType::Keyframes,
            RuleType::Page,
            RuleType::FontFace,
        ]
    );
    let import = sheet.get(1).unwrap();
    assert_eq!(import.href(), Some("base.css"));
    assert_eq!(import.media().unwrap().to_string(), "screen");
    let namespace = sheet.get(2).unwrap();
    assert_eq!(namespace.prefix(), Some("svg"));
    assert_eq!(namespace.href(), Some("http://www.w3.org/2000/svg"));
    let keyframes = sheet.get(7).unwrap();
    assert_eq!(keyframes.name(), Some("spin"));
    assert_eq!(keyframes.rules().count(), 2);
}

#[test]
fn test_vendor_prefixed_at_rules() {
    let sheet = parse("@-webkit-keyframes a { 50% { opacity: 1 } } @-moz-document url-prefix(\"http\") { }");
    assert_eq!(types(&sheet), [RuleType::Keyframes, RuleType::Document]);
}

#[test]
fn test_nested_rules_have_parents_and_owner() {
    let sheet = parse("@media screen { @supports (display: flex) { p { color: red } } }");
    let media = sheet.get(0).unwrap();
    assert_eq!(media.parent_rule().map(|rule| rule.id()), None);
    assert_eq!(media.owner(), Some(sheet.id()));
    let supports = media.rules().next().unwrap();
    assert_eq!(supports.parent_rule().map(|rule| rule.id()), Some(media.id()));
    let style = supports.rules().next().unwrap();
    assert_eq!(style.parent_rule().map(|rule| rule.id()), Some(supports.id()));
    assert_eq!(style.owner(), Some(sheet.id()));
}

#[test]
fn test_misplaced_prelude_rules_are_dropped() {
    let sheet = parse(
        "p { color: red } @import \"late.css\"; @charset \"UTF-8\"; @namespace url(x); div { color: blue }",
    );
    assert_eq!(types(&sheet), [RuleType::Style, RuleType::Style]);

    // A namespace before an import ends the import phase.
    let sheet = parse("@namespace url(x); @import \"a.css\";");
    assert_eq!(types(&sheet), [RuleType::Namespace]);

    // Prelude rules are top-level only.
    let sheet = parse("@media print { @import \"a.css\"; p { color: red } }");
    assert_eq!(sheet.get(0).unwrap().rules().count(), 1);
}

#[test]
fn test_invalid_rules_are_dropped_by_default() {
    let sheet = parse("@unknown foo; p:::x { color: red } @media (bogus-feature) { } a { color: red }");
    assert_eq!(types(&sheet), [RuleType::Style]);
    assert_eq!(sheet.get(0).unwrap().selector_text(), "a");
}

#[test]
fn test_unknown_rules_keep_source_text() {
    let sheet = CssParser::new(LENIENT).parse_stylesheet("@unknown foo  bar; a { color: red }");
    assert_eq!(types(&sheet), [RuleType::Unknown, RuleType::Style]);
    let unknown = sheet.get(0).unwrap();
    assert_eq!(unknown.source_text(), Some("@unknown foo  bar;"));
    assert_eq!(unknown.css_text(), "@unknown foo  bar;");
}

#[test]
fn test_unknown_rules_do_not_end_the_import_phase() {
    let sheet = CssParser::new(LENIENT).parse_stylesheet("@unknown; @import \"a.css\";");
    assert_eq!(types(&sheet), [RuleType::Unknown, RuleType::Import]);
}

#[test]
fn test_tolerated_selector_never_matches_but_round_trips() {
    let sheet = CssParser::new(LENIENT).parse_stylesheet("p:::x { color: red }");
    let rule = sheet.get(0).unwrap();
    assert_eq!(rule.rule_type(), RuleType::Style);
    assert!(rule.selector().unwrap().is_unknown());
    assert_eq!(rule.css_text(), "p:::x { color: red }");
}

#[test]
fn test_declaration_filtering() {
    let strict = parse("p { colour: red; width: blue; height: 10px }");
    let style = strict.get(0).unwrap().style().unwrap();
    assert_eq!(style.len(), 1);
    assert_eq!(style.get_property_value("height"), Some("10px"));

    let lenient = CssParser::new(LENIENT).parse_stylesheet("p { colour: red; width: blue }");
    let style = lenient.get(0).unwrap().style().unwrap();
    assert_eq!(style.len(), 2);
    assert!(!style.get("colour").unwrap().is_known());
}

#[test]
fn test_property_names_are_case_insensitive() {
    let sheet = parse("p { COLOR: red; --Custom: 1 }");
    let style = sheet.get(0).unwrap().style().unwrap();
    assert_eq!(style.get_property_value("color"), Some("red"));
    assert_eq!(style.get_property_value("--Custom"), Some("1"));
}

#[test]
fn test_single_construct_parses() {
    let parser = CssParser::default();
    assert!(parser.parse_media_list("screen and (min-width: 600px), print").is_some());
    assert!(parser.parse_media_list("screen and").is_none());
    assert_eq!(parser.parse_media_list("").map(|list| list.is_empty()), Some(true));
    assert!(parser.parse_medium("screen, print").is_none());
    assert!(parser.parse_condition("(display: flex) and (color: red)").is_some());
    assert!(parser.parse_condition("(display: flex) and (color: red) or (x: y)").is_none());
    assert_eq!(parser.parse_document_functions("url(a), domain(\"b\")").map(|f| f.len()), Some(2));
    assert!(parser.parse_document_functions("").is_none());
    assert_eq!(
        parser.parse_keyframe_selector("from, 50%").map(|keys| keys.to_string()),
        Some("0%, 50%".to_string())
    );
    assert_eq!(parser.parse_declarations("color: red; margin: 0").len(), 2);
}

#[test]
fn test_declaration_garbage_is_skipped() {
    let sheet = parse("p { color: red; ; : ; width 10px; @inner x; height: 1px } div { color: blue }");
    assert_eq!(types(&sheet), [RuleType::Style, RuleType::Style]);
    let style = sheet.get(0).unwrap().style().unwrap();
    assert_eq!(style.get_property_value("color"), Some("red"));
    assert_eq!(style.get_property_value("height"), Some("1px"));
    assert_eq!(style.len(), 2);
}
