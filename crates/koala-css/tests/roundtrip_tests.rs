//! Serialization tests: compact output re-parses to the same rules, and the
//! pretty formatter lays rules out one declaration per line.

use koala_css::{CssParser, PrettyFormatter, RuleType, StyleSheet, ToCss};

fn parse(text: &str) -> StyleSheet {
    CssParser::default().parse_stylesheet(text)
}

/// Parse `text`, serialize it, parse that, and check both passes agree.
fn assert_stable(text: &str) -> String {
    let first = parse(text);
    assert!(!first.is_empty(), "`{text}` should parse");
    let serialized = first.css_text();
    let second = parse(&serialized);
    let types = |sheet: &StyleSheet| sheet.rules().map(|rule| rule.rule_type()).collect::<Vec<_>>();
    assert_eq!(types(&first), types(&second), "rule types changed for `{text}`");
    assert_eq!(second.css_text(), serialized, "serialization is not stable for `{text}`");
    serialized
}

#[test]
fn test_every_rule_type_round_trips() {
    let cases = [
        ("@charset \"UTF-8\";", "@charset \"UTF-8\";"),
        ("@import 'a.css' screen, print;", "@import url(\"a.css\") screen, print;"),
        ("@import url(a.css);", "@import url(\"a.css\");"),
        ("@namespace url(http://a.test/ns);", "@namespace url(\"http://a.test/ns\");"),
        ("@namespace svg 'http://www.w3.org/2000/svg';", "@namespace svg url(\"http://www.w3.org/2000/svg\");"),
        ("p   >  a.b:hover{color:red;margin:0 auto!important}", "p > a.b:hover { color: red; margin: 0 auto !important }"),
        ("@media only screen and (min-width:600px){p{color:red}}", "@media only screen and (min-width: 600px) { p { color: red } }"),
        ("@supports (display:flex) and (not (display:old)){}", "@supports (display: flex) and (not (display: old)) { }"),
        ("@document url-prefix('http://a.test/'), domain('a.test'){a{color:blue}}", "@document url-prefix(\"http://a.test/\"), domain(\"a.test\") { a { color: blue } }"),
        ("@keyframes spin{from{opacity:0}TO{opacity:1}}", "@keyframes spin { 0% { opacity: 0 } 100% { opacity: 1 } }"),
        ("@page :first{margin:1in}", "@page :first { margin: 1in }"),
        ("@page{margin:1in}", "@page { margin: 1in }"),
        ("@font-face{font-family:Serif}", "@font-face { font-family: Serif }"),
    ];
    for (input, expected) in cases {
        assert_eq!(assert_stable(input), expected, "input `{input}`");
    }
}

#[test]
fn test_whole_sheet_round_trips() {
    let text = "@charset \"UTF-8\";
        @import \"base.css\";
        ul li:nth-child(2n+1) , ol > li:first-child { color: red }
        @media print { @supports (display: grid) { div { display: grid } } }";
    let serialized = assert_stable(text);
    assert_eq!(serialized.lines().count(), 4);
}

#[test]
fn test_unknown_rules_round_trip_verbatim() {
    let options = koala_css::CssParserOptions {
        include_unknown_rules: true,
        ..koala_css::CssParserOptions::default()
    };
    let parser = CssParser::new(options);
    let sheet = parser.parse_stylesheet("@custom-thing  a  b { x }");
    assert_eq!(sheet.get(0).map(|rule| rule.rule_type()), Some(RuleType::Unknown));
    let again = parser.parse_stylesheet(&sheet.css_text());
    assert_eq!(again.css_text(), "@custom-thing  a  b { x }");
}

#[test]
fn test_pretty_formatter_layout() {
    let sheet = parse("p{color:red;margin:0} @media print{a{color:black}} @import 'x.css';");
    let pretty = sheet.to_css(&PrettyFormatter::default());
    assert_eq!(
        pretty,
        "p {\n\tcolor: red;\n\tmargin: 0;\n}\n\n@media print {\n\ta {\n\t\tcolor: black;\n\t}\n}"
    );
}

#[test]
fn test_pretty_formatter_custom_indent() {
    let formatter = PrettyFormatter {
        indentation: "  ".to_string(),
        newline: "\n".to_string(),
    };
    let sheet = parse("@keyframes k { 50% { opacity: 0.5 } } @font-face { }");
    assert_eq!(
        sheet.to_css(&formatter),
        "@keyframes k {\n  50% {\n    opacity: 0.5;\n  }\n}\n\n@font-face { }"
    );
}

#[test]
fn test_edited_declarations_round_trip() {
    let mut sheet = parse("p { color: red }");
    let p = sheet.get(0).unwrap().id();
    let style = sheet.style_mut(p).unwrap();
    assert!(!style.set_property("--x", "a; color: blue", false));
    assert!(!style.set_property("width", "var(--w); display: none", false));
    assert!(!style.set_property("--x", "a } q { color: blue", false));
    assert!(style.set_property("--x", "a [b; c]", false));
    assert!(style.set_property("width", "var(--w)", true));

    let serialized = sheet.css_text();
    assert_eq!(serialized, "p { color: red; --x: a [b; c]; width: var(--w) !important }");
    assert_eq!(assert_stable(&serialized), serialized);
}
