//! Integration tests for the rule object model: the node contract, CSSOM list
//! operations, and in-place mutation.

use koala_css::{Container, CssError, CssNode, CssParser, RuleId, RuleType, StyleSheet, ToCss};

fn parse(text: &str) -> StyleSheet {
    CssParser::default().parse_stylesheet(text)
}

fn id_at(sheet: &StyleSheet, index: usize) -> RuleId {
    sheet.get(index).unwrap().id()
}

fn texts(sheet: &StyleSheet) -> Vec<String> {
    sheet.rules().map(|rule| rule.css_text()).collect()
}

// ---------------------------------------------------------------------------
// Node contract
// ---------------------------------------------------------------------------

#[test]
fn test_append_sets_parent_and_owner() {
    let mut sheet = StyleSheet::default();
    let rule = sheet.create_rule(RuleType::Style);
    assert_eq!(sheet.rule(rule).unwrap().owner(), None);
    assert_eq!(sheet.rule(rule).unwrap().parent(), None);

    sheet.append_child(Container::Sheet, CssNode::Rule(rule)).unwrap();
    let view = sheet.rule(rule).unwrap();
    assert_eq!(view.parent(), Some(Container::Sheet));
    assert_eq!(view.owner(), Some(sheet.id()));
    assert_eq!(view.css_text(), "* { }");
}

#[test]
fn test_attach_propagates_owner_to_descendants() {
    let mut sheet = StyleSheet::default();
    let media = sheet.create_rule(RuleType::Media);
    let style = sheet.create_rule(RuleType::Style);
    sheet.append_child(Container::Rule(media), CssNode::Rule(style)).unwrap();
    assert_eq!(sheet.rule(style).unwrap().owner(), None);

    sheet.append_child(Container::Sheet, CssNode::Rule(media)).unwrap();
    assert_eq!(sheet.rule(style).unwrap().owner(), Some(sheet.id()));

    let removed = sheet.remove_child(Container::Sheet, &CssNode::Rule(media)).unwrap();
    assert_eq!(removed, CssNode::Rule(media));
    assert_eq!(sheet.rule(media).unwrap().parent(), None);
    assert_eq!(sheet.rule(style).unwrap().owner(), None);
    // The nested rule stays attached to its own parent.
    assert_eq!(sheet.rule(style).unwrap().parent(), Some(Container::Rule(media)));
}

#[test]
fn test_attaching_an_attached_rule_is_in_use() {
    let mut sheet = parse("p { color: red } @media print { }");
    let style = id_at(&sheet, 0);
    let media = id_at(&sheet, 1);
    assert_eq!(
        sheet.append_child(Container::Rule(media), CssNode::Rule(style)),
        Err(CssError::InUse)
    );
    let _ = sheet.remove_child(Container::Sheet, &CssNode::Rule(style)).unwrap();
    sheet.append_child(Container::Rule(media), CssNode::Rule(style)).unwrap();
    assert_eq!(sheet.len(), 1);
    assert_eq!(texts(&sheet), ["@media print { p { color: red } }"]);
}

#[test]
fn test_rule_cannot_contain_itself() {
    let mut sheet = StyleSheet::default();
    let outer = sheet.create_rule(RuleType::Media);
    let inner = sheet.create_rule(RuleType::Media);
    sheet.append_child(Container::Rule(outer), CssNode::Rule(inner)).unwrap();
    assert_eq!(
        sheet.append_child(Container::Rule(outer), CssNode::Rule(outer)),
        Err(CssError::HierarchyRequest)
    );
    assert_eq!(
        sheet.append_child(Container::Rule(inner), CssNode::Rule(outer)),
        Err(CssError::HierarchyRequest)
    );
}

#[test]
fn test_insert_positions() {
    let mut sheet = parse("a { } c { }");
    let b = sheet.create_rule(RuleType::Style);
    sheet.set_selector_text(b, "b").unwrap();
    let c = CssNode::Rule(id_at(&sheet, 1));
    sheet.insert_before(Container::Sheet, CssNode::Rule(b), Some(&c)).unwrap();
    assert_eq!(texts(&sheet), ["a { }", "b { }", "c { }"]);

    let d = sheet.create_rule(RuleType::Style);
    sheet.insert_before(Container::Sheet, CssNode::Rule(d), None).unwrap();
    assert_eq!(sheet.len(), 4);

    let e = sheet.create_rule(RuleType::Style);
    assert_eq!(
        sheet.insert_child(Container::Sheet, 9, CssNode::Rule(e)),
        Err(CssError::IndexSize { index: 9, len: 4 })
    );
    let stray = CssNode::Rule(e);
    assert_eq!(
        sheet.insert_before(Container::Sheet, CssNode::Rule(e), Some(&stray)),
        Err(CssError::NotFound)
    );
}

#[test]
fn test_replace_child() {
    let mut sheet = parse("a { } b { }");
    let a = id_at(&sheet, 0);
    let z = sheet.create_rule(RuleType::Style);
    sheet.set_selector_text(z, "z").unwrap();
    let old = sheet
        .replace_child(Container::Sheet, &CssNode::Rule(a), CssNode::Rule(z))
        .unwrap();
    assert_eq!(old, CssNode::Rule(a));
    assert_eq!(texts(&sheet), ["z { }", "b { }"]);
    assert_eq!(sheet.rule(a).unwrap().parent(), None);
    assert_eq!(sheet.rule(z).unwrap().owner(), Some(sheet.id()));
}

#[test]
fn test_replace_or_remove_absent_child_is_not_found() {
    let mut sheet = parse("a { }");
    let detached = sheet.create_rule(RuleType::Style);
    let other = sheet.create_rule(RuleType::Style);
    assert_eq!(
        sheet.replace_child(Container::Sheet, &CssNode::Rule(detached), CssNode::Rule(other)),
        Err(CssError::NotFound)
    );
    assert_eq!(
        sheet.remove_child(Container::Sheet, &CssNode::Rule(detached)),
        Err(CssError::NotFound)
    );
    assert_eq!(sheet.len(), 1);
    assert_eq!(sheet.rule(other).unwrap().parent(), None);
}

#[test]
fn test_clear_detaches_everything() {
    let mut sheet = parse("a { } @media print { b { } }");
    let media = id_at(&sheet, 1);
    sheet.clear(Container::Sheet).unwrap();
    assert!(sheet.is_empty());
    assert_eq!(sheet.rule(media).unwrap().owner(), None);
    assert_eq!(sheet.clear(Container::Rule(RuleId(999))), Err(CssError::NotFound));
}

// ---------------------------------------------------------------------------
// insertRule / deleteRule
// ---------------------------------------------------------------------------

#[test]
fn test_insert_rule() {
    let mut sheet = parse("a { }");
    assert_eq!(sheet.insert_rule("b { color: red }", 1), Ok(1));
    assert_eq!(sheet.insert_rule("@media print { c { } }", 0), Ok(0));
    assert_eq!(texts(&sheet), ["@media print { c { } }", "a { }", "b { color: red }"]);
    assert_eq!(sheet.get(2).unwrap().owner(), Some(sheet.id()));
}

#[test]
fn test_insert_rule_errors() {
    let mut sheet = parse("@import \"a.css\"; p { }");
    assert!(matches!(sheet.insert_rule("p { }", 5), Err(CssError::IndexSize { index: 5, len: 2 })));
    assert!(matches!(sheet.insert_rule("p { } q { }", 0), Err(CssError::Syntax(_))));
    assert!(matches!(sheet.insert_rule("", 0), Err(CssError::Syntax(_))));
    // Nothing may precede an import except charset and other imports.
    assert_eq!(sheet.insert_rule("p { }", 0), Err(CssError::HierarchyRequest));
    assert_eq!(sheet.insert_rule("@import \"b.css\";", 2), Err(CssError::HierarchyRequest));
    assert_eq!(sheet.insert_rule("@charset \"UTF-8\";", 1), Err(CssError::HierarchyRequest));
    assert_eq!(sheet.insert_rule("@import \"b.css\";", 1), Ok(1));
    assert_eq!(sheet.insert_rule("@charset \"UTF-8\";", 0), Ok(0));
    assert_eq!(sheet.len(), 4);
}

#[test]
fn test_insert_namespace_rule_after_style_rules_is_invalid_state() {
    let mut sheet = parse("@import \"a.css\"; p { }");
    assert!(matches!(
        sheet.insert_rule("@namespace url(x);", 1),
        Err(CssError::InvalidState(_))
    ));
    let mut sheet = parse("@import \"a.css\";");
    assert_eq!(sheet.insert_rule("@namespace url(x);", 1), Ok(1));
}

#[test]
fn test_delete_rule() {
    let mut sheet = parse("a { } b { }");
    let a = id_at(&sheet, 0);
    sheet.delete_rule(0).unwrap();
    assert_eq!(texts(&sheet), ["b { }"]);
    assert_eq!(sheet.rule(a).unwrap().owner(), None);
    assert_eq!(sheet.delete_rule(1), Err(CssError::IndexSize { index: 1, len: 1 }));

    let mut sheet = parse("@namespace url(x); p { }");
    assert!(matches!(sheet.delete_rule(0), Err(CssError::InvalidState(_))));
    sheet.delete_rule(1).unwrap();
    sheet.delete_rule(0).unwrap();
    assert!(sheet.is_empty());
}

#[test]
fn test_delete_rule_skips_leaf_children() {
    // The media list is a child of the media rule but not one of its rules.
    let mut sheet = parse("@media print { a { } b { } c { } }");
    let media = id_at(&sheet, 0);
    let b = sheet.rule(media).unwrap().rules().nth(1).unwrap().id();
    sheet.remove_at(media, 1).unwrap();
    assert_eq!(sheet.rule(media).unwrap().css_text(), "@media print { a { } c { } }");
    assert_eq!(sheet.rule(b).unwrap().parent(), None);
    assert_eq!(sheet.remove_at(media, 2), Err(CssError::IndexSize { index: 2, len: 2 }));
}

// ---------------------------------------------------------------------------
// cssText setter
// ---------------------------------------------------------------------------

#[test]
fn test_set_css_text_replaces_in_place() {
    let mut sheet = parse("a { } @media print { p { color: red } }");
    let media = id_at(&sheet, 1);
    sheet
        .set_css_text(media, "@media screen { div { color: blue } span { } }")
        .unwrap();
    // Identity, position, and owner are preserved.
    assert_eq!(id_at(&sheet, 1), media);
    let rule = sheet.rule(media).unwrap();
    assert_eq!(rule.owner(), Some(sheet.id()));
    assert_eq!(rule.condition_text(), "screen");
    assert_eq!(rule.rules().count(), 2);
    for child in rule.rules() {
        assert_eq!(child.parent_rule().map(|parent| parent.id()), Some(media));
        assert_eq!(child.owner(), Some(sheet.id()));
    }
}

#[test]
fn test_set_css_text_errors_leave_rule_untouched() {
    let mut sheet = parse("a { color: red }");
    let a = id_at(&sheet, 0);
    assert!(matches!(sheet.set_css_text(a, "@@@"), Err(CssError::Syntax(_))));
    assert_eq!(
        sheet.set_css_text(a, "@media print { }"),
        Err(CssError::InvalidModification {
            expected: RuleType::Style,
            found: RuleType::Media,
        })
    );
    assert_eq!(texts(&sheet), ["a { color: red }"]);
}

#[test]
fn test_set_css_text_on_keyframe() {
    let mut sheet = parse("@keyframes k { from { opacity: 0 } }");
    let keyframes = id_at(&sheet, 0);
    let from = sheet.rule(keyframes).unwrap().rules().next().unwrap().id();
    sheet.set_css_text(from, "50% { opacity: 0.5 }").unwrap();
    assert_eq!(sheet.rule(from).unwrap().css_text(), "50% { opacity: 0.5 }");
}

// ---------------------------------------------------------------------------
// Rule-specific mutators
// ---------------------------------------------------------------------------

#[test]
fn test_selector_and_style_mutation() {
    let mut sheet = parse("a { color: red }");
    let a = id_at(&sheet, 0);
    sheet.set_selector_text(a, "ul > li").unwrap();
    assert!(matches!(sheet.set_selector_text(a, "ul >"), Err(CssError::Syntax(_))));
    let style = sheet.style_mut(a).unwrap();
    assert!(style.set_property("margin", "0 auto", true));
    assert!(!style.set_property("margin", "sideways", false));
    assert_eq!(style.remove_property("color"), Some("red".to_string()));
    assert_eq!(sheet.get(0).unwrap().css_text(), "ul > li { margin: 0 auto !important }");

    let media = sheet.create_rule(RuleType::Media);
    assert!(matches!(sheet.set_selector_text(media, "p"), Err(CssError::InvalidState(_))));
}

#[test]
fn test_tolerated_selector_text_stays_inside_its_rule() {
    let parser = CssParser::new(koala_css::CssParserOptions {
        tolerate_invalid_selectors: true,
        ..koala_css::CssParserOptions::default()
    });
    let mut sheet = parser.parse_stylesheet("p { color: red }");
    let p = id_at(&sheet, 0);
    for text in ["a { } b", "a } b", "a; b", "@media print", "a <!-- b", "a[x=\"y", "a (b"] {
        assert!(
            matches!(sheet.set_selector_text(p, text), Err(CssError::Syntax(_))),
            "{text}"
        );
    }
    assert_eq!(texts(&sheet), ["p { color: red }"]);

    sheet.set_selector_text(p, "a ! b").unwrap();
    assert!(matches!(sheet.get(0).unwrap().selector(), Some(koala_css::Selector::Unknown(_))));
    let serialized = sheet.css_text();
    assert_eq!(serialized, "a ! b { color: red }");
    let reparsed = parser.parse_stylesheet(&serialized);
    assert_eq!(texts(&reparsed), ["a ! b { color: red }"]);
}

#[test]
fn test_condition_text() {
    let mut sheet = parse(
        "@media print { } @supports (display: flex) { } @document url-prefix(\"http\") { } p { }",
    );
    let (media, supports, document, style) =
        (id_at(&sheet, 0), id_at(&sheet, 1), id_at(&sheet, 2), id_at(&sheet, 3));

    sheet.set_condition_text(media, "screen and (min-width: 600px)").unwrap();
    assert_eq!(sheet.rule(media).unwrap().condition_text(), "screen and (min-width: 600px)");
    assert!(matches!(sheet.set_condition_text(media, "screen and"), Err(CssError::Syntax(_))));

    sheet.set_condition_text(supports, "not (display: flex)").unwrap();
    assert_eq!(sheet.rule(supports).unwrap().condition_text(), "not (display: flex)");
    assert!(matches!(sheet.set_condition_text(supports, ""), Err(CssError::Syntax(_))));

    sheet
        .set_condition_text(document, "domain(\"a.com\"), regexp(\"x\")")
        .unwrap();
    assert_eq!(
        sheet.rule(document).unwrap().condition_text(),
        "domain(\"a.com\"), regexp(\"x\")"
    );

    assert!(matches!(sheet.set_condition_text(style, "print"), Err(CssError::InvalidState(_))));
}

#[test]
fn test_namespace_setters_check_preceding_siblings() {
    let mut sheet = parse("@import \"a.css\"; @namespace url(x);");
    let namespace = id_at(&sheet, 1);
    sheet.set_namespace_prefix(namespace, "svg").unwrap();
    sheet.set_namespace_uri(namespace, "http://www.w3.org/2000/svg").unwrap();
    assert_eq!(
        sheet.get(1).unwrap().css_text(),
        "@namespace svg url(\"http://www.w3.org/2000/svg\");"
    );
    sheet.set_namespace_prefix(namespace, "").unwrap();
    assert_eq!(sheet.get(1).unwrap().prefix(), Some(""));

    // Move a style rule in front of the namespace rule behind the parser's back.
    let style = sheet.create_rule(RuleType::Style);
    sheet.insert_child(Container::Sheet, 0, CssNode::Rule(style)).unwrap();
    assert!(matches!(
        sheet.set_namespace_prefix(namespace, "svg"),
        Err(CssError::InvalidState(_))
    ));
    assert!(matches!(
        sheet.set_namespace_uri(namespace, "y"),
        Err(CssError::InvalidState(_))
    ));
}

#[test]
fn test_grouping_rule_operations() {
    let mut sheet = parse("@media print { a { } }");
    let media = id_at(&sheet, 0);
    assert_eq!(sheet.insert(media, "b { }", 1), Ok(1));
    assert_eq!(sheet.insert(media, "@import \"x.css\";", 0), Err(CssError::HierarchyRequest));
    let added = sheet.add_new_rule(media, RuleType::Supports).unwrap();
    assert_eq!(sheet.rule(added).unwrap().parent_rule().map(|rule| rule.id()), Some(media));
    assert_eq!(sheet.add_new_rule(media, RuleType::Charset), Err(CssError::HierarchyRequest));
    assert_eq!(sheet.rule(media).unwrap().rules().count(), 3);
    sheet.remove_at(media, 0).unwrap();
    assert_eq!(
        sheet.rule(media).unwrap().css_text(),
        "@media print { b { } @supports { } }"
    );
    assert_eq!(sheet.remove_at(media, 7), Err(CssError::IndexSize { index: 7, len: 2 }));

    let style = sheet.create_rule(RuleType::Style);
    assert!(matches!(sheet.insert(style, "a { }", 0), Err(CssError::InvalidState(_))));
}

#[test]
fn test_keyframes_operations() {
    let mut sheet = parse("@keyframes fade { from { opacity: 0 } 50% { opacity: 0.3 } }");
    let keyframes = id_at(&sheet, 0);
    let added = sheet.append_keyframe(keyframes, "to { opacity: 1 }").unwrap();
    assert_eq!(sheet.find_keyframe(keyframes, "100%"), Some(added));
    assert_eq!(sheet.find_keyframe(keyframes, "TO"), Some(added));
    assert!(sheet.find_keyframe(keyframes, "from").is_some());
    assert!(matches!(
        sheet.append_keyframe(keyframes, "p { color: red }"),
        Err(CssError::Syntax(_))
    ));

    assert_eq!(sheet.delete_keyframe(keyframes, "0%"), Ok(true));
    assert_eq!(sheet.delete_keyframe(keyframes, "0%"), Ok(false));
    sheet.set_keyframes_name(keyframes, "pulse").unwrap();
    assert_eq!(
        sheet.rule(keyframes).unwrap().css_text(),
        "@keyframes pulse { 50% { opacity: 0.3 } 100% { opacity: 1 } }"
    );

    // Only keyframes go inside @keyframes.
    assert_eq!(sheet.insert(keyframes, "p { }", 0), Err(CssError::Syntax("p { }".to_string())));
    assert_eq!(sheet.insert(keyframes, "75% { opacity: 0.9 }", 2), Ok(2));

    let style = sheet.create_rule(RuleType::Style);
    assert!(matches!(sheet.append_keyframe(style, "to { }"), Err(CssError::InvalidState(_))));
}

#[test]
fn test_find_keyframe_returns_last_match() {
    let sheet = parse("@keyframes k { 50% { opacity: 0 } 50% { opacity: 1 } }");
    let keyframes = sheet.get(0).unwrap();
    let last = keyframes.rules().last().unwrap().id();
    assert_eq!(sheet.find_keyframe(keyframes.id(), "50%"), Some(last));
}

#[test]
fn test_find_keyframe_compares_whole_key_list() {
    let mut sheet = parse("@keyframes k { 0%, 50% { opacity: 0 } 100% { opacity: 1 } }");
    let keyframes = id_at(&sheet, 0);
    let first = sheet.rule(keyframes).unwrap().rules().next().unwrap().id();
    assert_eq!(sheet.find_keyframe(keyframes, "0%, 50%"), Some(first));
    assert_eq!(sheet.find_keyframe(keyframes, "FROM,50%"), Some(first));
    assert_eq!(sheet.find_keyframe(keyframes, "50%"), None);
    assert_eq!(sheet.find_keyframe(keyframes, "50%, 0%"), None);
    assert_eq!(sheet.find_keyframe(keyframes, "half"), None);

    // A partial key leaves the multi-key keyframe alone.
    assert_eq!(sheet.delete_keyframe(keyframes, "50%"), Ok(false));
    assert_eq!(sheet.rule(keyframes).unwrap().rules().count(), 2);
    assert_eq!(sheet.delete_keyframe(keyframes, "from, 50%"), Ok(true));
    assert_eq!(
        sheet.rule(keyframes).unwrap().css_text(),
        "@keyframes k { 100% { opacity: 1 } }"
    );
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

#[test]
fn test_matching_style_rules_orders_by_specificity_then_source() {
    use koala_css::RenderDevice;
    use koala_dom::{DomTree, NodeId};

    let mut tree = DomTree::new();
    let html = tree.alloc_element("html", &[]);
    let p = tree.alloc_element("p", &[("id", "lead"), ("class", "intro")]);
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, p);
    let element = tree.element(p).unwrap();

    let sheet = parse(
        "#lead { color: red }
         p { color: blue }
         .intro { color: green }
         @media print { p { color: black } }
         @media screen { html > p { margin: 0 } }
         @supports (display: flex) { * { margin: 1px } }
         @supports (display: bogus) { p { margin: 2px } }
         @document domain(\"example.com\") { p { margin: 3px } }
         p { width: 1px }
         div { color: white }",
    );
    let device = RenderDevice::default();
    let matched = sheet.matching_style_rules(&element, &device, None).unwrap();
    let selectors: Vec<String> = matched.iter().map(|entry| entry.rule.selector_text()).collect();
    assert_eq!(selectors, ["*", "p", "p", "html > p", ".intro", "#lead"]);
    assert!(matched.windows(2).all(|pair| pair[0].specificity <= pair[1].specificity));

    // With a matching document URL the @document block joins in.
    let url = url::Url::parse("https://www.example.com/page").unwrap();
    let matched = sheet.matching_style_rules(&element, &device, Some(&url)).unwrap();
    assert_eq!(matched.len(), 7);

    let print = RenderDevice {
        category: koala_css::media::DeviceCategory::Print,
        ..RenderDevice::default()
    };
    let matched = sheet.matching_style_rules(&element, &print, None).unwrap();
    let texts: Vec<String> = matched.iter().map(|entry| entry.rule.css_text()).collect();
    assert!(texts.contains(&"p { color: black }".to_string()));
    assert!(!texts.contains(&"html > p { margin: 0 }".to_string()));
}
