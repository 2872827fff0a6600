//! Integration tests for asynchronous `@import` loading.

use std::collections::HashMap;
use std::sync::Mutex;

use futures::FutureExt;
use futures::future::BoxFuture;
use koala_common::net::{CancelHandle, CancelSignal, FetchError, ResourceLoader};
use koala_common::warning::was_warned;
use koala_css::{CssParser, RuleType, StyleSheet, ToCss};
use url::Url;

/// Serves stylesheets from memory and records every URL it is asked for.
#[derive(Default)]
struct MemoryLoader {
    files: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl MemoryLoader {
    fn new(files: &[(&str, &str)]) -> Self {
        Self {
            files: files
                .iter()
                .map(|(url, text)| ((*url).to_string(), (*text).to_string()))
                .collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ResourceLoader for MemoryLoader {
    fn fetch<'a>(
        &'a self,
        url: &'a Url,
        _cancel: &'a CancelSignal,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        async move {
            self.requests.lock().unwrap().push(url.to_string());
            self.files.get(url.as_str()).cloned().ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
        }
        .boxed()
    }
}

/// Cancels its own fetch and then never answers.
struct CancellingLoader {
    handle: CancelHandle,
}

impl ResourceLoader for CancellingLoader {
    fn fetch<'a>(
        &'a self,
        _url: &'a Url,
        _cancel: &'a CancelSignal,
    ) -> BoxFuture<'a, Result<String, FetchError>> {
        async move {
            self.handle.cancel();
            futures::future::pending().await
        }
        .boxed()
    }
}

fn href(text: &str) -> Option<Url> {
    Url::parse(text).ok()
}

async fn load(text: &str, at: &str, loader: &dyn ResourceLoader) -> StyleSheet {
    CssParser::default()
        .parse_stylesheet_async(text, href(at), Some(loader), &CancelSignal::never())
        .await
}

fn imported(sheet: &StyleSheet, index: usize) -> Option<&StyleSheet> {
    sheet.get(index).and_then(|rule| rule.style_sheet())
}

#[tokio::test]
async fn test_imports_load_recursively() {
    let loader = MemoryLoader::new(&[
        ("http://t.test/css/a.css", "@import \"sub/b.css\" print; a { color: red }"),
        ("http://t.test/css/sub/b.css", "b { color: blue }"),
    ]);
    let sheet = load("@import url(css/a.css); p { }", "http://t.test/main.css", &loader).await;

    let a = imported(&sheet, 0).expect("a.css should load");
    assert_eq!(a.href().map(Url::as_str), Some("http://t.test/css/a.css"));
    assert_eq!(a.len(), 2);
    // Nested imports resolve against the importing sheet's own URL.
    let b = imported(a, 0).expect("b.css should load");
    assert_eq!(b.href().map(Url::as_str), Some("http://t.test/css/sub/b.css"));
    assert_eq!(b.media().to_string(), "print");
    assert_eq!(b.css_text(), "b { color: blue }");
    assert_eq!(
        loader.requests(),
        ["http://t.test/css/a.css", "http://t.test/css/sub/b.css"]
    );
}

#[tokio::test]
async fn test_cycles_are_skipped_without_fetching() {
    let loader = MemoryLoader::new(&[
        ("http://t.test/a.css", "@import \"b.css\"; a { }"),
        (
            "http://t.test/b.css",
            "@import \"a.css\"; @import \"b.css\"; @import \"c.css\"; b { }",
        ),
        ("http://t.test/c.css", "@import \"a.css\"; c { }"),
    ]);
    let sheet = load("@import \"b.css\"; a { }", "http://t.test/a.css", &loader).await;

    let b = imported(&sheet, 0).expect("b.css should load");
    // The ancestor and the sheet itself are never requested.
    assert!(imported(b, 0).is_none());
    assert!(imported(b, 1).is_none());
    let c = imported(b, 2).expect("c.css should load");
    assert!(imported(c, 0).is_none());
    assert_eq!(loader.requests(), ["http://t.test/b.css", "http://t.test/c.css"]);
}

#[tokio::test]
async fn test_sibling_imports_of_one_sheet_both_load() {
    let loader = MemoryLoader::new(&[
        ("http://t.test/shared.css", "s { }"),
        ("http://t.test/other.css", "@import \"shared.css\"; o { }"),
    ]);
    let sheet = load(
        "@import \"shared.css\"; @import \"other.css\";",
        "http://t.test/main.css",
        &loader,
    )
    .await;
    assert!(imported(&sheet, 0).is_some());
    let other = imported(&sheet, 1).expect("other.css should load");
    // A diamond is not a cycle.
    assert!(imported(other, 0).is_some());
    assert_eq!(loader.requests().len(), 3);
}

#[tokio::test]
async fn test_failed_fetch_leaves_import_empty() {
    let loader = MemoryLoader::new(&[]);
    let sheet = load("@import \"missing.css\"; p { }", "http://t.test/main.css", &loader).await;
    assert_eq!(sheet.len(), 2);
    assert_eq!(sheet.get(0).unwrap().rule_type(), RuleType::Import);
    assert!(imported(&sheet, 0).is_none());
    assert!(was_warned(
        "css",
        "failed to load stylesheet http://t.test/missing.css: \
         request for http://t.test/missing.css returned status 404"
    ));
}

#[tokio::test]
async fn test_without_loader_imports_stay_unresolved() {
    let sheet = CssParser::default()
        .parse_stylesheet_async(
            "@import \"a.css\";",
            href("http://t.test/main.css"),
            None,
            &CancelSignal::never(),
        )
        .await;
    assert_eq!(sheet.len(), 1);
    assert!(imported(&sheet, 0).is_none());
}

#[tokio::test]
async fn test_relative_import_needs_a_base() {
    let loader = MemoryLoader::new(&[("http://t.test/a.css", "a { }")]);
    let mut sheet = CssParser::default().parse_stylesheet("@import \"a.css\"; @import \"http://t.test/a.css\";");
    sheet.load_imports(Some(&loader), None, &CancelSignal::never()).await;
    assert!(imported(&sheet, 0).is_none());
    assert!(imported(&sheet, 1).is_some());

    let base = Url::parse("http://t.test/index.html").unwrap();
    let id = sheet.get(0).unwrap().id();
    assert!(sheet.load_import(id, Some(&loader), Some(&base), &CancelSignal::never()).await);
    assert!(imported(&sheet, 0).is_some());
}

#[tokio::test]
async fn test_cancelled_before_start_makes_no_requests() {
    let loader = MemoryLoader::new(&[("http://t.test/a.css", "a { }")]);
    let (handle, signal) = CancelHandle::pair();
    handle.cancel();
    let sheet = CssParser::default()
        .parse_stylesheet_async("@import \"a.css\";", href("http://t.test/main.css"), Some(&loader), &signal)
        .await;
    assert!(imported(&sheet, 0).is_none());
    assert!(loader.requests().is_empty());
}

#[tokio::test]
async fn test_cancel_during_fetch_abandons_it() {
    let (handle, signal) = CancelHandle::pair();
    let loader = CancellingLoader { handle };
    let sheet = CssParser::default()
        .parse_stylesheet_async(
            "@import \"slow.css\"; p { }",
            href("http://t.test/main.css"),
            Some(&loader),
            &signal,
        )
        .await;
    assert!(signal.is_cancelled());
    assert!(imported(&sheet, 0).is_none());
    assert_eq!(sheet.len(), 2);
}

#[tokio::test]
async fn test_imported_rules_take_part_in_matching() {
    use koala_css::RenderDevice;
    use koala_dom::{DomTree, NodeId};

    let loader = MemoryLoader::new(&[
        ("http://t.test/screen.css", "p { color: red }"),
        ("http://t.test/print.css", "p { color: black }"),
    ]);
    let sheet = load(
        "@import \"screen.css\" screen; @import \"print.css\" print; p { margin: 0 }",
        "http://t.test/main.css",
        &loader,
    )
    .await;

    let mut tree = DomTree::new();
    let p = tree.alloc_element("p", &[]);
    tree.append_child(NodeId::ROOT, p);
    let element = tree.element(p).unwrap();
    let matched = sheet
        .matching_style_rules(&element, &RenderDevice::default(), None)
        .unwrap();
    let texts: Vec<String> = matched.iter().map(|entry| entry.rule.css_text()).collect();
    assert_eq!(texts, ["p { color: red }", "p { margin: 0 }"]);
}
