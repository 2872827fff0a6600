//! Koala CSS CLI - stylesheet parsing and debugging tool
//!
//! Parses a stylesheet from a file, a URL, or the command line, optionally
//! loads its `@import`s, and prints it back compact, pretty, or as JSON.
//! With `--check`, every conditional rule is evaluated against a device.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::Parser;
use koala_common::net::{CancelSignal, HttpLoader, ResourceLoader};
use koala_common::url::parse_absolute;
use koala_common::warning::clear_warnings;
use koala_css::media::DeviceCategory;
use koala_css::{CssParser, CssParserOptions, PrettyFormatter, RenderDevice, RuleRef, RuleType, StyleSheet, ToCss};
use owo_colors::OwoColorize;
use serde_json::{Value, json};
use url::Url;

/// Koala CSS - parse, serialize, and inspect stylesheets
#[derive(Parser, Debug)]
#[command(name = "koala-css")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Normalize a stylesheet
    koala-css style.css

    # Pretty-print, following @import rules
    koala-css --pretty --load-imports https://example.com/main.css

    # Which conditional rules apply on a 375px wide phone?
    koala-css --check --width 375 --height 667 style.css

    # Parse inline CSS, keeping rules the engine does not understand
    koala-css --css '@custom x; p { colour: red }' --tolerant --json
"#)]
struct Cli {
    /// Path or URL of the stylesheet
    #[arg(value_name = "FILE|URL")]
    path: Option<String>,

    /// Parse CSS text directly instead of a file or URL
    #[arg(long, value_name = "CSS")]
    css: Option<String>,

    /// Indented, multi-line output
    #[arg(short, long)]
    pretty: bool,

    /// Output the rule tree as JSON
    #[arg(short, long, conflicts_with = "pretty")]
    json: bool,

    /// Keep unknown rules, unknown properties, invalid values, and invalid selectors
    #[arg(short, long)]
    tolerant: bool,

    /// Fetch and parse `@import`ed stylesheets
    #[arg(short, long)]
    load_imports: bool,

    /// Evaluate `@media`, `@supports`, and `@document` rules
    #[arg(short, long)]
    check: bool,

    /// Viewport width in CSS pixels for --check
    #[arg(long, default_value = "1024")]
    width: f64,

    /// Viewport height in CSS pixels for --check
    #[arg(long, default_value = "768")]
    height: f64,

    /// Evaluate media queries as a printer
    #[arg(long)]
    print: bool,

    /// Document URL that `@document` rules are matched against
    #[arg(long, value_name = "URL")]
    document_url: Option<Url>,

    /// Show debug logging (repeat for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn parser_options(&self) -> CssParserOptions {
        if self.tolerant {
            CssParserOptions {
                tolerate_invalid_selectors: true,
                include_unknown_rules: true,
                include_unknown_declarations: true,
                include_invalid_values: true,
            }
        } else {
            CssParserOptions::default()
        }
    }

    fn device(&self) -> RenderDevice {
        let mut device = RenderDevice::with_size(self.width, self.height);
        if self.print {
            device.category = DeviceCategory::Print;
        }
        device
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    clear_warnings();

    let loader = HttpLoader::new().context("failed to create HTTP client")?;
    let (text, href) = read_source(&cli, &loader).await?;

    let parser = CssParser::new(cli.parser_options());
    let imports: Option<&dyn ResourceLoader> = cli.load_imports.then_some(&loader);
    let sheet = parser
        .parse_stylesheet_async(&text, href, imports, &CancelSignal::never())
        .await;
    log::debug!(target: "cli", "parsed {} top-level rules", sheet.len());

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&sheet_to_json(&sheet))?);
    } else if cli.pretty {
        println!("{}", sheet.to_css(&PrettyFormatter::default()));
    } else {
        println!("{}", sheet.css_text());
    }

    if cli.check {
        let device = cli.device();
        println!();
        println!("{}", "=== Conditional rules ===".bold());
        print_conditions(&sheet, &device, cli.document_url.as_ref(), 0);
    }
    Ok(())
}

/// Read the stylesheet text and the URL it lives at.
async fn read_source(cli: &Cli, loader: &HttpLoader) -> Result<(String, Option<Url>)> {
    if let Some(css) = &cli.css {
        return Ok((css.clone(), None));
    }
    let Some(path) = &cli.path else {
        bail!("no input: pass a FILE|URL or --css");
    };
    if let Some(url) = parse_absolute(path).filter(|url| url.scheme() != "file") {
        let text = loader
            .fetch(&url, &CancelSignal::never())
            .await
            .with_context(|| format!("failed to fetch {url}"))?;
        return Ok((text, Some(url)));
    }
    let text = fs::read_to_string(path).with_context(|| format!("failed to read '{path}'"))?;
    let href = fs::canonicalize(Path::new(path))
        .ok()
        .and_then(|absolute| Url::from_file_path(absolute).ok());
    Ok((text, href))
}

fn print_conditions(sheet: &StyleSheet, device: &RenderDevice, url: Option<&Url>, depth: usize) {
    for rule in sheet.rules() {
        print_condition(&rule, device, url, depth);
    }
}

fn print_condition(rule: &RuleRef<'_>, device: &RenderDevice, url: Option<&Url>, depth: usize) {
    let indent = "  ".repeat(depth);
    match rule.rule_type() {
        RuleType::Media | RuleType::Supports | RuleType::Document => {
            let head = format!("@{} {}", at_keyword(rule.rule_type()), rule.condition_text());
            match rule.is_valid(device, url) {
                Ok(true) => println!("{indent}{} {head}", "applies".green()),
                Ok(false) => println!("{indent}{} {head}", "skipped".yellow()),
                Err(error) => println!("{indent}{} {head}: {error}", "error".red()),
            }
            for child in rule.rules() {
                print_condition(&child, device, url, depth + 1);
            }
        }
        RuleType::Import => {
            let href = rule.href().unwrap_or_default();
            match rule.style_sheet() {
                Some(child) => {
                    println!("{indent}{} @import {href}", "loaded".cyan());
                    print_conditions(child, device, url, depth + 1);
                }
                None => println!("{indent}{} @import {href}", "not loaded".dimmed()),
            }
        }
        _ => {}
    }
}

const fn at_keyword(rule_type: RuleType) -> &'static str {
    match rule_type {
        RuleType::Media => "media",
        RuleType::Supports => "supports",
        _ => "document",
    }
}

fn sheet_to_json(sheet: &StyleSheet) -> Value {
    json!({
        "href": sheet.href().map(Url::as_str),
        "media": sheet.media().to_string(),
        "rules": sheet.rules().map(|rule| rule_to_json(&rule)).collect::<Vec<_>>(),
    })
}

fn rule_to_json(rule: &RuleRef<'_>) -> Value {
    let mut obj = serde_json::Map::new();
    let _ = obj.insert("type".to_string(), json!(rule.rule_type()));
    let _ = obj.insert("typeCode".to_string(), json!(rule.rule_type().code()));
    let _ = obj.insert("cssText".to_string(), json!(rule.css_text()));

    if let Some(selector) = rule.selector() {
        let _ = obj.insert("selectorText".to_string(), json!(selector.to_string()));
        let specificity = selector.specificity();
        let _ = obj.insert(
            "specificity".to_string(),
            json!([specificity.0, specificity.1, specificity.2]),
        );
    }
    if let Some(style) = rule.style() {
        let declarations: Vec<Value> = style
            .iter()
            .map(|property| {
                json!({
                    "name": property.name,
                    "value": property.value.as_str(),
                    "important": property.important,
                    "known": property.is_known(),
                })
            })
            .collect();
        let _ = obj.insert("declarations".to_string(), Value::Array(declarations));
    }
    if matches!(
        rule.rule_type(),
        RuleType::Media | RuleType::Supports | RuleType::Document
    ) {
        let _ = obj.insert("conditionText".to_string(), json!(rule.condition_text()));
    }
    if let Some(href) = rule.href() {
        let _ = obj.insert("href".to_string(), json!(href));
    }
    if let Some(name) = rule.name() {
        let _ = obj.insert("name".to_string(), json!(name));
    }
    if let Some(keys) = rule.key_text() {
        let _ = obj.insert("keyText".to_string(), json!(keys.to_string()));
    }
    if let Some(child) = rule.style_sheet() {
        let _ = obj.insert("styleSheet".to_string(), sheet_to_json(child));
    }

    let children: Vec<Value> = rule.rules().map(|child| rule_to_json(&child)).collect();
    if !children.is_empty() {
        let _ = obj.insert("cssRules".to_string(), Value::Array(children));
    }
    Value::Object(obj)
}
