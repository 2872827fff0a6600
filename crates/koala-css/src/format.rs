//! Serialization strategies.
//!
//! [CSSOM § 6.7 Serializing CSS Rules](https://www.w3.org/TR/cssom-1/#serializing-css-rules)
//!
//! Every node serializes its children first and hands the pieces to a
//! [`StyleFormatter`], which decides how they are joined. [`CompactFormatter`]
//! produces single-line output that re-parses to the same tree;
//! [`PrettyFormatter`] produces indented, human-oriented output.

/// How serialized pieces are combined.
pub trait StyleFormatter {
    /// A whole stylesheet from its serialized rules.
    fn sheet(&self, rules: &[String]) -> String;

    /// One declaration: `name: value` with an optional `!important`.
    fn declaration(&self, name: &str, value: &str, important: bool) -> String;

    /// The contents of a declaration block.
    fn declarations(&self, declarations: &[String]) -> String;

    /// One media query: `[only |not ]type and (feature)...`.
    fn medium(&self, exclusive: bool, inverse: bool, media_type: &str, constraints: &[String]) -> String;

    /// One media feature constraint: `(name[: value])`.
    fn constraint(&self, name: &str, value: Option<&str>) -> String;

    /// A comment.
    fn comment(&self, text: &str) -> String;

    /// An at-rule: its name followed by the serialized prelude parts.
    fn rule(&self, name: &str, parts: &[String]) -> String;

    /// A `{}` block of nested rules.
    fn block(&self, rules: &[String]) -> String;

    /// A selector (or prelude) with a declaration block.
    fn style(&self, selector: &str, declarations: &str) -> String;
}

/// Types that can serialize themselves with a formatter.
pub trait ToCss {
    /// Serialize with `formatter`.
    fn to_css(&self, formatter: &dyn StyleFormatter) -> String;

    /// Serialize with the [`CompactFormatter`].
    fn css_text(&self) -> String {
        self.to_css(&CompactFormatter)
    }
}

/// Single-line output. `p { color: red; margin: 0 }`
#[derive(Debug, Clone, Copy, Default)]
pub struct CompactFormatter;

impl StyleFormatter for CompactFormatter {
    fn sheet(&self, rules: &[String]) -> String {
        rules.join("\n")
    }

    fn declaration(&self, name: &str, value: &str, important: bool) -> String {
        if important {
            format!("{name}: {value} !important")
        } else {
            format!("{name}: {value}")
        }
    }

    fn declarations(&self, declarations: &[String]) -> String {
        declarations.join("; ")
    }

    fn medium(&self, exclusive: bool, inverse: bool, media_type: &str, constraints: &[String]) -> String {
        join_medium(exclusive, inverse, media_type, constraints)
    }

    fn constraint(&self, name: &str, value: Option<&str>) -> String {
        value.map_or_else(|| format!("({name})"), |value| format!("({name}: {value})"))
    }

    fn comment(&self, text: &str) -> String {
        format!("/*{text}*/")
    }

    fn rule(&self, name: &str, parts: &[String]) -> String {
        join_rule(name, parts)
    }

    fn block(&self, rules: &[String]) -> String {
        if rules.is_empty() {
            "{ }".to_string()
        } else {
            format!("{{ {} }}", rules.join(" "))
        }
    }

    fn style(&self, selector: &str, declarations: &str) -> String {
        let head = if selector.is_empty() {
            String::new()
        } else {
            format!("{selector} ")
        };
        if declarations.is_empty() {
            format!("{head}{{ }}")
        } else {
            format!("{head}{{ {declarations} }}")
        }
    }
}

/// Indented, multi-line output.
///
/// ```text
/// p {
///     color: red;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PrettyFormatter {
    /// One level of indentation.
    pub indentation: String,
    /// Line separator.
    pub newline: String,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self {
            indentation: "\t".to_string(),
            newline: "\n".to_string(),
        }
    }
}

impl PrettyFormatter {
    fn indent(&self, text: &str) -> String {
        text.split(self.newline.as_str())
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("{}{line}", self.indentation)
                }
            })
            .collect::<Vec<_>>()
            .join(&self.newline)
    }
}

impl StyleFormatter for PrettyFormatter {
    fn sheet(&self, rules: &[String]) -> String {
        rules.join(&format!("{0}{0}", self.newline))
    }

    fn declaration(&self, name: &str, value: &str, important: bool) -> String {
        CompactFormatter.declaration(name, value, important)
    }

    fn declarations(&self, declarations: &[String]) -> String {
        declarations
            .iter()
            .map(|d| format!("{d};"))
            .collect::<Vec<_>>()
            .join(&self.newline)
    }

    fn medium(&self, exclusive: bool, inverse: bool, media_type: &str, constraints: &[String]) -> String {
        join_medium(exclusive, inverse, media_type, constraints)
    }

    fn constraint(&self, name: &str, value: Option<&str>) -> String {
        CompactFormatter.constraint(name, value)
    }

    fn comment(&self, text: &str) -> String {
        format!("/* {} */", text.trim())
    }

    fn rule(&self, name: &str, parts: &[String]) -> String {
        join_rule(name, parts)
    }

    fn block(&self, rules: &[String]) -> String {
        if rules.is_empty() {
            return "{ }".to_string();
        }
        let body = self.indent(&rules.join(&format!("{0}{0}", self.newline)));
        format!("{{{nl}{body}{nl}}}", nl = self.newline)
    }

    fn style(&self, selector: &str, declarations: &str) -> String {
        let head = if selector.is_empty() {
            String::new()
        } else {
            format!("{selector} ")
        };
        if declarations.is_empty() {
            return format!("{head}{{ }}");
        }
        format!(
            "{head}{{{nl}{body}{nl}}}",
            body = self.indent(declarations),
            nl = self.newline
        )
    }
}

fn join_medium(exclusive: bool, inverse: bool, media_type: &str, constraints: &[String]) -> String {
    let mut parts = Vec::with_capacity(constraints.len() + 1);
    let prefix = if exclusive {
        "only "
    } else if inverse {
        "not "
    } else {
        ""
    };
    if !media_type.is_empty() {
        parts.push(format!("{prefix}{media_type}"));
    }
    parts.extend(constraints.iter().cloned());
    parts.join(" and ")
}

fn join_rule(name: &str, parts: &[String]) -> String {
    parts
        .iter()
        .filter(|part| !part.is_empty())
        .fold(name.to_string(), |mut out, part| {
            out.push(' ');
            out.push_str(part);
            out
        })
}

/// [CSSOM § 2.1 Serialize an identifier](https://www.w3.org/TR/cssom-1/#serialize-an-identifier)
#[must_use]
pub fn serialize_identifier(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len());
    let chars: Vec<char> = ident.chars().collect();
    for (index, &c) in chars.iter().enumerate() {
        match c {
            // "If the character is NULL (U+0000), then the REPLACEMENT CHARACTER (U+FFFD)."
            '\0' => out.push('\u{FFFD}'),
            // "If the character is in the range [\1-\1f] (U+0001 to U+001F) or is U+007F,
            // then the character escaped as code point."
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            // "If the character is the first character and is in the range [0-9],
            // or is the second character, in [0-9], and the first is '-', then the
            // character escaped as code point."
            '0'..='9' if index == 0 || (index == 1 && chars[0] == '-') => {
                out.push_str(&format!("\\{:x} ", c as u32));
            }
            // "If the character is the first character and is a '-', and there is no
            // second character, then the escaped character."
            '-' if index == 0 && chars.len() == 1 => out.push_str("\\-"),
            // "If the character is not handled by one of the above rules and is greater
            // than or equal to U+0080, is '-' or '_', or is in one of the ranges [0-9],
            // [A-Z], or [a-z], then the character itself."
            c if c >= '\u{80}' || c == '-' || c == '_' || c.is_ascii_alphanumeric() => out.push(c),
            // "Otherwise, the escaped character."
            c => {
                out.push('\\');
                out.push(c);
            }
        }
    }
    out
}

/// [CSSOM § 2.1 Serialize a string](https://www.w3.org/TR/cssom-1/#serialize-a-string)
///
/// "To serialize a string means to create a string represented by '"', followed
/// by the result of applying the rules below to each character of the given
/// string, followed by '"'."
#[must_use]
pub fn serialize_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\0' => out.push('\u{FFFD}'),
            '\u{1}'..='\u{1f}' | '\u{7f}' => out.push_str(&format!("\\{:x} ", c as u32)),
            '"' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// [CSSOM § 2.1 Serialize a URL](https://www.w3.org/TR/cssom-1/#serialize-a-url)
///
/// "To serialize a URL means to create a string represented by "url(", followed
/// by the serialization of the URL as a string, followed by ")"."
#[must_use]
pub fn serialize_url(url: &str) -> String {
    format!("url({})", serialize_string(url))
}

/// Format a number without a trailing `.0`.
#[must_use]
pub fn serialize_number(value: f64) -> String {
    format!("{value}")
}
