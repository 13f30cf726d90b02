//! Content Escaper: makes arbitrary text safe to embed in a LaTeX document.
//!
//! Three steps, in this order:
//! 1. Every `<digits>%` is swapped for a placeholder token and its final form
//!    (`<digits>\%`) is remembered.
//! 2. Each markup-sensitive character is replaced from `SUBSTITUTIONS`. This is a
//!    single pass per character, so the backslashes and braces that a substitution
//!    emits are never escaped a second time.
//! 3. Placeholders are restored.
//!
//! Placeholder tokens are built from private-use code points that appear nowhere
//! in the substitution table, so step 2 cannot corrupt them.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

/// Ordered substitution table. Backslash comes first.
const SUBSTITUTIONS: &[(char, &str)] = &[
    ('\\', r"\textbackslash{}"),
    ('&', r"\&"),
    ('%', r"\%"),
    ('$', r"\$"),
    ('#', r"\#"),
    ('_', r"\_"),
    ('{', r"\{"),
    ('}', r"\}"),
    ('~', r"\textasciitilde{}"),
    ('^', r"\textasciicircum{}"),
    ('\u{223C}', r"\textasciitilde{}"),
];

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

fn percentage_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)%").expect("static regex is valid"))
}

/// Escapes `text` for LaTeX body content.
pub fn escape(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // Step 1: protect numeric percentages.
    let mut protected: Vec<String> = Vec::new();
    let shielded = percentage_pattern().replace_all(text, |caps: &regex::Captures<'_>| {
        protected.push(format!(r"{}\%", &caps[1]));
        format!("{PLACEHOLDER_OPEN}{}{PLACEHOLDER_CLOSE}", protected.len() - 1)
    });

    // Step 2: single-pass character substitution.
    let mut escaped = String::with_capacity(shielded.len() + shielded.len() / 4);
    for ch in shielded.chars() {
        match SUBSTITUTIONS.iter().find(|(from, _)| *from == ch) {
            Some((_, to)) => escaped.push_str(to),
            None => escaped.push(ch),
        }
    }

    // Step 3: restore.
    for (index, rendered) in protected.iter().enumerate() {
        let token = format!("{PLACEHOLDER_OPEN}{index}{PLACEHOLDER_CLOSE}");
        escaped = escaped.replacen(&token, rendered, 1);
    }
    escaped
}

/// `escape` for optional text. `None` renders as an empty string.
pub fn escape_opt(text: Option<&str>) -> String {
    text.map(escape).unwrap_or_default()
}

/// `escape` for an arbitrary JSON value. `None` and null render as an empty
/// string; strings are escaped as-is and anything else as its JSON text.
pub fn escape_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => escape(text),
        Some(other) => escape(&other.to_string()),
    }
}

/// Escapes a URL for use as an `\href` target. Only the characters that break
/// the argument are touched so the link itself stays valid.
pub fn escape_url(url: &str) -> String {
    let mut out = String::with_capacity(url.len());
    for ch in url.chars() {
        match ch {
            '%' | '#' | '{' | '}' => {
                out.push('\\');
                out.push(ch);
            }
            '\\' => out.push('/'),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_percent_is_escaped_once() {
        assert_eq!(escape("5%"), r"5\%");
        assert_eq!(escape("Cut costs by 40% and 5%"), r"Cut costs by 40\% and 5\%");
    }

    #[test]
    fn test_percent_never_becomes_placeholder_garbage() {
        let out = escape("Grew revenue 120% YoY (top_10%)");
        assert_eq!(out, r"Grew revenue 120\% YoY (top\_10\%)");
        assert!(!out.contains(PLACEHOLDER_OPEN));
        assert!(!out.contains("PLACEHOLDER"));
    }

    #[test]
    fn test_bare_percent_without_digits() {
        assert_eq!(escape("100 % sure"), r"100 \% sure");
    }

    #[test]
    fn test_full_substitution_table() {
        assert_eq!(
            escape(r"a\b & c $ # _ { } ~ ^"),
            r"a\textbackslash{}b \& c \$ \# \_ \{ \} \textasciitilde{} \textasciicircum{}"
        );
    }

    #[test]
    fn test_backslash_output_braces_not_reescaped() {
        assert_eq!(escape(r"\"), r"\textbackslash{}");
    }

    #[test]
    fn test_tilde_operator() {
        assert_eq!(escape("\u{223C}3 weeks"), r"\textasciitilde{}3 weeks");
    }

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape("Built a cache in Rust."), "Built a cache in Rust.");
        assert_eq!(escape(""), "");
    }

    #[test]
    fn test_escape_opt_none_is_empty() {
        assert_eq!(escape_opt(None), "");
        assert_eq!(escape_opt(Some("R&D")), r"R\&D");
    }

    #[test]
    fn test_escape_value_is_total() {
        assert_eq!(escape_value(None), "");
        assert_eq!(escape_value(Some(&json!(null))), "");
        assert_eq!(escape_value(Some(&json!(3.7))), "3.7");
        assert_eq!(escape_value(Some(&json!(true))), "true");
        assert_eq!(escape_value(Some(&json!(["a"]))), r#"["a"]"#);
        assert_eq!(escape_value(Some(&json!({"k": 1}))), r#"\{"k":1\}"#);
        assert_eq!(escape_value(Some(&json!("a_b"))), r"a\_b");
        assert_eq!(escape_value(Some(&json!("50%"))), r"50\%");
    }

    #[test]
    fn test_escape_url_keeps_link_usable() {
        assert_eq!(
            escape_url("https://x.dev/a%20b#top"),
            r"https://x.dev/a\%20b\#top"
        );
    }
}
