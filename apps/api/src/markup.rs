//! Small HTML helpers shared by the annotator and the chat orchestrator.
//!
//! None of this is a general HTML parser. The prompt editor only ever holds
//! plain text plus the highlight spans the annotator emits, and the backend
//! either answers with an HTML fragment or with plain text.

use once_cell::sync::Lazy;
use regex::Regex;

static SUPERSCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<sup>.*?</sup>").expect("superscript pattern is valid"));

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"));

static HTML_LIKE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?[a-z].*>").expect("html pattern is valid"));

/// Removes annotation markup from editor text.
///
/// Two stages, in this order: superscript sequence markers are dropped with
/// their content, then every remaining tag is dropped leaving its inner text.
/// The result is not trimmed.
pub fn strip_annotations(text: &str) -> String {
    let without_markers = SUPERSCRIPT_RE.replace_all(text, "");
    TAG_RE.replace_all(&without_markers, "").into_owned()
}

/// True when the text contains something that looks like an HTML tag.
pub fn looks_like_html(text: &str) -> bool {
    HTML_LIKE_RE.is_match(text)
}

/// Escapes `&`, `<` and `>` so plain text can be embedded in an HTML fragment.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_removes_superscripts_before_tags() {
        let input = r#"Show <span style="color:red">revenue<sup>1</sup></span> by region"#;
        assert_eq!(strip_annotations(input), "Show revenue by region");
    }

    #[test]
    fn test_strip_superscript_is_case_insensitive_and_lazy() {
        let input = "a<SUP>1</SUP> b<sup>2</sup> c";
        assert_eq!(strip_annotations(input), "a b c");
    }

    #[test]
    fn test_strip_leaves_plain_text_alone() {
        assert_eq!(strip_annotations("  plain text  "), "  plain text  ");
    }

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<table><tr><td>1</td></tr></table>"));
        assert!(looks_like_html("Total: <b>42</b>"));
        assert!(looks_like_html("<BR/>"));
        assert!(!looks_like_html("No rows matched the query."));
        assert!(!looks_like_html("x < 5 and y > 3"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }
}
