//! Keyword annotation — numbers and colors the placeholder values found in a prompt.
//!
//! Flow: order_keywords → (render_annotated_text, build_legend).
//!
//! The ordered keyword list is derived once; the annotated text and the legend
//! are two independent projections of it, so their numbering and colors always agree.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotation::legend::{build_legend, render_legend_html, LegendEntry};
use crate::annotation::palette::ColorCycle;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A literal value expected to appear in a prompt template, with its legend text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceholderValue {
    pub value: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl PlaceholderValue {
    pub fn new(value: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            value: value.into(),
            description: description.map(str::to_string),
        }
    }
}

/// A placeholder that was found in the prompt, ranked by first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderedKeyword {
    pub value: String,
    pub description: Option<String>,
    /// Byte offset of the first case-insensitive occurrence in the prompt.
    pub position: usize,
    /// Dense 1-based rank by `position`.
    pub sequence: usize,
    pub color: &'static str,
}

/// Result of annotating one prompt.
#[derive(Debug, Clone, Serialize)]
pub struct Annotation {
    pub annotated_text: String,
    pub keywords: Vec<OrderedKeyword>,
    pub legend: Vec<LegendEntry>,
    pub legend_html: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Public API
// ────────────────────────────────────────────────────────────────────────────

/// Annotates `prompt_text` with numbered, colored highlights for each placeholder it contains.
///
/// Empty prompt text or an empty placeholder list returns the text unchanged with an empty legend.
pub fn annotate(prompt_text: &str, placeholders: &[PlaceholderValue]) -> Annotation {
    let keywords = order_keywords(prompt_text, placeholders);
    let annotated_text = render_annotated_text(prompt_text, &keywords);
    let legend = build_legend(&keywords);
    let legend_html = render_legend_html(&legend);

    debug!(
        placeholders = placeholders.len(),
        found = keywords.len(),
        legend_entries = legend.len(),
        "annotated prompt"
    );

    Annotation {
        annotated_text,
        keywords,
        legend,
        legend_html,
    }
}

/// Finds each placeholder's first case-insensitive occurrence and ranks them.
///
/// Placeholders with an empty value or no occurrence are dropped and consume no number.
/// Occurrence here is a plain substring search; ties keep input order.
pub fn order_keywords(prompt_text: &str, placeholders: &[PlaceholderValue]) -> Vec<OrderedKeyword> {
    if prompt_text.is_empty() {
        return Vec::new();
    }

    let mut found: Vec<(usize, &PlaceholderValue)> = placeholders
        .iter()
        .filter(|p| !p.value.is_empty())
        .filter_map(|p| {
            let re = literal_matcher(&p.value, false)?;
            re.find(prompt_text).map(|m| (m.start(), p))
        })
        .collect();

    // sort_by_key is stable: equal positions keep their input order.
    found.sort_by_key(|(position, _)| *position);

    found
        .into_iter()
        .enumerate()
        .map(|(i, (position, p))| OrderedKeyword {
            value: p.value.clone(),
            description: p.description.clone(),
            position,
            sequence: i + 1,
            color: ColorCycle::color_at(i),
        })
        .collect()
}

/// Wraps every whole-word occurrence of each keyword in a highlight span.
///
/// All matches are located against the original text before anything is
/// inserted, so a keyword can never match inside the markup of another. A match
/// lying entirely inside another keyword's match is rendered as a nested span.
/// A match that crosses the boundary of an earlier-starting one is dropped.
pub fn render_annotated_text(prompt_text: &str, keywords: &[OrderedKeyword]) -> String {
    if prompt_text.is_empty() || keywords.is_empty() {
        return prompt_text.to_string();
    }

    let mut matches: Vec<Highlight> = Vec::new();
    for keyword in keywords {
        let Some(re) = literal_matcher(&keyword.value, true) else {
            continue;
        };
        matches.extend(re.find_iter(prompt_text).map(|m| Highlight {
            start: m.start(),
            end: m.end(),
            keyword,
        }));
    }

    // Outer spans before the spans they contain; identical ranges by sequence.
    matches.sort_by(|a, b| {
        a.start
            .cmp(&b.start)
            .then(b.end.cmp(&a.end))
            .then(a.keyword.sequence.cmp(&b.keyword.sequence))
    });

    let mut out = String::with_capacity(prompt_text.len() + matches.len() * 120);
    let mut cursor = 0;
    // Currently open spans, innermost last. Each lies inside the one below it.
    let mut open: Vec<Highlight> = Vec::new();

    for m in matches {
        while open.last().is_some_and(|top| top.end <= m.start) {
            if let Some(done) = open.pop() {
                close_span(&mut out, prompt_text, &mut cursor, &done);
            }
        }
        if open.last().is_some_and(|top| m.end > top.end) {
            continue;
        }

        out.push_str(&prompt_text[cursor..m.start]);
        out.push_str(&open_span(m.keyword));
        cursor = m.start;
        open.push(m);
    }
    while let Some(done) = open.pop() {
        close_span(&mut out, prompt_text, &mut cursor, &done);
    }
    out.push_str(&prompt_text[cursor..]);
    out
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

/// One whole-word match of a keyword, as a byte range of the original text.
#[derive(Clone, Copy)]
struct Highlight<'k> {
    start: usize,
    end: usize,
    keyword: &'k OrderedKeyword,
}

/// Case-insensitive matcher for a literal value, optionally bounded by word boundaries.
fn literal_matcher(value: &str, whole_word: bool) -> Option<Regex> {
    let escaped = regex::escape(value);
    let pattern = if whole_word {
        format!(r"\b(?:{escaped})\b")
    } else {
        escaped
    };
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .ok()
}

fn open_span(keyword: &OrderedKeyword) -> String {
    format!(
        r#"<span style="background-color:{};color:white;padding:2px 4px;border-radius:4px;">"#,
        keyword.color
    )
}

/// Emits the rest of the matched text, then the number and the closing tag.
fn close_span(out: &mut String, prompt_text: &str, cursor: &mut usize, done: &Highlight) {
    out.push_str(&prompt_text[*cursor..done.end]);
    out.push_str(&format!("<sup>{}</sup></span>", done.keyword.sequence));
    *cursor = done.end;
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
