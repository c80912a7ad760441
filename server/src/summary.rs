//! Deterministic document analysis for the display layer.
//!
//! Reconstructs the templated summary generator as pure functions: fixed
//! phrasing, frequency-derived key terms, no model and no randomness. Works
//! from raw text and metadata only; it never sees the index.

use docquery_core::tokenizer::{default_stop_words, Analyzer};
use docquery_core::DocumentMeta;
use serde::Serialize;
use std::collections::HashMap;

/// Average silent reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Sentences carrying one of these are preferred as summary material.
const EMPHASIS: &[&str] = &[
    "important", "significant", "key", "main", "primary",
    "essential", "critical", "fundamental", "crucial",
];

const TRANSITIONS: &[&str] = &["Additionally,", "Furthermore,", "Moreover,"];

#[derive(Debug, Serialize)]
pub struct DocumentAnalysis {
    pub document_type: String,
    pub summary: String,
    pub key_topics: Vec<String>,
    pub reading_time: String,
}

/// Analyze document content and metadata into display-ready insights.
pub fn analyze(text: &str, meta: &DocumentMeta) -> DocumentAnalysis {
    let title = meta
        .extra
        .as_ref()
        .and_then(|m| m.get("Title"))
        .and_then(|v| v.as_str())
        .unwrap_or("");
    let author = meta
        .extra
        .as_ref()
        .and_then(|m| m.get("Author"))
        .and_then(|v| v.as_str());
    let category = if title.to_lowercase().contains("manual") {
        "technical manual"
    } else if author.is_some() && !title.is_empty() {
        "academic paper"
    } else {
        "document"
    };

    let word_count = text.split_whitespace().count();
    let minutes = (word_count / WORDS_PER_MINUTE).max(1);

    DocumentAnalysis {
        document_type: format!("This content is characteristic of a {category}."),
        summary: summarize(text, 200),
        key_topics: key_terms(text, 5),
        reading_time: format!("{minutes} minute{}", if minutes == 1 { "" } else { "s" }),
    }
}

/// Most frequent non-stop-word terms, ties broken alphabetically. Terms are
/// kept unstemmed so they read naturally in the UI.
pub fn key_terms(text: &str, count: usize) -> Vec<String> {
    let analyzer = Analyzer::new(default_stop_words(), false);
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in analyzer.analyze(text) {
        if token.term.len() < 3 {
            continue;
        }
        *counts.entry(token.term).or_insert(0) += 1;
    }
    let mut terms: Vec<(String, usize)> = counts.into_iter().collect();
    terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    terms.into_iter().take(count).map(|(term, _)| term).collect()
}

/// Summarize `text` into at most `max_len` characters: a fixed lead-in naming
/// the top terms, then up to three emphasis-bearing sentences (falling back
/// to the opening sentence), truncated at a word boundary.
pub fn summarize(text: &str, max_len: usize) -> String {
    let text = text.trim();
    if text.len() < 50 {
        return "The provided text is too short to generate a meaningful summary.".to_string();
    }

    let topics = key_terms(text, 3);
    let sentences = split_sentences(text);

    let mut picked: Vec<&str> = Vec::new();
    for sentence in &sentences {
        let words = sentence.split_whitespace().count();
        let lower = sentence.to_lowercase();
        if words > 5 && words < 25 && EMPHASIS.iter().any(|kw| lower.contains(kw)) {
            picked.push(sentence);
            if picked.len() == 3 {
                break;
            }
        }
    }
    if picked.is_empty() {
        if let Some(first) = sentences.first() {
            picked.push(first);
        }
    }

    let mut out = format!("This document primarily focuses on {}.", topics.join(", "));
    for (i, sentence) in picked.iter().enumerate() {
        out.push(' ');
        if i > 0 {
            out.push_str(TRANSITIONS[(i - 1) % TRANSITIONS.len()]);
            out.push(' ');
        }
        out.push_str(sentence);
    }
    truncate_at_word(&out, max_len)
}

/// Split after sentence-final punctuation. Good enough for summaries; no
/// abbreviation handling.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let bytes = text.as_bytes();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if matches!(b, b'.' | b'!' | b'?') {
            let next = bytes.get(i + 1);
            if next.is_none() || matches!(next, Some(b' ') | Some(b'\n')) {
                let sentence = text[start..=i].trim();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                start = i + 1;
            }
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

fn truncate_at_word(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let mut end = max_len.saturating_sub(3);
    while end > 0 && !text.is_char_boundary(end) {
        end -= 1;
    }
    let cut = text[..end].rfind(' ').unwrap_or(end);
    format!("{}...", text[..cut].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Rust is a systems programming language. Memory safety is the most \
        important guarantee it offers. Programs compile to fast native code. The key design \
        goal is zero cost abstractions. Many teams adopt it for reliability.";

    #[test]
    fn analysis_is_deterministic() {
        let meta = DocumentMeta::default();
        let a = analyze(SAMPLE, &meta);
        let b = analyze(SAMPLE, &meta);
        assert_eq!(a.summary, b.summary);
        assert_eq!(a.key_topics, b.key_topics);
        assert_eq!(a.document_type, b.document_type);
    }

    #[test]
    fn short_text_gets_the_fallback_message() {
        assert!(summarize("too short", 200).contains("too short to generate"));
    }

    #[test]
    fn summary_prefers_emphasis_sentences() {
        let summary = summarize(SAMPLE, 500);
        assert!(summary.contains("important") || summary.contains("key"), "{summary}");
    }

    #[test]
    fn summary_respects_max_length() {
        let summary = summarize(SAMPLE, 100);
        assert!(summary.len() <= 100, "{} > 100", summary.len());
    }

    #[test]
    fn key_terms_rank_by_frequency_then_alphabetically() {
        let terms = key_terms("apple apple banana apple banana cherry", 3);
        assert_eq!(terms, ["apple", "banana", "cherry"]);
    }

    #[test]
    fn reading_time_rounds_up_to_a_minute() {
        let analysis = analyze(SAMPLE, &DocumentMeta::default());
        assert_eq!(analysis.reading_time, "1 minute");
    }

    #[test]
    fn metadata_steers_document_type() {
        let meta = DocumentMeta {
            extra: Some(serde_json::json!({ "Title": "Operator Manual" })),
            ..Default::default()
        };
        let analysis = analyze(SAMPLE, &meta);
        assert!(analysis.document_type.contains("technical manual"));
    }
}
