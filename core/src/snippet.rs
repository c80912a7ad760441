use crate::tokenizer::Analyzer;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Byte span of a matched term, relative to the snippet's excerpt text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub start: usize,
    pub end: usize,
}

/// Bounded excerpt of document text with highlight spans for matched terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    pub highlights: Vec<Highlight>,
}

/// Extract up to `max_snippets` excerpts of roughly `window_size` bytes
/// around query term matches.
///
/// Matching runs over the raw text so highlight offsets stay exact: each word
/// found by the analyzer's boundary regex is normalized and compared against
/// the query term set, which lets stemmed variants match ("running"
/// highlights for the query "run"). Overlapping windows merge into one
/// excerpt. A non-empty text with no matches yields a single default snippet
/// taken from the start of the document; empty text yields nothing.
pub fn extract(
    text: &str,
    query_terms: &HashSet<String>,
    analyzer: &Analyzer,
    window_size: usize,
    max_snippets: usize,
) -> Vec<Snippet> {
    if text.is_empty() || max_snippets == 0 {
        return Vec::new();
    }

    // Match byte ranges in the raw text, in ascending order.
    let mut matches: Vec<(usize, usize)> = Vec::new();
    for mat in Analyzer::word_regex().find_iter(text) {
        let word = mat.as_str().to_lowercase();
        if analyzer.is_stop_word(&word) {
            continue;
        }
        if query_terms.contains(&analyzer.normalize_word(&word)) {
            matches.push((mat.start(), mat.end()));
        }
    }

    if matches.is_empty() {
        let end = floor_char_boundary(text, window_size);
        return vec![Snippet {
            text: text[..end].to_string(),
            highlights: Vec::new(),
        }];
    }

    // One window per match, centered and clamped; merge while still sorted.
    let mut windows: Vec<(usize, usize)> = Vec::new();
    for &(start, end) in &matches {
        let mid = start + (end - start) / 2;
        let w_start = floor_char_boundary(text, mid.saturating_sub(window_size / 2));
        let w_end = ceil_char_boundary(text, w_start + window_size);
        match windows.last_mut() {
            Some(last) if w_start <= last.1 => last.1 = last.1.max(w_end),
            _ => windows.push((w_start, w_end)),
        }
    }
    windows.truncate(max_snippets);

    windows
        .into_iter()
        .map(|(w_start, w_end)| {
            let highlights = matches
                .iter()
                .filter(|&&(start, end)| start >= w_start && end <= w_end)
                .map(|&(start, end)| Highlight {
                    start: start - w_start,
                    end: end - w_start,
                })
                .collect();
            Snippet {
                text: text[w_start..w_end].to_string(),
                highlights,
            }
        })
        .collect()
}

fn floor_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

fn ceil_char_boundary(text: &str, index: usize) -> usize {
    let mut index = index.min(text.len());
    while !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn window_centers_on_the_match() {
        let analyzer = Analyzer::default();
        let text = "aaaa bbbb cccc target dddd eeee ffff";
        let snippets = extract(text, &terms(&["target"]), &analyzer, 16, 3);
        assert_eq!(snippets.len(), 1);
        let snippet = &snippets[0];
        assert!(snippet.text.contains("target"));
        let h = snippet.highlights[0];
        assert_eq!(&snippet.text[h.start..h.end], "target");
    }

    #[test]
    fn no_match_falls_back_to_document_start() {
        let analyzer = Analyzer::default();
        let text = "nothing in here relates to it";
        let snippets = extract(text, &terms(&["absent"]), &analyzer, 10, 3);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].text, "nothing in");
        assert!(snippets[0].highlights.is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        let analyzer = Analyzer::default();
        assert!(extract("", &terms(&["x"]), &analyzer, 10, 3).is_empty());
    }

    #[test]
    fn overlapping_windows_merge() {
        let analyzer = Analyzer::default();
        let text = "fox fox and nothing else follows here";
        let snippets = extract(text, &terms(&["fox"]), &analyzer, 30, 3);
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].highlights.len(), 2);
        for h in &snippets[0].highlights {
            assert_eq!(&snippets[0].text[h.start..h.end], "fox");
        }
    }

    #[test]
    fn distant_matches_stay_separate_and_are_capped() {
        let analyzer = Analyzer::default();
        let filler = "x".repeat(60);
        let text = format!("fox {filler} fox {filler} fox {filler} fox");
        let snippets = extract(&text, &terms(&["fox"]), &analyzer, 10, 3);
        assert_eq!(snippets.len(), 3);
        for snippet in &snippets {
            assert!(!snippet.highlights.is_empty());
        }
    }

    #[test]
    fn stemmed_variants_highlight() {
        let analyzer = Analyzer::default();
        let text = "She was running fast";
        // Query token as the analyzer would produce it for "runs".
        let snippets = extract(text, &terms(&["run"]), &analyzer, 40, 3);
        let snippet = &snippets[0];
        let h = snippet.highlights[0];
        assert_eq!(&snippet.text[h.start..h.end], "running");
    }

    #[test]
    fn matching_is_case_insensitive() {
        let analyzer = Analyzer::default();
        let text = "QUICK decisions matter";
        let snippets = extract(text, &terms(&["quick"]), &analyzer, 40, 3);
        assert_eq!(snippets[0].highlights.len(), 1);
    }

    #[test]
    fn window_larger_than_text_is_clamped() {
        let analyzer = Analyzer::default();
        let text = "tiny fox";
        let snippets = extract(text, &terms(&["fox"]), &analyzer, 500, 3);
        assert_eq!(snippets[0].text, "tiny fox");
    }

    #[test]
    fn multibyte_text_never_panics() {
        let analyzer = Analyzer::default();
        let text = "héllo wörld 日本語 text fox ☃ more ☃☃ padding";
        for window in [1, 3, 7, 20, 200] {
            let snippets = extract(text, &terms(&["fox"]), &analyzer, window, 3);
            assert!(!snippets.is_empty());
        }
        // Default-snippet path must clamp inside multibyte sequences too.
        let snippets = extract("☃☃☃☃", &terms(&["fox"]), &analyzer, 5, 3);
        assert_eq!(snippets.len(), 1);
    }
}
