use crate::index::InvertedIndex;
use crate::tokenizer::Token;
use crate::DocId;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Score candidate documents for a tokenized query.
///
/// Each query term contributes `tf * ln(1 + N / df)` to every document that
/// contains it, where `N` is the corpus size and `df` the number of documents
/// containing the term. Documents matching no query term are never scored.
/// Results come back sorted by descending score; exact ties break by
/// ascending document id, so earlier-ingested documents rank first.
pub fn score(query_tokens: &[Token], index: &InvertedIndex) -> Vec<(DocId, f32)> {
    if query_tokens.is_empty() || index.is_empty() {
        return Vec::new();
    }

    let n = index.doc_count() as f32;
    let mut scores: HashMap<DocId, f32> = HashMap::new();
    for token in query_tokens {
        let Some(postings) = index.postings(&token.term) else {
            continue;
        };
        let df = postings.len() as f32;
        let idf = (1.0 + n / df).ln();
        for (&doc_id, posting) in postings {
            *scores.entry(doc_id).or_insert(0.0) += posting.term_frequency as f32 * idf;
        }
    }

    let mut ranked: Vec<(DocId, f32)> = scores.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.1.partial_cmp(&a.1)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.0.cmp(&b.0))
    });
    ranked
}
