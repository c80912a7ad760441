use crate::tokenizer::Token;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Per (term, document) record: how often and where the term occurs.
///
/// `term_frequency` always equals `positions.len()`; both are derived from the
/// same token sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Posting {
    pub term_frequency: u32,
    /// Zero-based indices into the document's emitted token sequence, ascending.
    pub positions: Vec<u32>,
}

/// Inverted index mapping terms to per-document postings.
///
/// Postings are keyed by document id inside each term entry, so a
/// (term, document) pair has at most one posting. The index is derived state:
/// it is rebuilt from stored documents and never edited directly.
#[derive(Debug, Default)]
pub struct InvertedIndex {
    postings: HashMap<String, BTreeMap<DocId, Posting>>,
    /// Terms each document contributed, so removal can be exact.
    doc_terms: HashMap<DocId, Vec<String>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index a document's token sequence. Re-adding a known document id
    /// replaces its previous postings entirely, leaving nothing stale.
    pub fn add_document(&mut self, doc_id: DocId, tokens: &[Token]) {
        if self.doc_terms.contains_key(&doc_id) {
            self.remove_document(doc_id);
        }

        let mut by_term: HashMap<&str, Vec<u32>> = HashMap::new();
        for token in tokens {
            by_term
                .entry(token.term.as_str())
                .or_default()
                .push(token.position);
        }

        let mut terms = Vec::with_capacity(by_term.len());
        for (term, positions) in by_term {
            let posting = Posting {
                term_frequency: positions.len() as u32,
                positions,
            };
            self.postings
                .entry(term.to_string())
                .or_default()
                .insert(doc_id, posting);
            terms.push(term.to_string());
        }
        self.doc_terms.insert(doc_id, terms);
    }

    /// Remove one document's postings. Terms left with an empty posting list
    /// disappear from the index. Unknown ids are a no-op.
    pub fn remove_document(&mut self, doc_id: DocId) {
        let Some(terms) = self.doc_terms.remove(&doc_id) else {
            return;
        };
        for term in terms {
            if let Some(entry) = self.postings.get_mut(&term) {
                entry.remove(&doc_id);
                if entry.is_empty() {
                    self.postings.remove(&term);
                }
            }
        }
    }

    /// Discard everything, returning the index to its initial empty state.
    pub fn remove_all(&mut self) {
        self.postings.clear();
        self.doc_terms.clear();
    }

    pub fn postings(&self, term: &str) -> Option<&BTreeMap<DocId, Posting>> {
        self.postings.get(term)
    }

    /// Number of documents containing the term at least once.
    pub fn document_frequency(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, |entry| entry.len())
    }

    pub fn doc_count(&self) -> usize {
        self.doc_terms.len()
    }

    pub fn term_count(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_terms.is_empty()
    }
}
