use crate::error::{EngineError, Result};
use crate::index::InvertedIndex;
use crate::scorer;
use crate::snippet::{self, Snippet};
use crate::tokenizer::{default_stop_words, Analyzer};
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Queries longer than this are rejected outright rather than tokenized.
const MAX_QUERY_LEN: usize = 10_000;

/// Construction-time configuration for [`SearchEngine`]. No environment or
/// file coupling; everything is passed in.
pub struct EngineConfig {
    pub stop_words: HashSet<String>,
    pub stemming: bool,
    pub default_top_n: usize,
    pub window_size: usize,
    pub max_snippets: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stop_words: default_stop_words(),
            stemming: true,
            default_top_n: 10,
            window_size: 200,
            max_snippets: 3,
        }
    }
}

/// Metadata supplied by the extraction collaborator alongside document text.
/// The engine stores it verbatim and hands it back with results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentMeta {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub size_bytes: u64,
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub pages: Option<u32>,
    #[serde(default)]
    pub paragraphs: Option<u32>,
    /// Free-form extractor output (PDF info dictionary, DOCX core properties).
    #[serde(default)]
    pub extra: Option<serde_json::Value>,
}

/// A stored document: raw text plus metadata, immutable once ingested.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub meta: DocumentMeta,
    pub token_count: usize,
}

/// One search hit: document identity, score, and highlighted snippets.
/// Ephemeral: computed per search call, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    pub doc_id: String,
    pub filename: String,
    pub score: f32,
    pub snippets: Vec<Snippet>,
    pub metadata: DocumentMeta,
}

/// In-memory search engine over a small document corpus.
///
/// Owns the document store and the inverted index; both live and die with the
/// engine instance, and independent instances share nothing. The engine is
/// synchronous and single-threaded; callers sharing one instance across
/// threads must serialize access externally (one lock per engine).
pub struct SearchEngine {
    config: EngineConfig,
    analyzer: Analyzer,
    index: InvertedIndex,
    documents: HashMap<DocId, Document>,
    ids: HashMap<String, DocId>,
    next_doc_id: DocId,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let analyzer = Analyzer::new(config.stop_words.clone(), config.stemming);
        Self {
            config,
            analyzer,
            index: InvertedIndex::new(),
            documents: HashMap::new(),
            ids: HashMap::new(),
            next_doc_id: 0,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Store and index a document. Re-ingesting a known id replaces its text
    /// and postings while keeping its place in the ingestion order. Rejection
    /// leaves the engine untouched.
    pub fn ingest(&mut self, id: &str, text: &str, meta: DocumentMeta) -> Result<()> {
        if id.trim().is_empty() {
            return Err(EngineError::invalid_argument("document id must not be empty"));
        }

        let doc_id = match self.ids.get(id) {
            Some(&existing) => existing,
            None => {
                let fresh = self.next_doc_id;
                self.next_doc_id += 1;
                self.ids.insert(id.to_string(), fresh);
                fresh
            }
        };

        let tokens = self.analyzer.analyze(text);
        self.index.add_document(doc_id, &tokens);
        self.documents.insert(
            doc_id,
            Document {
                id: id.to_string(),
                text: text.to_string(),
                meta,
                token_count: tokens.len(),
            },
        );
        tracing::debug!(doc = id, tokens = tokens.len(), total = self.documents.len(), "document ingested");
        Ok(())
    }

    /// Search with the engine's configured defaults.
    pub fn search(&self, query: &str) -> Result<Vec<RankedResult>> {
        self.search_with(query, self.config.default_top_n, self.config.window_size)
    }

    /// Search with explicit result count and snippet window overrides.
    ///
    /// A query that normalizes to zero tokens (or matches nothing) returns an
    /// empty list, not an error; so does searching an empty engine.
    pub fn search_with(&self, query: &str, top_n: usize, window_size: usize) -> Result<Vec<RankedResult>> {
        if query.len() > MAX_QUERY_LEN {
            tracing::warn!(len = query.len(), "rejecting over-long query");
            return Err(EngineError::invalid_argument(format!(
                "query exceeds {MAX_QUERY_LEN} bytes"
            )));
        }

        let query_tokens = self.analyzer.analyze(query);
        if query_tokens.is_empty() {
            return Ok(Vec::new());
        }
        let term_set: HashSet<String> = query_tokens.iter().map(|t| t.term.clone()).collect();

        let ranked = scorer::score(&query_tokens, &self.index);
        let mut results = Vec::with_capacity(top_n.min(ranked.len()));
        for (doc_id, score) in ranked.into_iter().take(top_n) {
            let doc = self.documents.get(&doc_id).ok_or_else(|| {
                EngineError::InternalInvariantViolation(format!(
                    "posting references unknown document {doc_id}"
                ))
            })?;
            let snippets = snippet::extract(
                &doc.text,
                &term_set,
                &self.analyzer,
                window_size,
                self.config.max_snippets,
            );
            results.push(RankedResult {
                doc_id: doc.id.clone(),
                filename: doc.meta.filename.clone(),
                score,
                snippets,
                metadata: doc.meta.clone(),
            });
        }
        Ok(results)
    }

    /// Drop every document and reset the index to the initial empty state.
    pub fn clear(&mut self) {
        self.index.remove_all();
        self.documents.clear();
        self.ids.clear();
        self.next_doc_id = 0;
        tracing::debug!("engine cleared");
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.ids.get(id).and_then(|doc_id| self.documents.get(doc_id))
    }

    /// Stored documents in ingestion order.
    pub fn documents(&self) -> Vec<&Document> {
        let mut entries: Vec<(&DocId, &Document)> = self.documents.iter().collect();
        entries.sort_by_key(|(doc_id, _)| **doc_id);
        entries.into_iter().map(|(_, doc)| doc).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
