use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref WORD: Regex = Regex::new(r"(?u)\p{L}[\p{L}\p{N}_']*").expect("valid regex");
}

/// Standard English stop words, used unless the caller injects its own set.
pub const DEFAULT_STOP_WORDS: &[&str] = &[
    "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
    "be","because","been","before","being","below","between","both","but","by",
    "can","can't","cannot","could","couldn't",
    "did","didn't","do","does","doesn't","doing","don't","down","during",
    "each","few","for","from","further",
    "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
    "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
    "let's","me","more","most","mustn't","my","myself",
    "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
    "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
    "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
    "under","until","up","very",
    "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
    "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves",
];

/// The default stop-word set as an owned collection.
pub fn default_stop_words() -> HashSet<String> {
    DEFAULT_STOP_WORDS.iter().map(|w| (*w).to_string()).collect()
}

/// A normalized term with its zero-based position in the emitted token sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub term: String,
    pub position: u32,
}

/// Text analyzer shared by indexing, query parsing, and snippet matching.
///
/// Applies NFKC normalization, lowercasing, stop-word removal, and optionally
/// Snowball stemming. The engine hands the same analyzer to both the index
/// and the query path; diverging rules between the two sides silently lose
/// matches.
pub struct Analyzer {
    stop_words: HashSet<String>,
    stemmer: Option<Stemmer>,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new(default_stop_words(), true)
    }
}

impl Analyzer {
    pub fn new(stop_words: HashSet<String>, stemming: bool) -> Self {
        let stemmer = stemming.then(|| Stemmer::create(Algorithm::English));
        Self { stop_words, stemmer }
    }

    /// Tokenize text into normalized terms. Positions index the emitted
    /// sequence, so stop words leave no gaps. Empty or whitespace-only input
    /// yields an empty vec.
    pub fn analyze(&self, text: &str) -> Vec<Token> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let mut tokens = Vec::new();
        for mat in WORD.find_iter(&normalized) {
            let word = mat.as_str();
            if self.stop_words.contains(word) {
                continue;
            }
            let term = self.normalize_word(word);
            let position = tokens.len() as u32;
            tokens.push(Token { term, position });
        }
        tokens
    }

    /// Reduce a single lowercased word to its root form.
    pub fn normalize_word(&self, word: &str) -> String {
        match &self.stemmer {
            Some(stemmer) => stemmer.stem(word).to_string(),
            None => word.to_string(),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Word-boundary matcher, exposed so snippet extraction can take offsets
    /// against the raw (un-normalized) document text.
    pub fn word_regex() -> &'static Regex {
        &WORD
    }
}
