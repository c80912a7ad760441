use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docquery_core::{DocumentMeta, SearchEngine, Snippet};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "docquery")]
#[command(about = "Search a directory of plain-text documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load .txt files and run a query against them
    Search {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Free-text query
        query: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        top_n: usize,
        /// Snippet window size in characters
        #[arg(long, default_value_t = 200)]
        window: usize,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { input, query, top_n, window } => run_search(&input, &query, top_n, window),
    }
}

fn run_search(input: &str, query: &str, top_n: usize, window: usize) -> Result<()> {
    let files = collect_txt_files(Path::new(input));
    if files.is_empty() {
        anyhow::bail!("no .txt files found under {input}");
    }

    let mut engine = SearchEngine::new();
    for path in &files {
        let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let meta = DocumentMeta {
            filename,
            size_bytes: text.len() as u64,
            format: Some("txt".to_string()),
            ..Default::default()
        };
        engine.ingest(&path.display().to_string(), &text, meta)?;
    }
    tracing::info!(documents = engine.len(), "corpus loaded");

    let results = engine.search_with(query, top_n, window)?;
    if results.is_empty() {
        println!("No matching documents.");
        return Ok(());
    }
    for (rank, hit) in results.iter().enumerate() {
        println!("{}. {} (score {:.3})", rank + 1, hit.filename, hit.score);
        for snippet in &hit.snippets {
            println!("   ...{}...", render_snippet(snippet));
        }
    }
    Ok(())
}

fn collect_txt_files(input: &Path) -> Vec<PathBuf> {
    if input.is_file() {
        return vec![input.to_path_buf()];
    }
    WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.path().is_file()
                && e.path().extension().and_then(|s| s.to_str()) == Some("txt")
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Render highlight spans as **match** markers for terminal output.
fn render_snippet(snippet: &Snippet) -> String {
    let mut out = String::with_capacity(snippet.text.len() + snippet.highlights.len() * 4);
    let mut cursor = 0;
    for h in &snippet.highlights {
        out.push_str(&snippet.text[cursor..h.start]);
        out.push_str("**");
        out.push_str(&snippet.text[h.start..h.end]);
        out.push_str("**");
        cursor = h.end;
    }
    out.push_str(&snippet.text[cursor..]);
    out
}
