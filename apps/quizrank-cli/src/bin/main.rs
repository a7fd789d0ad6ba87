use std::env;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use indicatif::ProgressBar;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use quizrank_core::chunker::ParagraphChunker;
use quizrank_core::config::{Config, Settings};
use quizrank_core::quiz::{build_context, synthesize_query};
use quizrank_core::types::Selection;
use quizrank_core::{CorpusSnapshot, CorpusStore};
use quizrank_text::CorpusLoader;

#[derive(Parser)]
#[command(name = "quizrank", about = "Rank document chunks for quiz question generation")]
struct Cli {
    /// Directory holding config.toml and its per-environment overlays
    #[arg(long, global = true, default_value = ".")]
    config_dir: PathBuf,

    /// Load every supported document under this directory instead of the configured sources
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List loaded categories and their chunk counts
    Categories,
    /// Print the chunks selected for a query
    Rank(RankArgs),
    /// Print the joined context that would be handed to the question generator
    Context(RankArgs),
}

#[derive(Args)]
struct RankArgs {
    #[arg(long)]
    category: String,

    /// Free-text query; defaults to the generic first-round prompt
    #[arg(long, conflicts_with = "recent")]
    query: Option<String>,

    /// Previously asked question (repeatable); the last three form the query
    #[arg(long)]
    recent: Vec<String>,

    #[arg(long)]
    top_k: Option<usize>,

    #[arg(long)]
    json: bool,

    /// Show scores and corpus positions
    #[arg(long)]
    explain: bool,
}

fn init_tracing(env_name: &str) {
    let default_filter = match env_name {
        "dev" | "development" => "info,quizrank_core=debug,quizrank_text=debug",
        _ => "info",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .init();
}

fn load_corpus(config: &Config, settings: &Settings, data_dir: Option<PathBuf>) -> anyhow::Result<CorpusSnapshot> {
    let chunker = ParagraphChunker::new(settings.chunking.clone())?;
    let loader = CorpusLoader::new(Box::new(chunker));

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(100));
    let data_dir = data_dir.or_else(|| settings.corpus.data_dir.as_ref().map(|d| config.resolve_path(d)));
    let snapshot = match data_dir {
        Some(dir) => {
            spinner.set_message(format!("Loading documents from {}", dir.display()));
            loader.load_directory(&dir)
        }
        None => {
            spinner.set_message(format!("Loading {} configured sources", settings.corpus.sources.len()));
            loader.load_sources(&settings.corpus.sources, config.base_dir())
        }
    };
    spinner.finish_and_clear();
    Ok(snapshot)
}

fn run_rank(store: &CorpusStore, args: &RankArgs, default_top_k: usize, context_only: bool) -> anyhow::Result<()> {
    let snapshot = store.snapshot();
    if !snapshot.contains(&args.category) {
        tracing::warn!(category = %args.category, known = ?snapshot.categories(), "unknown category");
    }
    let query = args.query.clone().unwrap_or_else(|| synthesize_query(&args.recent));
    let top_k = args.top_k.unwrap_or(default_top_k);

    if context_only {
        let context = build_context(&store.relevant_chunks(&args.category, &query, top_k)?);
        if args.json {
            println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "query": query, "context": context }))?);
        } else {
            println!("{context}");
        }
        return Ok(());
    }

    let ranking = quizrank_core::rank_scored(snapshot.corpus(&args.category), &query, top_k)?;
    if args.json {
        if args.explain {
            println!("{}", serde_json::to_string_pretty(&ranking)?);
        } else {
            println!("{}", serde_json::to_string_pretty(&ranking.into_texts())?);
        }
        return Ok(());
    }

    if args.explain {
        let how = match ranking.selection {
            Selection::Relevance => "keyword relevance",
            Selection::EvenSampling => "even sampling (no keyword signal)",
        };
        println!("Query: {query}\nSelected by {how}, top_k={top_k}");
    }
    if ranking.chunks.is_empty() {
        println!("No content found for category: {}", args.category);
    }
    for (i, chunk) in ranking.chunks.iter().enumerate() {
        if args.explain {
            let score = chunk.score.map_or_else(|| "-".to_string(), |s| format!("{s:.2}"));
            println!("\n{}. score={}  chunk=#{}", i + 1, score, chunk.index);
        } else {
            println!();
        }
        println!("{}", chunk.text);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    let config = Config::load_from(&cli.config_dir, &env_name).map_err(|e| { eprintln!("Error loading config: {}", e); e })?;
    init_tracing(config.env_name());
    let settings = config.settings()?;

    let store = CorpusStore::default();
    let previous = store.replace(load_corpus(&config, &settings, cli.data_dir.clone())?);
    tracing::debug!(replaced_chunks = previous.total_chunks(), loaded_chunks = store.snapshot().total_chunks(), "corpus installed");

    match &cli.command {
        Command::Categories => {
            let snapshot = store.snapshot();
            if snapshot.is_empty() {
                println!("No documents loaded.");
            }
            for category in snapshot.categories() {
                println!("{}: {} chunks", category, snapshot.corpus(category).len());
            }
        }
        Command::Rank(args) => run_rank(&store, args, settings.ranking.top_k, false)?,
        Command::Context(args) => run_rank(&store, args, settings.ranking.top_k, true)?,
    }
    Ok(())
}
