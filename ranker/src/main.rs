use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use topk_core::corpus::load_corpus;
use topk_core::{compute_averages, search, Document, ParallelScorer, Query, RankConfig, ResultSet, Strategy};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, Instant};

#[derive(Parser)]
#[command(name = "ranker")]
#[command(about = "Rank a JSON corpus against a query with bounded top-K BM25", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one query and print the ranked results
    Search {
        #[command(flatten)]
        common: CommonArgs,
        /// full-sort, sorted-insert-trim, ordered-insert or parallel
        #[arg(long, default_value = "parallel")]
        engine: Engine,
    },
    /// Time every strategy and the parallel scorer on the same query
    Bench {
        #[command(flatten)]
        common: CommonArgs,
        /// Repetitions per engine; the fastest run is reported
        #[arg(long, default_value_t = 3)]
        runs: usize,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Input path (file or directory of .json/.jsonl files); may be repeated
    #[arg(long, required = true)]
    input: Vec<String>,
    /// Search string; whitespace-separated keywords
    #[arg(long)]
    query: String,
    /// JSON file with a partial RankConfig; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    k1: Option<f64>,
    #[arg(long)]
    b: Option<f64>,
    #[arg(long)]
    min_score: Option<f64>,
    #[arg(long)]
    max_results: Option<usize>,
    #[arg(long)]
    workers: Option<usize>,
}

#[derive(Clone, Copy, Debug)]
enum Engine {
    Serial(Strategy),
    Parallel,
}

impl FromStr for Engine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("parallel") {
            Ok(Engine::Parallel)
        } else {
            s.parse().map(Engine::Serial)
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Engine::Serial(s) => write!(f, "{s}"),
            Engine::Parallel => f.write_str("parallel"),
        }
    }
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Search { common, engine } => run_search(&common, engine),
        Commands::Bench { common, runs } => run_bench(&common, runs.max(1)),
    }
}

fn run_search(common: &CommonArgs, engine: Engine) -> Result<()> {
    let (corpus, config) = prepare(common)?;
    let stats = compute_averages(&corpus)?;
    let query = Query::parse(&common.query);
    let pool = ParallelScorer::from_config(&config)?;
    let results = execute(engine, &pool, &query, &corpus, &stats, &config)?;
    tracing::info!(%engine, hits = results.len(), "search complete");
    print_results(&results);
    Ok(())
}

fn run_bench(common: &CommonArgs, runs: usize) -> Result<()> {
    let (corpus, config) = prepare(common)?;
    let stats = compute_averages(&corpus)?;
    let query = Query::parse(&common.query);
    // Built once so the timings below exclude thread start-up.
    let pool = ParallelScorer::from_config(&config)?;

    let engines = Strategy::ALL.into_iter().map(Engine::Serial).chain(std::iter::once(Engine::Parallel));
    let mut reference: Option<Vec<(u64, String)>> = None;
    println!("{:<20} {:>8} {:>12}", "engine", "hits", "best");
    for engine in engines {
        let mut best = Duration::MAX;
        let mut hits = 0;
        for _ in 0..runs {
            let start = Instant::now();
            let results = execute(engine, &pool, &query, &corpus, &stats, &config)?;
            best = best.min(start.elapsed());
            hits = results.len();
            let keys: Vec<_> = results.iter().map(|m| (m.score.to_bits(), m.document.id.clone())).collect();
            match &reference {
                Some(expected) if *expected != keys => tracing::warn!(%engine, "result set differs from full-sort"),
                Some(_) => {}
                None => reference = Some(keys),
            }
        }
        tracing::info!(%engine, hits, elapsed_s = best.as_secs_f64(), "benchmarked engine");
        println!("{:<20} {:>8} {:>10.3}ms", engine.to_string(), hits, best.as_secs_f64() * 1000.0);
    }
    Ok(())
}

fn execute<'a>(
    engine: Engine,
    pool: &ParallelScorer,
    query: &Query,
    corpus: &'a [Document],
    stats: &topk_core::CorpusStats,
    config: &RankConfig,
) -> Result<ResultSet<'a>> {
    let results = match engine {
        Engine::Serial(strategy) => search(query, corpus, stats, config, strategy)?,
        Engine::Parallel => pool.rank(query, corpus, stats, config)?,
    };
    Ok(results)
}

fn prepare(common: &CommonArgs) -> Result<(Vec<Document>, RankConfig)> {
    let config = build_config(common)?;
    config.validate()?;
    let files = collect_files(&common.input);
    let corpus = load_corpus(&files)?;
    tracing::info!(files = files.len(), documents = corpus.len(), ?config, "corpus loaded");
    Ok((corpus, config))
}

fn build_config(common: &CommonArgs) -> Result<RankConfig> {
    let mut config = match &common.config {
        Some(path) => {
            let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<RankConfig>(&text).with_context(|| format!("parsing config {}", path.display()))?
        }
        None => RankConfig::default(),
    };
    if let Some(k1) = common.k1 { config = config.with_k1(k1); }
    if let Some(b) = common.b { config = config.with_b(b); }
    if let Some(min_score) = common.min_score { config = config.with_min_score(min_score); }
    if let Some(max_results) = common.max_results { config = config.with_max_results(max_results); }
    if let Some(workers) = common.workers { config = config.with_workers(workers); }
    Ok(config)
}

fn collect_files(inputs: &[String]) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = Vec::new();
    for input in inputs {
        let input_path = Path::new(input);
        if input_path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(input_path)
                .into_iter()
                .filter_map(|e| e.ok())
                .map(|e| e.into_path())
                .filter(|p| p.is_file())
                .filter(|p| matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl")))
                .collect();
            found.sort();
            files.extend(found);
        } else {
            // Missing paths surface as an open error from the loader.
            files.push(input_path.to_path_buf());
        }
    }
    files
}

fn print_results(results: &ResultSet<'_>) {
    if results.is_empty() {
        println!("no matches");
        return;
    }
    for (i, m) in results.iter().enumerate() {
        println!("{:>3}. {:>8.3}  [{}] {}", i + 1, m.score, m.document.id, m.document.title);
    }
}
