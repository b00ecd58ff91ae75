//! CXSIM Query Binary
//!
//! Loads a user behavior table and reports the best match and threshold
//! matches for one target user.

use anyhow::Context;
use clap::Parser;
use cxsim::table::DEFAULT_DATA_PATH;
use cxsim::{load_path, EngineConfig, SimilarityEngine, TableConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// CXSIM Query - Find Similar Users
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input table path
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    input: String,

    /// Target row index (0-based)
    #[arg(short, long, default_value_t = 0, conflicts_with = "target_id")]
    target: usize,

    /// Target identifier (first row carrying it)
    #[arg(long)]
    target_id: Option<String>,

    /// Inclusive similarity threshold
    #[arg(long, default_value_t = cxsim::engine::DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Scan worker threads (0 = auto-detect)
    #[arg(short, long, default_value_t = 1)]
    workers: usize,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,

    /// Token meaning "no observation"
    #[arg(long, default_value = "-1")]
    missing_token: String,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cxsim=info".parse()?))
        .init();

    let args = Args::parse();

    let table_config = TableConfig::default()
        .with_delimiter(args.delimiter)
        .with_missing_token(&args.missing_token)
        .with_path(&args.input);

    info!("Loading data from {}", table_config.path.display());
    let population = load_path(&table_config.path, &table_config)
        .with_context(|| format!("loading {}", table_config.path.display()))?;
    println!("File contains {} Service+Metrics", population.dimension());
    println!("Data loaded successfully. Sample Size = {}", population.len());

    let target = match &args.target_id {
        Some(id) => population
            .position(id)
            .with_context(|| format!("no user with id {}", id))?,
        None => args.target,
    };

    let engine_config = EngineConfig::default()
        .with_threshold(args.threshold)
        .with_workers(args.workers);
    let engine = SimilarityEngine::with_config(population, engine_config);

    let report = engine.scan_default(target)?;
    let target_id = &engine.population().entities()[report.target].id;

    println!(
        "The most similar user to {} is {} with a similarity score of {:.4}",
        target_id, report.best.id, report.best.score
    );
    println!("Top matches above threshold({:.2}):", report.threshold);
    for m in &report.matches {
        println!("{} ({:.4})", m.id, m.score);
    }

    info!("{}", engine.metrics().summary());
    Ok(())
}
