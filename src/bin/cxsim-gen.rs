//! CXSIM Generator Binary
//!
//! Writes a synthetic user behavior table for the query tool.

use clap::Parser;
use cxsim::table::{self, TableConfig, DEFAULT_DATA_PATH};
use cxsim::{Generator, GeneratorConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// CXSIM Generator - Synthetic User Behavior Vectors
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Output table path
    #[arg(short, long, default_value = DEFAULT_DATA_PATH)]
    output: String,

    /// Number of users
    #[arg(short, long, default_value_t = 1000)]
    users: usize,

    /// Number of services per user
    #[arg(short, long, default_value_t = 100)]
    services: usize,

    /// RNG seed (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Probability of writing an observation as missing
    #[arg(long, default_value_t = 0.0)]
    missing_rate: f64,

    /// Field delimiter
    #[arg(short, long, default_value_t = ',')]
    delimiter: char,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("cxsim=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = GeneratorConfig::default()
        .with_users(args.users)
        .with_services(args.services)
        .with_missing_rate(args.missing_rate);
    config.seed = args.seed;

    let table_config = TableConfig::default()
        .with_delimiter(args.delimiter)
        .with_path(&args.output);

    info!("Generating user behavior vectors with service metrics...");
    let population = Generator::new(config)?.generate()?;
    table::save_path(&population, &table_config, &table_config.path)?;

    println!(
        "Data generation complete. File saved at {}",
        table_config.path.display()
    );
    Ok(())
}
