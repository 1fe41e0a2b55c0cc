//! Command-line front end: load a CSV dataset, search, print the top rules.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use itrsearch::{
    CsvOptions, DatasetProvider, KernelKind, SearchConfig, SearchEngine, Verbosity, data::load_csv,
};

#[derive(Parser)]
#[command(name = "itrsearch")]
#[command(about = "Exhaustive search for individualized treatment rules", long_about = None)]
struct Cli {
    /// CSV file with an id column and cont_/ord_/nom_/act_/resp_ columns
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Number of covariates per rule (1, 2 or 3)
    #[arg(short, long, default_value_t = 2)]
    depth: usize,

    /// Worker threads (default: all cores; clamped to the hardware)
    #[arg(short = 't', long)]
    threads: Option<NonZeroUsize>,

    /// Number of rules to print
    #[arg(short = 'n', long, default_value_t = 10)]
    top: usize,

    /// Which act_ column to use, by position
    #[arg(long, default_value_t = 0)]
    action_column: usize,

    /// Which resp_ column to use, by position
    #[arg(long, default_value_t = 0)]
    response_column: usize,

    /// Field delimiter
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Scoring kernel: packed or reference
    #[arg(short, long, default_value = "packed")]
    kernel: KernelKind,

    /// Increase log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let verbosity = Verbosity::from_count(cli.verbose);

    env_logger::Builder::from_default_env()
        .filter_level(verbosity.level_filter())
        .init();

    let options = CsvOptions {
        delimiter: cli.delimiter,
        action_column: cli.action_column,
        response_column: cli.response_column,
    };
    let dataset = load_csv(&cli.input, &options)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    log::info!(
        "loaded {} samples, {} covariates from {}",
        dataset.n_samples(),
        dataset.n_vars(),
        cli.input.display()
    );

    let config = SearchConfig::builder()
        .depth(cli.depth)
        .maybe_n_threads(cli.threads)
        .top_k(cli.top)
        .kernel(cli.kernel)
        .verbosity(verbosity)
        .build()?;

    let mut engine = SearchEngine::new(&dataset, &config)?;
    engine.run()?;
    print!("{}", engine.report_top()?);

    Ok(())
}
