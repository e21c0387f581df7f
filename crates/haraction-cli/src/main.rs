use anyhow::Result;
use clap::Parser;
use haraction_cli::commands::report::{self, ReportOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "haraction")]
#[command(author, version)]
#[command(
    about = "Turn a directory of HAR captures into a request timeline and an action report",
    long_about = "haraction flattens every entry of every HAR file into a tab-separated timeline \
                  with batch-relative timings, then matches user-defined action rules \
                  (first/last request regex patterns) against each file."
)]
struct Cli {
    /// Directory containing the HAR files
    #[arg(long, value_name = "DIR", default_value = "./har/")]
    har_dir: PathBuf,

    /// JSON file with the action rules
    #[arg(long, value_name = "FILE", default_value = "config.json")]
    rules: PathBuf,

    /// Output file for the request timeline
    #[arg(long, value_name = "FILE", default_value = "results.csv")]
    results: PathBuf,

    /// Output file for the detected actions
    #[arg(long, value_name = "FILE", default_value = "actions.csv")]
    actions: PathBuf,

    /// Only process files whose name matches this glob (e.g. "*.har")
    #[arg(long, value_name = "GLOB")]
    include: Option<String>,

    /// Process files sorted by name instead of directory-listing order
    #[arg(long)]
    sorted: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let options = ReportOptions {
        har_dir: cli.har_dir,
        rules: cli.rules,
        results: cli.results,
        actions: cli.actions,
        include: cli.include,
        sorted: cli.sorted,
    };

    report::execute(&options)
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("haraction=debug,haraction_cli=debug,haraction_core=debug")
    } else {
        EnvFilter::new("haraction=info,haraction_cli=info,haraction_core=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
