use anyhow::{Context, Result};
use haraction_core::actions::RuleSet;
use haraction_core::export::export_table;
use haraction_core::{Batch, Record, discover_captures};
use std::path::PathBuf;

/// Inputs and outputs of one report run
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub har_dir: PathBuf,
    pub rules: PathBuf,
    pub results: PathBuf,
    pub actions: PathBuf,
    pub include: Option<String>,
    pub sorted: bool,
}

/// Counts from a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportSummary {
    pub files: usize,
    pub entries: usize,
    pub actions: usize,
}

/// Build both reports and return what was written
pub fn generate(options: &ReportOptions) -> Result<ReportSummary> {
    tracing::info!("Start");

    let rules = RuleSet::from_file(&options.rules)
        .with_context(|| format!("Failed to load rules from {}", options.rules.display()))?;

    let mut paths = discover_captures(&options.har_dir, options.include.as_deref())
        .with_context(|| format!("Failed to list {}", options.har_dir.display()))?;
    if options.sorted {
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }

    let batch = Batch::load(&paths)?.normalized()?;

    tracing::info!("Export");
    let entries = export_table(&options.results, &batch.timeline())
        .with_context(|| format!("Failed to write {}", options.results.display()))?;

    tracing::info!("Retrieve actions");
    let actions: Vec<Record> = batch
        .detect_actions(&rules)?
        .iter()
        .map(|action| action.to_record())
        .collect();
    let action_rows = export_table(&options.actions, &actions)
        .with_context(|| format!("Failed to write {}", options.actions.display()))?;

    tracing::info!("End");

    Ok(ReportSummary {
        files: batch.captures().len(),
        entries,
        actions: action_rows,
    })
}

pub fn execute(options: &ReportOptions) -> Result<()> {
    let summary = generate(options)?;
    print_summary(options, &summary);
    Ok(())
}

fn print_summary(options: &ReportOptions, summary: &ReportSummary) {
    use console::style;

    println!("\n{}", style("HAR Action Report").bold().cyan());
    println!("{}", style("=================").cyan());
    println!("  Files Processed:  {}", summary.files);
    println!(
        "  Entries:          {} -> {}",
        summary.entries,
        options.results.display()
    );
    println!(
        "  Actions:          {} -> {}",
        summary.actions,
        options.actions.display()
    );
    println!();
}
