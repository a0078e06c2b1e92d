use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use std::process;
use subgrade_quantity::cli::{Args, setup_logging};
use subgrade_quantity::station::{format_station, stations_from_list};
use subgrade_quantity::{
    CsvReportSink, EngineConfig, QuantityReport, ReportSink, SectionSurvey, export_quantity,
};
use tracing::info;

fn main() {
    let args = Args::parse();
    setup_logging(&args);

    if let Err(error) = run(&args) {
        eprintln!("{} {:#}", "Error:".bright_red().bold(), error);
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let survey = SectionSurvey::from_json_file(&args.survey_path)
        .with_context(|| format!("Failed to load survey {}", args.survey_path.display()))?;

    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(digits) = args.digits {
        config = config.with_station_digits(digits);
    }

    let selection = args
        .stations
        .as_deref()
        .map(stations_from_list)
        .transpose()
        .context("Invalid station list")?;

    info!(
        "Loaded {} sections and {} curves",
        survey.sections.len(),
        survey.geometry.len()
    );

    let report = export_quantity(
        args.quantity,
        &config,
        &survey.sections,
        &survey.geometry,
        selection.as_deref(),
    )
    .with_context(|| format!("Failed to export {}", args.quantity))?;

    let mut sink = match &args.output {
        Some(path) => CsvReportSink::to_file(path),
        None => CsvReportSink::to_directory(args.default_output_dir()),
    };
    sink.write(&report).context("Failed to write report")?;

    if !args.quiet {
        print_summary(&report, &sink);
    }
    Ok(())
}

fn print_summary(report: &QuantityReport, sink: &CsvReportSink) {
    let stats = &report.stats;

    println!("\n{}", format!("{} Summary", report.sheet_name).bright_green().bold());
    println!(
        "  {} {}",
        "Stations:".bright_cyan(),
        stats.catalog_stations.to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Qualified:".bright_cyan(),
        stats.qualified.to_string().bright_white()
    );
    if stats.nulled_by_blocks + stats.truncated_by_blocks > 0 {
        println!(
            "  {} {} removed, {} truncated",
            "Block zones:".bright_cyan(),
            stats.nulled_by_blocks.to_string().bright_white(),
            stats.truncated_by_blocks.to_string().bright_white()
        );
    }
    if report.range_count() == 0 {
        println!("  {}", "No qualifying ranges".bright_yellow().bold());
    } else {
        println!(
            "  {} {}",
            "Report rows:".bright_cyan(),
            report.range_count().to_string().bright_white().bold()
        );
    }
    if !report.excluded.is_empty() {
        println!(
            "  {} {}",
            "Excluded stations:".bright_red(),
            report.excluded.len().to_string().bright_red().bold()
        );
        for excluded in &report.excluded {
            println!(
                "    {} {}",
                format_station(excluded.station, 3).bright_red(),
                excluded.reason
            );
        }
    }
    println!(
        "  {} {}",
        "Output:".bright_cyan(),
        sink.output_path(report).display().to_string().bright_white()
    );
}
