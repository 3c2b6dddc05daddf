//! Lifespan CLI Application
//!
//! This is the command-line interface for the lifespan sweep library.
//! It uses lifespan-sweep and adds:
//! - CSV ingestion of one or more files (merged in order)
//! - Per-file roster listing
//! - TOML configuration
//! - Report generation (TXT/JSON)

use anyhow::{Context, Result};
use clap::Parser;
use lifespan_sweep::{
    EventBuilder, OverlapSweeper, PersonRecord, SweepError, SweepResult, ValidationPolicy,
};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod config;
mod ingest;
mod report;

use config::{AppConfig, OutputFormat};
use ingest::SourceFile;
use report::{SourceSummary, TextReport};

/// Lifespan sweep - find the years with the most people alive
#[derive(Parser, Debug)]
#[command(name = "lifespan-cli")]
#[command(about = "Find the years in which the most people were alive at once", long_about = None)]
#[command(version)]
struct Args {
    /// CSV files with `name,birth[,death]` lines (merged in order)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Path to configuration file (config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file for the report (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Reject records with years outside the expected window or deaths before births
    #[arg(long)]
    strict: bool,

    /// Treat years 0-99 as 1900-1999
    #[arg(long)]
    two_digit_years: bool,

    /// Accept any year without checking the expected window
    #[arg(long)]
    any_year: bool,

    /// Do not list the people read from each file
    #[arg(long)]
    no_roster: bool,

    /// Verbosity level (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    init_logging(args.verbose, args.quiet);

    log::info!("Lifespan CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using sweep library v{}", lifespan_sweep::VERSION);

    let config = resolve_config(&args)?;
    if config.input.files.is_empty() {
        println!("Lifespan - No input specified");
        println!("\nQuick Start:");
        println!("  lifespan-cli people.csv");
        println!("  lifespan-cli first.csv second.csv --format json");
        println!("\nWith a configuration file:");
        println!("  lifespan-cli --config config.toml");
        println!("\nUse --help for more options");
        return Ok(ExitCode::SUCCESS);
    }

    run(&config)
}

/// Merge the config file (if any) with command-line overrides
fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading configuration from: {:?}", path);
            config::load_config(path)?
        }
        None => AppConfig::default(),
    };

    if !args.files.is_empty() {
        config.input.files = args.files.clone();
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if args.output.is_some() {
        config.output.output_file = args.output.clone();
    }
    if args.strict {
        config.validation.policy = ValidationPolicy::Strict;
    }
    if args.two_digit_years {
        config.validation.two_digit_years = true;
    }
    if args.any_year {
        config.validation.check_years = false;
    }
    if args.no_roster {
        config.output.show_roster = false;
    }

    log::debug!("Effective configuration: {:?}", config);
    Ok(config)
}

/// Read all inputs, sweep, and write the report
fn run(config: &AppConfig) -> Result<ExitCode> {
    let builder = EventBuilder::with_config(config.validation.to_sweep_config());
    let sources = ingest::read_sources(&config.input.files)?;
    let summaries: Vec<SourceSummary> = sources
        .iter()
        .map(|source| summarize(source, &builder))
        .collect();

    let people: Vec<PersonRecord> = summaries
        .iter()
        .flat_map(|summary| summary.people.iter().cloned())
        .collect();
    log::info!("{} people read from {} file(s)", people.len(), summaries.len());

    let outcome = sweep_people(&builder, &people);
    let mut text = TextReport::new();
    if config.output.format == OutputFormat::Txt {
        for summary in &summaries {
            text.roster(summary, config.output.show_roster);
        }
    }

    let (rendered, code) = match outcome {
        Ok(result) => {
            let rendered = match config.output.format {
                OutputFormat::Txt => {
                    text.result(&result);
                    text.into_string()
                }
                OutputFormat::Json => report::render_json(&summaries, &result)
                    .context("Failed to serialize report")?,
            };
            (rendered, ExitCode::SUCCESS)
        }
        Err(SweepError::NoData) | Err(SweepError::EmptyInput) => {
            log::error!("No usable records in any input file");
            match config.output.format {
                OutputFormat::Txt => {
                    text.line(0, report::NO_DATA_MESSAGE);
                    (text.into_string(), ExitCode::FAILURE)
                }
                OutputFormat::Json => {
                    eprintln!("{}", report::NO_DATA_MESSAGE);
                    (String::new(), ExitCode::FAILURE)
                }
            }
        }
        Err(e) => return Err(e.into()),
    };

    write_output(config, &rendered)?;
    Ok(code)
}

/// Validate the rows of one file, keeping the people that pass
fn summarize(source: &SourceFile, builder: &EventBuilder) -> SourceSummary {
    let mut people = Vec::new();
    let mut rejected = source.skipped.len();

    for row in &source.rows {
        match builder.parse_row(row) {
            Ok(person) => people.push(person),
            Err(e) => {
                log::warn!("{:?}: {}", source.path, e);
                rejected += 1;
            }
        }
    }

    if people.is_empty() {
        log::warn!("No properly-formatted names and dates found in {:?}", source.path);
    }

    SourceSummary {
        path: source.path.clone(),
        people,
        rejected,
    }
}

/// Sweep people that `summarize` already validated
fn sweep_people(
    builder: &EventBuilder,
    people: &[PersonRecord],
) -> lifespan_sweep::Result<SweepResult> {
    let events = builder.build_validated(people)?;
    OverlapSweeper::new().sweep(&events)
}

fn write_output(config: &AppConfig, rendered: &str) -> Result<()> {
    if rendered.is_empty() {
        return Ok(());
    }

    match &config.output.output_file {
        Some(path) => {
            fs::write(path, rendered)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                writeln!(stdout)?;
            }
        }
    }
    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifespan_sweep::{RawRecord, SweepConfig, YearRange};

    fn source(rows: Vec<RawRecord>) -> SourceFile {
        SourceFile {
            path: PathBuf::from("people.csv"),
            rows,
            skipped: Vec::new(),
        }
    }

    #[test]
    fn test_summarize_skips_bad_rows() {
        let builder = EventBuilder::new();
        let summary = summarize(
            &source(vec![
                RawRecord::new(1, "Ada", "1915", Some("1952".to_string())),
                RawRecord::new(2, "", "1920", None),
                RawRecord::new(3, "Bob", "abc", None),
            ]),
            &builder,
        );
        assert_eq!(summary.people, vec![PersonRecord::new("Ada", 1915, 1952)]);
        assert_eq!(summary.rejected, 2);
    }

    #[test]
    fn test_strict_summary_drops_inverted() {
        let config = SweepConfig::new().with_policy(ValidationPolicy::Strict);
        let builder = EventBuilder::with_config(config);
        let summary = summarize(
            &source(vec![RawRecord::new(1, "Odd", "1990", Some("1980".to_string()))]),
            &builder,
        );
        assert!(summary.people.is_empty());
    }

    #[test]
    fn test_sweep_people_merges_files() {
        let builder = EventBuilder::new();
        let people = vec![PersonRecord::new("A", 1920, 1925), PersonRecord::new("B", 1925, 1930)];
        let result = sweep_people(&builder, &people).unwrap();
        assert_eq!(result.max_alive, 2);
        assert_eq!(result.ranges, vec![YearRange::Bounded { start: 1925, end: 1925 }]);
        assert_eq!(sweep_people(&builder, &[]), Err(SweepError::NoData));
    }

    #[test]
    fn test_sweep_people_does_not_check_again() {
        // Old passed a lenient summarize; a strict re-check would drop them
        let config = SweepConfig::new().with_policy(ValidationPolicy::Strict);
        let builder = EventBuilder::with_config(config);
        let people = vec![PersonRecord::new("Old", 1850, 1930), PersonRecord::alive("New", 1920)];
        let result = sweep_people(&builder, &people).unwrap();
        assert_eq!(result.max_alive, 2);
        assert_eq!(result.ranges, vec![YearRange::Bounded { start: 1920, end: 1930 }]);
    }

    fn write_inputs(dir: &std::path::Path, files: &[(&str, &[u8])]) -> Vec<PathBuf> {
        files
            .iter()
            .map(|(name, content)| {
                let path = dir.join(name);
                fs::write(&path, content).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_run_keeps_going_past_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.txt");
        let inputs = write_inputs(
            dir.path(),
            &[
                ("junk.csv", &b"garbage\n"[..]),
                ("good.csv", &b"A,1950,1980\nB,1960,1990\n"[..]),
                ("latin1.csv", &b"Jos\xe9,1955,1970\n"[..]),
            ],
        );

        let mut config = AppConfig::default();
        config.input.files = inputs.clone();
        config.output.output_file = Some(output.clone());

        let code = run(&config).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let text = fs::read_to_string(&output).unwrap();
        let junk_section = format!(
            "Data from: {}\n\t{}\n\n",
            inputs[0].display(),
            report::EMPTY_FILE_MESSAGE
        );
        assert!(text.starts_with(&junk_section));
        assert!(text.contains("\tB (1960 - 1990)\n"));
        assert!(text.contains("\tJos\u{fffd} (1955 - 1970)\n"));
        assert!(text.ends_with(
            "Most number of people alive at the same time was 3 between the years of 1960 and 1970.\n"
        ));
    }

    #[test]
    fn test_run_without_roster() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.txt");
        let inputs =
            write_inputs(dir.path(), &[("people.csv", &b"A,1920,1925\nB,1925,1930\n"[..])]);

        let mut config = AppConfig::default();
        config.input.files = inputs.clone();
        config.output.output_file = Some(output.clone());
        config.output.show_roster = false;

        assert_eq!(run(&config).unwrap(), ExitCode::SUCCESS);

        let text = fs::read_to_string(&output).unwrap();
        assert_eq!(
            text,
            format!(
                "Data from: {}\n\n\
                 Most number of people alive at the same time was 2 in the year 1925.\n",
                inputs[0].display()
            )
        );
    }

    #[test]
    fn test_run_json_without_data_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let inputs = write_inputs(dir.path(), &[("junk.csv", &b"no,such,years\n"[..])]);

        let mut config = AppConfig::default();
        config.input.files = inputs;
        config.output.output_file = Some(output.clone());
        config.output.format = OutputFormat::Json;

        assert_eq!(run(&config).unwrap(), ExitCode::FAILURE);
        assert!(!output.exists());
    }

    #[test]
    fn test_run_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("report.json");
        let inputs = write_inputs(dir.path(), &[("people.csv", &b"C,1975\n"[..])]);

        let mut config = AppConfig::default();
        config.input.files = inputs;
        config.output.output_file = Some(output.clone());
        config.output.format = OutputFormat::Json;

        assert_eq!(run(&config).unwrap(), ExitCode::SUCCESS);

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["result"]["max_alive"], 1);
        assert_eq!(value["result"]["ranges"][0]["start"], 1975);
        assert_eq!(value["result"]["ranges"][0]["end"], serde_json::Value::Null);
    }

    #[test]
    fn test_run_writes_text_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("people.csv");
        let output = dir.path().join("report.txt");
        fs::write(&input, "A,1950,1980\nB,1960,1990\n").unwrap();

        let mut config = AppConfig::default();
        config.input.files = vec![input.clone()];
        config.output.output_file = Some(output.clone());

        let code = run(&config).unwrap();
        assert_eq!(code, ExitCode::SUCCESS);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.starts_with(&format!("Data from: {}\n", input.display())));
        assert!(text.contains("\tA (1950 - 1980)\n"));
        assert!(text.ends_with(
            "Most number of people alive at the same time was 2 between the years of 1960 and 1980.\n"
        ));
    }

    #[test]
    fn test_run_reports_no_data() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("junk.csv");
        let output = dir.path().join("report.txt");
        fs::write(&input, "nothing useful here\n,1950\n").unwrap();

        let mut config = AppConfig::default();
        config.input.files = vec![input];
        config.output.output_file = Some(output.clone());

        let code = run(&config).unwrap();
        assert_eq!(code, ExitCode::FAILURE);

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains(report::EMPTY_FILE_MESSAGE));
        assert!(text.ends_with(&format!("{}\n", report::NO_DATA_MESSAGE)));
    }

    #[test]
    fn test_args_override_config() {
        let args = Args::parse_from([
            "lifespan-cli",
            "a.csv",
            "--strict",
            "--format",
            "json",
            "--any-year",
        ]);
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.input.files, vec![PathBuf::from("a.csv")]);
        assert_eq!(config.validation.policy, ValidationPolicy::Strict);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(!config.validation.check_years);
    }
}
