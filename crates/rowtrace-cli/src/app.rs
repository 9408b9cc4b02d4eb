//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rowtrace_index::{
    BuildReport, CacheManager, EnrichedMatch, Settings, SheetOutcome, SourceOutcome,
};

/// Output format for command results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "rowtrace")]
#[command(author, version, about = "Find records by key across spreadsheet collections", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Data root directory (overrides the config file)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find every record with the given key
    Lookup {
        /// Primary key value
        key: String,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Records for a key grouped by date, file and sheet (JSON)
    Timeline {
        /// Primary key value
        key: String,
    },

    /// Summarize which files and sheets were indexed
    Stats {
        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = load_settings(cli.config.as_deref(), cli.root.as_deref())?;
    let manager = CacheManager::new(settings);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Lookup { key, format } => lookup_command(&manager, &key, format, &mut out)?,
        Commands::Timeline { key } => timeline_command(&manager, &key, &mut out)?,
        Commands::Stats { format } => stats_command(&manager, format, &mut out)?,
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` wins over `-v`
pub fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // A subscriber may already be installed (tests, embedding)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

/// Load settings from a config file or use defaults
///
/// Without an explicit path, `rowtrace.toml` and `.rowtrace.toml` in the
/// working directory are tried in turn.
pub fn load_settings(config_path: Option<&Path>, root: Option<&Path>) -> Result<Settings> {
    let settings = match config_path {
        Some(path) => Settings::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => find_default_settings()?,
    };

    Ok(match root {
        Some(root) => settings.with_root(root),
        None => settings,
    })
}

fn find_default_settings() -> Result<Settings> {
    let candidates = ["rowtrace.toml", ".rowtrace.toml"];
    for candidate in candidates {
        if Path::new(candidate).exists() {
            return Settings::load(candidate)
                .with_context(|| format!("Failed to load config: {}", candidate));
        }
    }
    Ok(Settings::default())
}

/// Execute the lookup command
pub fn lookup_command(
    manager: &CacheManager,
    key: &str,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let matches = manager.lookup(key);

    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &matches)
                .context("Failed to serialize matches")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if matches.is_empty() {
                writeln!(out, "No records found for {}", key)?;
            } else {
                writeln!(out, "{} record(s) for {}", matches.len(), key)?;
                for m in &matches {
                    write_match(out, m)?;
                }
            }
            write_failure_note(out, &manager.report())?;
        }
    }

    Ok(())
}

/// Execute the timeline command
pub fn timeline_command(manager: &CacheManager, key: &str, out: &mut dyn Write) -> Result<()> {
    let timeline = manager.timeline(key);
    serde_json::to_writer_pretty(&mut *out, &timeline).context("Failed to serialize timeline")?;
    writeln!(out)?;
    Ok(())
}

/// Execute the stats command
pub fn stats_command(
    manager: &CacheManager,
    format: OutputFormat,
    out: &mut dyn Write,
) -> Result<()> {
    let report = manager.report();

    match format {
        OutputFormat::Json => {
            let json = serde_json::json!({
                "root": manager.settings().data.root.display().to_string(),
                "summary": report.summary(),
                "sources": report.sources,
            });
            serde_json::to_writer_pretty(&mut *out, &json).context("Failed to serialize report")?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let summary = report.summary();
            writeln!(out, "Data root: {}", manager.settings().data.root.display())?;
            writeln!(
                out,
                "Files: {} found, {} skipped",
                summary.sources_found, summary.sources_skipped
            )?;
            writeln!(
                out,
                "Sheets: {} indexed, {} without key column, {} skipped",
                summary.sheets_indexed, summary.sheets_unindexed, summary.sheets_skipped
            )?;
            writeln!(out, "Records indexed: {}", summary.records_indexed)?;

            for source in &report.sources {
                if let SourceOutcome::Skipped { reason } = &source.outcome {
                    writeln!(out, "  skipped file {}: {}", source.path, reason)?;
                }
                for sheet in &source.sheets {
                    if let SheetOutcome::Skipped { reason } = &sheet.outcome {
                        writeln!(
                            out,
                            "  skipped sheet {} / {}: {}",
                            source.path, sheet.name, reason
                        )?;
                    }
                }
            }
        }
    }

    Ok(())
}

fn write_match(out: &mut dyn Write, m: &EnrichedMatch) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "[{}] {} / {}", m.parsed_date, m.file_name, m.sheet_name)?;
    for (column, value) in &m.fields {
        writeln!(out, "  {}: {}", column, value)?;
    }
    Ok(())
}

/// Mention unreadable sources so "not found" is not taken at face value
fn write_failure_note(out: &mut dyn Write, report: &BuildReport) -> io::Result<()> {
    if !report.has_failures() {
        return Ok(());
    }
    let summary = report.summary();
    writeln!(out)?;
    writeln!(
        out,
        "note: {} file(s) and {} sheet(s) could not be read; run `rowtrace stats` for details",
        summary.sources_skipped, summary.sheets_skipped
    )
}
