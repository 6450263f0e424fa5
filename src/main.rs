//! CLI entry point for cricstat.
//!
//! Loads a ball-by-ball match file and prints or writes per-over run rate,
//! wickets, phase breakdowns, chart descriptions and reports.

use anyhow::{Context, Result, anyhow, bail};
use clap::{Parser, Subcommand, ValueEnum};
use cricstat::Match;
use cricstat::output::{append_records, print_json, write_json, write_records_gz};
use cricstat::palette::PaletteTable;
use cricstat::players::rewrite_player_file;
use cricstat::report::over_rows;
use serde::Serialize;
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "cricstat")]
#[command(about = "Per-over analysis of ball-by-ball cricket match data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ChartKind {
    /// Score progression of both innings
    Score,
    /// Run rate per over with wicket markers
    RunRate,
    /// Score against delivery for one innings and phase
    ScoreVsDelivery,
}

#[derive(Subcommand)]
enum Commands {
    /// Run rate at the end of each completed over
    RunRate {
        /// Path or URL of the match CSV
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Restrict to Powerplay, Middle Overs or Death Overs
        #[arg(short, long)]
        phase: Option<String>,

        /// Write JSON here instead of logging it
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Wickets fallen in each completed over
    Wickets {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long)]
        output: Option<String>,
    },
    /// Runs, wickets and run rate per innings and phase
    Phases {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long)]
        output: Option<String>,
    },
    /// Build a chart description as JSON
    Chart {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long, value_enum, default_value_t = ChartKind::RunRate)]
        kind: ChartKind,

        /// Innings for score-vs-delivery ("1", "2", "Inning 1", "Inning 2")
        #[arg(short, long, default_value = "Inning 1")]
        innings: String,

        /// Phase for score-vs-delivery
        #[arg(short, long)]
        phase: Option<String>,

        /// Palette override JSON (defaults to $CRICSTAT_PALETTE)
        #[arg(long)]
        palette: Option<String>,

        #[arg(short, long)]
        output: Option<String>,
    },
    /// Append per-over rows to a CSV file
    Export {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// CSV file to append rows to
        #[arg(short, long, default_value = "overs.csv")]
        output: String,

        /// Write a fresh gzip-compressed CSV instead of appending
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Full match report as JSON
    Report {
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        #[arg(short, long)]
        output: Option<String>,
    },
    /// Show the colour palette of a team
    Palette {
        /// Team identifier, e.g. CSK
        team: String,

        #[arg(long)]
        palette: Option<String>,
    },
    /// Rewrite a player reference table into match-file column names
    Players {
        input: String,
        output: String,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/cricstat.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("cricstat.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::RunRate {
            source,
            phase,
            output,
        } => {
            let session = open_match(&source)?;
            let rates = session
                .run_rate(phase.as_deref())
                .ok_or_else(|| anyhow!("no run-rate series for {source}"))?;
            emit(output.as_deref(), &rates)?;
        }
        Commands::Wickets { source, output } => {
            let session = open_match(&source)?;
            let wickets = session
                .wickets()
                .ok_or_else(|| anyhow!("no wicket series for {source}"))?;
            emit(output.as_deref(), &wickets)?;
        }
        Commands::Phases { source, output } => {
            let session = open_match(&source)?;
            let phases = session
                .phase_breakdown()
                .ok_or_else(|| anyhow!("no phase breakdown for {source}"))?;
            for p in &phases {
                info!(
                    innings = p.innings,
                    phase = %p.phase,
                    runs = p.runs,
                    wickets = p.wickets,
                    run_rate = p.run_rate,
                    "Phase"
                );
            }
            emit(output.as_deref(), &phases)?;
        }
        Commands::Chart {
            source,
            kind,
            innings,
            phase,
            palette,
            output,
        } => {
            let palette = load_palette(palette.as_deref())?;
            let session = open_match(&source)?;
            let figure = match kind {
                ChartKind::Score => session.score_progression_figure(&palette),
                ChartKind::RunRate => session.run_rate_figure(&palette),
                ChartKind::ScoreVsDelivery => {
                    session.score_vs_delivery_figure(&innings, phase.as_deref(), &palette)
                }
            }
            .ok_or_else(|| anyhow!("chart could not be built for {source}"))?;
            emit(output.as_deref(), &figure)?;
        }
        Commands::Export {
            source,
            output,
            gzip,
        } => {
            let session = open_match(&source)?;
            let table = session
                .table()
                .ok_or_else(|| anyhow!("no delivery table for {source}"))?;
            let rows = over_rows(&source, table);
            if gzip {
                write_records_gz(&output, &rows)?;
            } else {
                append_records(&output, &rows)?;
            }
            info!(output = %output, rows = rows.len(), gzip, "Per-over rows exported");
        }
        Commands::Report { source, output } => {
            let session = open_match(&source)?;
            let report = session
                .report()
                .ok_or_else(|| anyhow!("no report for {source}"))?;
            emit(output.as_deref(), &report)?;
        }
        Commands::Palette { team, palette } => {
            let table = load_palette(palette.as_deref())?;
            let colours = table.get(&team)?;
            info!(
                team = %team,
                primary = ?colours.primary,
                secondary = ?colours.secondary,
                "Palette"
            );
        }
        Commands::Players { input, output } => {
            rewrite_player_file(&input, &output)?;
        }
    }

    Ok(())
}

/// Loads and normalises a match, failing if the source could not be read.
#[tracing::instrument]
fn open_match(source: &str) -> Result<Match> {
    let session = Match::open(source);
    if !session.is_loaded() {
        bail!("match source {source} could not be loaded");
    }
    Ok(session)
}

/// Palette overrides from `--palette`, then `$CRICSTAT_PALETTE`, else the built-in table.
fn load_palette(path: Option<&str>) -> Result<PaletteTable> {
    let path = path
        .map(str::to_string)
        .or_else(|| std::env::var("CRICSTAT_PALETTE").ok());

    match path {
        Some(path) => PaletteTable::load(&path)
            .with_context(|| format!("Failed to load palette overrides from {path}")),
        None => Ok(PaletteTable::builtin()),
    }
}

fn emit(output: Option<&str>, value: &impl Serialize) -> Result<()> {
    match output {
        Some(path) => {
            write_json(path, value)?;
            info!(path, "Output written");
            Ok(())
        }
        None => print_json(value),
    }
}
