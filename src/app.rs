//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and sets up logging
//! - resolves and loads the dataset
//! - drives the controller for the TUI or a one-shot render
//! - writes optional exports

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::NaiveDate;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, ControlArgs, DataArgs, ExportArgs, OutputFormat, RenderArgs, SampleArgs};
use crate::data::{Dataset, SampleConfig, generate_sample, write_sample_csv};
use crate::domain::DashConfig;
use crate::error::AppError;
use crate::io::ingest::{DATE_FORMAT, load_dataset};

pub mod controller;
pub mod pipeline;

/// Dataset used when neither `--data` nor `BIKEDASH_DATA` is given.
pub const DEFAULT_DATA_FILE: &str = "datos_Con_date_Seasons.csv";
pub const DATA_ENV_VAR: &str = "BIKEDASH_DATA";
/// Log destination while the TUI owns the terminal.
const TUI_LOG_FILE: &str = "bikedash.log";

/// Entry point for the `bikedash` binary.
pub fn run() -> Result<(), AppError> {
    // `bikedash` and `bikedash -x Holiday` behave like `bikedash tui ...`.
    //
    // Clap requires a subcommand name, so argv is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    // A missing .env is fine.
    dotenvy::dotenv().ok();

    match cli.command {
        Command::Tui(args) => handle_tui(args),
        Command::Render(args) => handle_render(args),
        Command::Fields(args) => handle_fields(args),
        Command::Export(args) => handle_export(args),
        Command::Sample(args) => handle_sample(args),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LogTarget {
    Stderr,
    File,
}

/// `RUST_LOG` wins; otherwise `info`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool, target: LogTarget) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .try_init();
        }
        LogTarget::File => {
            // Without a log file the TUI simply runs unlogged.
            if let Ok(file) = File::create(TUI_LOG_FILE) {
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .try_init();
            }
        }
    }
}

fn handle_tui(args: ControlArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args, true)?;
    init_tracing(config.verbose, LogTarget::File);
    let dataset = load(&config.data_path)?;
    crate::tui::run(&dataset, &config.controls)
}

fn handle_render(args: RenderArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.controls, false)?;
    init_tracing(config.verbose, LogTarget::Stderr);
    let dataset = load(&config.data_path)?;
    let controller = controller::Controller::with_controls(&dataset, &config.controls)?;
    let chart = controller.chart();

    match args.format {
        OutputFormat::Json => match &args.out {
            Some(path) => crate::io::export::write_chart_json(path, chart)?,
            None => println!("{}", crate::io::export::chart_json(chart)?),
        },
        OutputFormat::Ascii => {
            println!("{}", crate::report::format_controls(&controller));
            println!("{}", crate::plot::ascii::render_ascii_chart(chart, args.width, args.height));
            if let Some(path) = &args.out {
                crate::io::export::write_chart_json(path, chart)?;
            }
        }
    }
    Ok(())
}

fn handle_fields(args: DataArgs) -> Result<(), AppError> {
    init_tracing(args.verbose, LogTarget::Stderr);
    let path = resolve_data_path(args.data.as_deref(), false)?;
    let dataset = load(&path)?;
    println!("{}", crate::report::format_dataset_summary(&dataset));
    Ok(())
}

fn handle_export(args: ExportArgs) -> Result<(), AppError> {
    let config = dash_config_from_args(&args.controls, false)?;
    init_tracing(config.verbose, LogTarget::Stderr);
    let dataset = load(&config.data_path)?;
    let controller = controller::Controller::with_controls(&dataset, &config.controls)?;

    let out = pipeline::run_render(&dataset, controller.state())?;
    crate::io::export::export_view_csv(&args.out, &out.view)?;
    println!("Wrote {} rows ({}) to {}", out.view.len(), out.view.label(), args.out.display());
    Ok(())
}

fn handle_sample(args: SampleArgs) -> Result<(), AppError> {
    init_tracing(args.verbose, LogTarget::Stderr);
    let start = NaiveDate::parse_from_str(args.start.trim(), DATE_FORMAT)
        .map_err(|e| AppError::new(2, format!("Invalid --start '{}' (expected DD/MM/YYYY): {e}", args.start)))?;
    let config = SampleConfig {
        start,
        days: args.days,
        seed: args.seed,
    };
    let rows = generate_sample(&config)?;
    write_sample_csv(&args.out, &rows)?;
    println!("Wrote {} rows to {}", rows.len(), args.out.display());
    Ok(())
}

fn load(path: &Path) -> Result<Dataset, AppError> {
    let dataset = load_dataset(path)?;
    info!(
        rows = dataset.len(),
        months = dataset.month_keys().len(),
        seasons = dataset.season_labels().len(),
        "dataset ready"
    );
    Ok(dataset)
}

pub fn dash_config_from_args(args: &ControlArgs, interactive: bool) -> Result<DashConfig, AppError> {
    Ok(DashConfig {
        data_path: resolve_data_path(args.data.data.as_deref(), interactive)?,
        controls: args.initial_controls(),
        verbose: args.data.verbose,
    })
}

/// `--data`, then `$BIKEDASH_DATA`, then the default file name.
///
/// When none of those exists and the session is interactive, the user is
/// offered the CSV files found under the current directory.
fn resolve_data_path(flag: Option<&Path>, interactive: bool) -> Result<PathBuf, AppError> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(DATA_ENV_VAR).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let default = PathBuf::from(DEFAULT_DATA_FILE);
    if default.is_file() || !interactive {
        return Ok(default);
    }
    crate::cli::picker::prompt_for_dataset()
}

/// Rewrite argv so `bikedash` defaults to `bikedash tui`.
///
/// Rules:
/// - `bikedash`                      -> `bikedash tui`
/// - `bikedash -x Holiday ...`       -> `bikedash tui -x Holiday ...`
/// - `bikedash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "tui" | "render" | "fields" | "export" | "sample");
    if is_subcommand {
        return argv;
    }

    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_tui() {
        assert_eq!(rewrite_args(argv(&["bikedash"])), argv(&["bikedash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["bikedash", "-x", "Holiday"])),
            argv(&["bikedash", "tui", "-x", "Holiday"])
        );
    }

    #[test]
    fn subcommands_and_help_pass_through() {
        assert_eq!(rewrite_args(argv(&["bikedash", "render"])), argv(&["bikedash", "render"]));
        assert_eq!(rewrite_args(argv(&["bikedash", "--help"])), argv(&["bikedash", "--help"]));
    }

    #[test]
    fn explicit_data_flag_wins() {
        let path = resolve_data_path(Some(Path::new("mine.csv")), false).unwrap();
        assert_eq!(path, PathBuf::from("mine.csv"));
    }

    #[test]
    fn control_flags_parse_into_config() {
        let cli = crate::cli::Cli::parse_from(argv(&[
            "bikedash", "render", "-f", "d.csv", "-x", "Holiday", "-k", "pie", "-g", "season", "--season-index", "1",
        ]));
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        let config = dash_config_from_args(&args.controls, false).unwrap();
        assert_eq!(config.data_path, PathBuf::from("d.csv"));
        assert_eq!(config.controls.x_field.as_deref(), Some("Holiday"));
        assert_eq!(config.controls.chart_kind, Some(crate::domain::ChartKind::Pie));
        assert_eq!(config.controls.season_index, Some(1));
        assert!(!config.verbose);
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[test]
    fn verbose_flag_reaches_config() {
        let cli = crate::cli::Cli::parse_from(argv(&["bikedash", "export", "-f", "d.csv", "-v", "-o", "out.csv"]));
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert!(dash_config_from_args(&args.controls, false).unwrap().verbose);
    }
}
