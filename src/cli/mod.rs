//! Command-line parsing for the bike-rental dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the dataset/chart code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::domain::{ChartKind, GroupingMode, InitialControls};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "bikedash", version, about = "Interactive bike-rental dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Launch the interactive terminal dashboard (default).
    Tui(ControlArgs),
    /// Render one chart for the given controls and print it.
    Render(RenderArgs),
    /// List selectable fields, chart options, months and seasons.
    Fields(DataArgs),
    /// Write the rows of the current selection to CSV.
    Export(ExportArgs),
    /// Generate a synthetic dataset in the expected schema.
    Sample(SampleArgs),
}

/// Data source options shared by every command that reads a dataset.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// Dataset CSV. Falls back to $BIKEDASH_DATA, then `datos_Con_date_Seasons.csv`.
    #[arg(short = 'f', long, value_name = "CSV")]
    pub data: Option<PathBuf>,

    /// Verbose logging (debug level unless RUST_LOG is set).
    #[arg(short = 'v', long)]
    pub verbose: bool,
}

/// Starting values for the six dashboard controls.
#[derive(Debug, Args, Clone)]
pub struct ControlArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// X-axis field (default: Hour).
    #[arg(short = 'x', long)]
    pub x: Option<String>,

    /// Y-axis field (only the response variable is accepted).
    #[arg(short = 'y', long)]
    pub y: Option<String>,

    /// Chart kind (default depends on the x field).
    #[arg(short = 'k', long, value_enum)]
    pub kind: Option<ChartKind>,

    /// Filter by month or by season.
    #[arg(short = 'g', long, value_enum)]
    pub group: Option<GroupingMode>,

    /// Month slider position (default: most recent month).
    #[arg(long)]
    pub month_index: Option<usize>,

    /// Season slider position (default: 0).
    #[arg(long)]
    pub season_index: Option<usize>,
}

impl ControlArgs {
    pub fn initial_controls(&self) -> InitialControls {
        InitialControls {
            x_field: self.x.clone(),
            y_field: self.y.clone(),
            chart_kind: self.kind,
            grouping: self.group,
            month_index: self.month_index,
            season_index: self.season_index,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Ascii,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub controls: ControlArgs,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Write the chart spec JSON to this file instead of stdout.
    #[arg(short = 'o', long, value_name = "JSON")]
    pub out: Option<PathBuf>,

    /// ASCII plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// ASCII plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub controls: ControlArgs,

    /// Destination CSV.
    #[arg(short = 'o', long, value_name = "CSV")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct SampleArgs {
    /// Destination CSV.
    #[arg(short = 'o', long, value_name = "CSV", default_value = "datos_Con_date_Seasons.csv")]
    pub out: PathBuf,

    /// First day of the generated period (DD/MM/YYYY).
    #[arg(long, default_value = "01/12/2017")]
    pub start: String,

    /// Number of days to generate (24 hourly rows per day).
    #[arg(long, default_value_t = 365)]
    pub days: u32,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Verbose logging.
    #[arg(short = 'v', long)]
    pub verbose: bool,
}
