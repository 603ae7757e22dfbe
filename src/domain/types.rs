//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between the controller, resolver and renderer
//! - exported to JSON (chart specs, debug bundles)
//! - parsed straight from CLI flags

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Visualization type for the main chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Heatmap,
    Bar,
    Pie,
    Box,
    Histogram,
}

impl ChartKind {
    pub const ALL: [ChartKind; 6] = [
        ChartKind::Scatter,
        ChartKind::Heatmap,
        ChartKind::Bar,
        ChartKind::Pie,
        ChartKind::Box,
        ChartKind::Histogram,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Heatmap => "heatmap",
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Box => "box",
            ChartKind::Histogram => "histogram",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Heatmap => "Heatmap",
            ChartKind::Bar => "Bar Plot",
            ChartKind::Pie => "Pie Chart",
            ChartKind::Box => "Box Plot",
            ChartKind::Histogram => "Histogram",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which slider drives the row filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    #[default]
    Month,
    Season,
}

impl GroupingMode {
    pub fn toggle(self) -> Self {
        match self {
            GroupingMode::Month => GroupingMode::Season,
            GroupingMode::Season => GroupingMode::Month,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            GroupingMode::Month => "Group by Month",
            GroupingMode::Season => "Group by Season",
        }
    }
}

/// Declared type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Numeric,
    Categorical,
}

/// A calendar month period (`YYYY-MM`). Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The active row filter, resolved from the grouping mode and its slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", content = "index", rename_all = "lowercase")]
pub enum Selection {
    Month(usize),
    Season(usize),
}

/// Current value of every dashboard control.
///
/// Both slider indices are always stored; `selection()` picks the one the
/// grouping mode makes active, so flipping the mode back restores the previous
/// position of the other slider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlState {
    pub x_field: String,
    pub y_field: String,
    pub chart_kind: ChartKind,
    pub grouping: GroupingMode,
    pub month_index: usize,
    pub season_index: usize,
}

impl ControlState {
    pub fn selection(&self) -> Selection {
        match self.grouping {
            GroupingMode::Month => Selection::Month(self.month_index),
            GroupingMode::Season => Selection::Season(self.season_index),
        }
    }
}

/// Which slider is currently shown/enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderVisibility {
    pub month: bool,
    pub season: bool,
}

impl SliderVisibility {
    pub fn for_mode(mode: GroupingMode) -> Self {
        Self {
            month: mode == GroupingMode::Month,
            season: mode == GroupingMode::Season,
        }
    }
}

/// Optional starting values for the controls (from CLI flags).
///
/// Anything left `None` falls back to the dashboard defaults.
#[derive(Debug, Clone, Default)]
pub struct InitialControls {
    pub x_field: Option<String>,
    pub y_field: Option<String>,
    pub chart_kind: Option<ChartKind>,
    pub grouping: Option<GroupingMode>,
    pub month_index: Option<usize>,
    pub season_index: Option<usize>,
}

/// Resolved run configuration.
#[derive(Debug, Clone)]
pub struct DashConfig {
    pub data_path: PathBuf,
    pub controls: InitialControls,
    pub verbose: bool,
}
