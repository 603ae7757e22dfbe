//! Renderer-independent chart description.
//!
//! A `ChartSpec` is plain data: the TUI, the ASCII plotter and the JSON export
//! all consume the same value.

use serde::Serialize;

use crate::domain::ChartKind;
use crate::math::{FiveNumber, LineFit};

/// Annotation attached to charts built from an empty view.
pub const NO_DATA_MESSAGE: &str = "No data for the current selection";

/// An x-axis value: numeric or a category label.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Datum {
    Number(f64),
    Label(String),
}

impl std::fmt::Display for Datum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Datum::Number(v) => write!(f, "{v}"),
            Datum::Label(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XYPoint {
    pub x: Datum,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarEntry {
    pub x: Datum,
    /// Sum of y over the rows sharing this x.
    pub value: f64,
    pub rows: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: f64,
    /// Fraction of the pie, `0..=1`.
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroup {
    pub x: Datum,
    #[serde(flatten)]
    pub stats: FiveNumber,
}

/// Bin layout along one axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinAxis {
    /// `n + 1` ascending edges for `n` equal-width bins.
    Edges(Vec<f64>),
    /// One bin per category label.
    Categories(Vec<String>),
}

impl BinAxis {
    pub fn len(&self) -> usize {
        match self {
            BinAxis::Edges(e) => e.len().saturating_sub(1),
            BinAxis::Categories(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bin_label(&self, idx: usize) -> String {
        match self {
            BinAxis::Edges(e) => format!("{:.1}–{:.1}", e[idx], e[idx + 1]),
            BinAxis::Categories(c) => c[idx].clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Scatter {
        points: Vec<XYPoint>,
        trend: Option<LineFit>,
    },
    Heatmap {
        x: BinAxis,
        y: BinAxis,
        /// `counts[y_bin][x_bin]`.
        counts: Vec<Vec<usize>>,
    },
    Bar {
        bars: Vec<BarEntry>,
    },
    Pie {
        slices: Vec<Slice>,
    },
    Box {
        boxes: Vec<BoxGroup>,
    },
    Histogram {
        bins: BinAxis,
        counts: Vec<usize>,
    },
}

impl Trace {
    pub fn is_empty(&self) -> bool {
        match self {
            Trace::Scatter { points, .. } => points.is_empty(),
            Trace::Heatmap { counts, .. } => counts.iter().flatten().all(|c| *c == 0),
            Trace::Bar { bars } => bars.is_empty(),
            Trace::Pie { slices } => slices.is_empty(),
            Trace::Box { boxes } => boxes.is_empty(),
            Trace::Histogram { counts, .. } => counts.iter().all(|c| *c == 0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Category,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Axis {
    pub title: String,
    #[serde(rename = "type")]
    pub axis_type: AxisType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Margin {
    pub l: u16,
    pub b: u16,
    pub t: u16,
    pub r: u16,
}

pub const CHART_MARGIN: Margin = Margin {
    l: 40,
    b: 40,
    t: 10,
    r: 0,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HoverMode {
    Closest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub margin: Margin,
    pub hovermode: HoverMode,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub trace: Trace,
    pub layout: Layout,
    /// Set when there is nothing to draw.
    pub annotation: Option<String>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.trace.is_empty()
    }
}
