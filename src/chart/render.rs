//! Chart builders: filtered view + fields + kind → `ChartSpec`.

use tracing::debug;

use crate::chart::spec::{
    Axis, AxisType, BarEntry, BinAxis, BoxGroup, CHART_MARGIN, ChartSpec, Datum, HoverMode, Layout,
    NO_DATA_MESSAGE, Slice, Trace, XYPoint,
};
use crate::data::{Column, Dataset};
use crate::domain::{ChartKind, FieldKind};
use crate::error::RenderError;
use crate::math::{bin_edges, bin_index, fit_line, five_number};
use crate::view::View;

/// Histogram bin count along x.
pub const HISTOGRAM_BINS: usize = 20;

/// Heatmap bin count along each numeric axis.
pub const HEATMAP_BINS: usize = 10;

/// Build the chart for `view`.
///
/// Errors only when a field is unknown, or when `y_field` is needed and is not
/// numeric. Histograms never look at `y_field`.
pub fn render(view: &View<'_>, x_field: &str, y_field: &str, kind: ChartKind) -> Result<ChartSpec, RenderError> {
    let dataset = view.dataset();
    let x = dataset
        .column(x_field)
        .ok_or_else(|| RenderError::UnknownField(x_field.to_string()))?;

    let trace = match kind {
        ChartKind::Scatter => scatter(view, x, y_values(dataset, y_field)?),
        ChartKind::Heatmap => heatmap(view, x, y_values(dataset, y_field)?),
        ChartKind::Bar => bar(view, x, y_values(dataset, y_field)?),
        ChartKind::Pie => pie(view, x, y_values(dataset, y_field)?),
        ChartKind::Box => boxes(view, x, y_values(dataset, y_field)?),
        ChartKind::Histogram => histogram(view, x),
    };

    let axis_type = match x.kind() {
        FieldKind::Categorical => AxisType::Category,
        FieldKind::Numeric => AxisType::Linear,
    };
    let layout = Layout {
        margin: CHART_MARGIN,
        hovermode: HoverMode::Closest,
        xaxis: Axis {
            title: x_field.to_string(),
            axis_type,
        },
        yaxis: Axis {
            title: y_field.to_string(),
            axis_type: AxisType::Linear,
        },
    };

    let annotation = trace.is_empty().then(|| NO_DATA_MESSAGE.to_string());
    debug!(%kind, x = x_field, rows = view.len(), empty = annotation.is_some(), "rendered chart");

    Ok(ChartSpec {
        kind,
        title: format!("{y_field} by {x_field} ({})", view.label()),
        trace,
        layout,
        annotation,
    })
}

fn y_values<'d>(dataset: &'d Dataset, y_field: &str) -> Result<&'d [f64], RenderError> {
    match dataset.column(y_field) {
        Some(Column::Numeric(v)) => Ok(v),
        Some(Column::Categorical(_)) => Err(RenderError::NotNumeric(y_field.to_string())),
        None => Err(RenderError::UnknownField(y_field.to_string())),
    }
}

fn datum(x: &Column, row: usize) -> Option<Datum> {
    match x {
        Column::Numeric(v) => v.get(row).copied().filter(|v| v.is_finite()).map(Datum::Number),
        Column::Categorical(v) => v.get(row).map(|s| Datum::Label(s.clone())),
    }
}

/// Rows grouped by distinct x. Numeric x ascends; labels keep first-seen order.
fn group_by_x(view: &View<'_>, x: &Column) -> Vec<(Datum, Vec<usize>)> {
    let mut groups: Vec<(Datum, Vec<usize>)> = Vec::new();
    for &row in view.rows() {
        let Some(d) = datum(x, row) else { continue };
        match groups.iter_mut().find(|(k, _)| *k == d) {
            Some((_, rows)) => rows.push(row),
            None => groups.push((d, vec![row])),
        }
    }
    if let Column::Numeric(_) = x {
        groups.sort_by(|(a, _), (b, _)| match (a, b) {
            (Datum::Number(a), Datum::Number(b)) => a.total_cmp(b),
            _ => std::cmp::Ordering::Equal,
        });
    }
    groups
}

fn scatter(view: &View<'_>, x: &Column, y: &[f64]) -> Trace {
    let points: Vec<XYPoint> = view
        .rows()
        .iter()
        .filter(|&&row| y[row].is_finite())
        .filter_map(|&row| datum(x, row).map(|x| XYPoint { x, y: y[row] }))
        .collect();

    let trend = match x {
        Column::Numeric(_) => {
            let xy: Vec<(f64, f64)> = points
                .iter()
                .filter_map(|p| match p.x {
                    Datum::Number(v) => Some((v, p.y)),
                    Datum::Label(_) => None,
                })
                .collect();
            fit_line(&xy)
        }
        Column::Categorical(_) => None,
    };

    Trace::Scatter { points, trend }
}

fn heatmap(view: &View<'_>, x: &Column, y: &[f64]) -> Trace {
    let ys: Vec<f64> = view.rows().iter().map(|&r| y[r]).collect();
    let y_axis = BinAxis::Edges(bin_edges(&ys, HEATMAP_BINS).unwrap_or_default());

    let x_axis = match x {
        Column::Numeric(v) => {
            let xs: Vec<f64> = view.rows().iter().map(|&r| v[r]).collect();
            BinAxis::Edges(bin_edges(&xs, HEATMAP_BINS).unwrap_or_default())
        }
        Column::Categorical(_) => BinAxis::Categories(
            group_by_x(view, x)
                .into_iter()
                .map(|(d, _)| d.to_string())
                .collect(),
        ),
    };

    let mut counts = vec![vec![0usize; x_axis.len()]; y_axis.len()];
    for &row in view.rows() {
        let xi = match (&x_axis, x) {
            (BinAxis::Edges(edges), Column::Numeric(v)) => bin_index(edges, v[row]),
            (BinAxis::Categories(cats), Column::Categorical(v)) => cats.iter().position(|c| *c == v[row]),
            _ => None,
        };
        let yi = match &y_axis {
            BinAxis::Edges(edges) => bin_index(edges, y[row]),
            BinAxis::Categories(_) => None,
        };
        if let (Some(xi), Some(yi)) = (xi, yi) {
            counts[yi][xi] += 1;
        }
    }

    Trace::Heatmap {
        x: x_axis,
        y: y_axis,
        counts,
    }
}

fn bar(view: &View<'_>, x: &Column, y: &[f64]) -> Trace {
    let bars = group_by_x(view, x)
        .into_iter()
        .map(|(x, rows)| BarEntry {
            x,
            value: rows.iter().map(|&r| y[r]).filter(|v| v.is_finite()).sum(),
            rows: rows.len(),
        })
        .collect();
    Trace::Bar { bars }
}

fn pie(view: &View<'_>, x: &Column, y: &[f64]) -> Trace {
    let mut slices: Vec<Slice> = group_by_x(view, x)
        .into_iter()
        .map(|(x, rows)| Slice {
            label: x.to_string(),
            value: rows.iter().map(|&r| y[r]).filter(|v| v.is_finite()).sum(),
            share: 0.0,
        })
        .collect();

    let total: f64 = slices.iter().map(|s| s.value).sum();
    if total > 0.0 {
        for s in &mut slices {
            s.share = s.value / total;
        }
    }
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    Trace::Pie { slices }
}

fn boxes(view: &View<'_>, x: &Column, y: &[f64]) -> Trace {
    let boxes = group_by_x(view, x)
        .into_iter()
        .filter_map(|(x, rows)| {
            let values: Vec<f64> = rows.iter().map(|&r| y[r]).collect();
            five_number(&values).map(|stats| BoxGroup { x, stats })
        })
        .collect();
    Trace::Box { boxes }
}

fn histogram(view: &View<'_>, x: &Column) -> Trace {
    match x {
        Column::Numeric(v) => {
            let xs: Vec<f64> = view.rows().iter().map(|&r| v[r]).collect();
            let edges = bin_edges(&xs, HISTOGRAM_BINS).unwrap_or_default();
            let mut counts = vec![0usize; edges.len().saturating_sub(1)];
            for value in xs {
                if let Some(i) = bin_index(&edges, value) {
                    counts[i] += 1;
                }
            }
            Trace::Histogram {
                bins: BinAxis::Edges(edges),
                counts,
            }
        }
        Column::Categorical(_) => {
            let groups = group_by_x(view, x);
            let counts = groups.iter().map(|(_, rows)| rows.len()).collect();
            let labels = groups.into_iter().map(|(d, _)| d.to_string()).collect();
            Trace::Histogram {
                bins: BinAxis::Categories(labels),
                counts,
            }
        }
    }
}
