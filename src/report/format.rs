//! Formatted terminal output for the non-interactive commands.
//!
//! We keep formatting code in one place so output changes stay localized.

use crate::app::controller::Controller;
use crate::chart::{Trace, options_for};
use crate::data::Dataset;
use crate::domain::FieldKind;

/// Dataset summary: size, date range, selectable fields with their chart
/// options, month keys and season labels.
pub fn format_dataset_summary(dataset: &Dataset) -> String {
    let mut out = String::new();

    out.push_str("=== bikedash - dataset ===\n");
    out.push_str(&format!("Rows: {}\n", dataset.len()));
    if let Some((first, last)) = dataset.date_range() {
        out.push_str(&format!("Dates: {first} .. {last}\n"));
    }
    out.push_str(&format!("Response: {}\n", dataset.response_field()));

    out.push_str("\nFields:\n");
    let width = dataset
        .available_fields()
        .iter()
        .map(|f| f.len())
        .max()
        .unwrap_or(0);
    for field in dataset.available_fields() {
        let kind = match dataset.field_kind(field) {
            Some(FieldKind::Numeric) => "numeric",
            Some(FieldKind::Categorical) => "categorical",
            None => "-",
        };
        let opts = options_for(dataset, field);
        let kinds: Vec<&str> = opts.kinds.iter().map(|k| k.as_str()).collect();
        out.push_str(&format!(
            "  {field:<width$}  {kind:<11}  [{}] default={}\n",
            kinds.join(", "),
            opts.default
        ));
    }

    out.push_str(&format!("\nMonths ({}):\n", dataset.month_keys().len()));
    for (i, key) in dataset.month_keys().iter().enumerate() {
        out.push_str(&format!("  {i:>3}  {key}\n"));
    }

    out.push_str(&format!("\nSeasons ({}):\n", dataset.season_labels().len()));
    for (i, label) in dataset.season_labels().iter().enumerate() {
        out.push_str(&format!("  {i:>3}  {label}\n"));
    }

    out
}

/// One-line description of the current controls.
pub fn format_controls(controller: &Controller<'_>) -> String {
    let s = controller.state();
    let ds = controller.dataset();
    let month = ds
        .month_keys()
        .get(s.month_index)
        .map(|k| k.to_string())
        .unwrap_or_else(|| "-".to_string());
    let season = ds
        .season_labels()
        .get(s.season_index)
        .cloned()
        .unwrap_or_else(|| "-".to_string());
    format!(
        "x: {} | y: {} | kind: {} | {} | month: {month} | season: {season}",
        s.x_field,
        s.y_field,
        s.chart_kind,
        s.grouping.display_name(),
    )
}

/// Short numeric summary of a chart's trace.
pub fn format_trace_summary(trace: &Trace) -> String {
    match trace {
        Trace::Scatter { points, trend } => match trend {
            Some(fit) => format!(
                "{} points | trend: y = {:.3} + {:.3}x (r²={:.3})",
                points.len(),
                fit.intercept,
                fit.slope,
                fit.r_squared
            ),
            None => format!("{} points | no trend", points.len()),
        },
        Trace::Heatmap { x, y, counts } => {
            let total: usize = counts.iter().flatten().sum();
            format!("{}x{} cells | {total} rows binned", x.len(), y.len())
        }
        Trace::Bar { bars } => {
            let total: f64 = bars.iter().map(|b| b.value).sum();
            format!("{} bars | total {total:.0}", bars.len())
        }
        Trace::Pie { slices } => {
            let top = slices
                .first()
                .map(|s| format!(" | largest: {} ({:.1}%)", s.label, s.share * 100.0))
                .unwrap_or_default();
            format!("{} slices{top}", slices.len())
        }
        Trace::Box { boxes } => format!("{} boxes", boxes.len()),
        Trace::Histogram { bins, counts } => {
            format!("{} bins | {} rows", bins.len(), counts.iter().sum::<usize>())
        }
    }
}
