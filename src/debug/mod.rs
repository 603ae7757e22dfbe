//! Debug bundle writer for inspecting the dashboard state behind a chart.

use std::fmt::Write as _;
use std::fs::{File, create_dir_all};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::info;

use crate::app::controller::Controller;
use crate::app::pipeline::run_render;
use crate::error::AppError;
use crate::io::export::chart_json;
use crate::report::{format_controls, format_trace_summary};

/// Write a markdown bundle into `./debug` and return its path.
pub fn write_debug_bundle(controller: &Controller<'_>) -> Result<PathBuf, AppError> {
    write_debug_bundle_in(Path::new("debug"), controller)
}

pub fn write_debug_bundle_in(dir: &Path, controller: &Controller<'_>) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let state = controller.state();
    let path = dir.join(format!("bikedash_debug_{}_{ts}.md", state.chart_kind));

    let body = debug_markdown(controller)?;
    let mut file = File::create(&path).map_err(|e| AppError::new(4, format!("Failed to create debug file: {e}")))?;
    file.write_all(body.as_bytes())
        .map_err(|e| AppError::new(4, format!("Failed to write debug file: {e}")))?;

    info!(path = %path.display(), "wrote debug bundle");
    Ok(path)
}

fn debug_markdown(controller: &Controller<'_>) -> Result<String, AppError> {
    let dataset = controller.dataset();
    let state = controller.state();
    let out = run_render(dataset, state)?;
    let chart = &out.chart;

    let mut md = String::new();
    let options: Vec<&str> = controller.options().kinds.iter().map(|k| k.as_str()).collect();
    let sliders = controller.sliders();

    // Writing into a String cannot fail.
    let _ = writeln!(md, "# bikedash debug bundle");
    let _ = writeln!(md, "- generated: {}", Local::now().to_rfc3339());
    let _ = writeln!(md, "- dataset rows: {}", dataset.len());
    let _ = writeln!(md, "- month keys: {}", dataset.month_keys().len());
    let _ = writeln!(md, "- season labels: {}", dataset.season_labels().join(", "));
    let _ = writeln!(md, "- controls: {}", format_controls(controller));
    let _ = writeln!(md, "- chart options: [{}] default={}", options.join(", "), controller.options().default);
    let _ = writeln!(md, "- sliders visible: month={} season={}", sliders.month, sliders.season);
    let _ = writeln!(md, "- view: {} ({} rows)", out.view.label(), out.view.len());
    let _ = writeln!(md, "- trace: {}", format_trace_summary(&chart.trace));
    if let Some(note) = &chart.annotation {
        let _ = writeln!(md, "- annotation: {note}");
    }

    let _ = writeln!(md, "\n## View rows (first 20)");
    let _ = writeln!(md, "| row | date | {} | {} |", state.x_field, state.y_field);
    let _ = writeln!(md, "| - | - | - | - |");
    for &row in out.view.rows().iter().take(20) {
        let x = dataset.value(&state.x_field, row).map(|v| v.to_string()).unwrap_or_default();
        let y = dataset.value(&state.y_field, row).map(|v| v.to_string()).unwrap_or_default();
        let _ = writeln!(md, "| {row} | {} | {x} | {y} |", dataset.date(row));
    }

    let _ = writeln!(md, "\n## Chart spec\n```json\n{}\n```", chart_json(chart)?);
    Ok(md)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_dataset;

    #[test]
    fn bundle_contains_controls_and_spec() {
        let data = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,254,0,Winter,0,0
";
        let ds = read_dataset(data.as_bytes()).unwrap();
        let c = Controller::new(&ds).unwrap();
        let dir = std::env::temp_dir().join(format!("bikedash-debug-{}", std::process::id()));
        let path = write_debug_bundle_in(&dir, &c).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("- view: 2017-12 (1 rows)"));
        assert!(text.contains("\"kind\": \"scatter\""));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
