//! Exports: chart specs as JSON, filtered views as CSV.
//!
//! Both are meant to be easy to consume from notebooks, spreadsheets or other
//! plotting front-ends.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use tracing::info;

use crate::chart::ChartSpec;
use crate::data::dataset::DATE_FIELD;
use crate::error::AppError;
use crate::io::ingest::DATE_FORMAT;
use crate::view::View;

/// Pretty-printed JSON for a chart spec.
pub fn chart_json(spec: &ChartSpec) -> Result<String, AppError> {
    serde_json::to_string_pretty(spec).map_err(|e| AppError::new(4, format!("Failed to serialize chart: {e}")))
}

pub fn write_chart_json(path: &Path, spec: &ChartSpec) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create chart JSON '{}': {e}", path.display())))?;
    let json = chart_json(spec)?;
    writeln!(file, "{json}").map_err(|e| AppError::new(2, format!("Failed to write chart JSON: {e}")))?;
    info!(path = %path.display(), kind = %spec.kind, "wrote chart spec");
    Ok(())
}

/// Write the rows of `view` with the dataset's (recoded) values plus the
/// derived calendar fields.
pub fn write_view_csv<W: Write>(out: W, view: &View<'_>) -> Result<(), AppError> {
    let dataset = view.dataset();
    let mut writer = csv::Writer::from_writer(out);

    let mut header: Vec<&str> = vec![DATE_FIELD];
    header.extend(dataset.column_names());
    header.extend(["Year", "Month", "YearMonth"]);
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for &row in view.rows() {
        let mut record: Vec<String> = Vec::with_capacity(header.len());
        record.push(dataset.date(row).format(DATE_FORMAT).to_string());
        for name in dataset.column_names() {
            record.push(dataset.value(name, row).map(|v| v.to_string()).unwrap_or_default());
        }
        record.push(dataset.year(row).to_string());
        record.push(dataset.month(row).to_string());
        record.push(dataset.year_month(row).to_string());
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

pub fn export_view_csv(path: &Path, view: &View<'_>) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_view_csv(file, view)?;
    info!(path = %path.display(), rows = view.len(), selection = view.label(), "exported view");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Selection;
    use crate::io::read_dataset;
    use crate::view::resolve;

    const DATA: &str = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,254,0,Winter,0,1
01/03/2018,300,3,Spring,1,0
";

    #[test]
    fn view_csv_carries_recoded_and_derived_fields() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let view = resolve(&ds, Selection::Month(0)).unwrap();
        let mut buf = Vec::new();
        write_view_csv(&mut buf, &view).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day,Year,Month,YearMonth"
        );
        assert_eq!(lines.next().unwrap(), "01/12/2017,254,0,Winter,No Holiday,No,2017,12,2017-12");
        assert!(lines.next().is_none());
    }
}
