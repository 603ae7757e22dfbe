//! CSV ingest and normalization.
//!
//! This module is responsible for turning the bike-rental CSV into a typed,
//! immutable `Dataset`.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors, fail fast)
//! - **Column typing by inference**: numeric when every non-empty cell parses
//! - **Load-time recoding** of the holiday / functioning-day indicator codes
//! - **Separation of concerns**: no filtering or charting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::data::dataset::{
    Column, DATE_FIELD, Dataset, FUNCTIONING_DAY_FIELD, HOLIDAY_FIELD, REQUIRED_FIELDS, RESPONSE_FIELD,
    SEASON_FIELD,
};
use crate::error::DataLoadError;

/// Date format used by the source (`DD/MM/YYYY`).
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// `Holiday` recoding: code 0 / code 1.
pub const HOLIDAY_LABELS: [&str; 2] = ["No Holiday", "Holiday"];

/// `Functioning Day` recoding: code 0 / code 1.
///
/// NOTE: 0 maps to "Yes". The column name suggests the opposite polarity, but
/// this is how the source labels are defined and it is kept as-is.
pub const FUNCTIONING_DAY_LABELS: [&str; 2] = ["Yes", "No"];

/// Load the dataset from a CSV file.
pub fn load_dataset(path: &Path) -> Result<Dataset, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let dataset = read_dataset(file)?;
    info!(
        path = %path.display(),
        rows = dataset.len(),
        months = dataset.month_keys().len(),
        seasons = dataset.season_labels().len(),
        "dataset loaded"
    );
    Ok(dataset)
}

/// Parse a dataset from any CSV reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, DataLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(DataLoadError::Headers)?
        .iter()
        .map(normalize_header_name)
        .collect();

    let header_map: HashMap<&str, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.as_str(), idx))
        .collect();

    for name in REQUIRED_FIELDS {
        if !header_map.contains_key(name) {
            return Err(DataLoadError::MissingColumn(name.to_string()));
        }
    }

    let mut records: Vec<StringRecord> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because records() starts after the header and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|source| DataLoadError::Row { line, source })?;
        records.push(record);
    }

    if records.is_empty() {
        return Err(DataLoadError::Empty);
    }

    let date_idx = header_map[DATE_FIELD];
    let dates = records
        .iter()
        .enumerate()
        .map(|(idx, r)| parse_date(cell(r, date_idx), idx + 2))
        .collect::<Result<Vec<_>, _>>()?;

    let mut columns = IndexMap::new();
    for (col_idx, name) in headers.iter().enumerate() {
        if name == DATE_FIELD {
            continue;
        }
        let column = match name.as_str() {
            HOLIDAY_FIELD => recode_column(&records, col_idx, name, HOLIDAY_LABELS)?,
            FUNCTIONING_DAY_FIELD => recode_column(&records, col_idx, name, FUNCTIONING_DAY_LABELS)?,
            _ => infer_column(&records, col_idx),
        };
        debug!(column = %name, kind = ?column.kind(), "typed column");
        columns.insert(name.clone(), column);
    }

    if !matches!(columns.get(RESPONSE_FIELD), Some(Column::Numeric(_))) {
        return Err(DataLoadError::NonNumericResponse(RESPONSE_FIELD.to_string()));
    }

    // Seasons drive filtering, so every row needs a label. An all-numeric
    // season column still acts as labels.
    let seasons: Vec<String> = records
        .iter()
        .map(|r| cell(r, header_map[SEASON_FIELD]).to_string())
        .collect();
    if let Some(idx) = seasons.iter().position(|s| s.is_empty()) {
        return Err(DataLoadError::MissingValue {
            line: idx + 2,
            column: SEASON_FIELD.to_string(),
        });
    }
    columns.insert(SEASON_FIELD.to_string(), Column::Categorical(seasons));

    Ok(Dataset::from_parts(columns, dates))
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    name.trim().trim_start_matches('\u{feff}').to_string()
}

fn cell(record: &StringRecord, idx: usize) -> &str {
    record.get(idx).map(str::trim).unwrap_or("")
}

fn parse_date(s: &str, line: usize) -> Result<NaiveDate, DataLoadError> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| DataLoadError::InvalidDate {
        line,
        value: s.to_string(),
    })
}

fn infer_column(records: &[StringRecord], idx: usize) -> Column {
    let mut numbers = Vec::with_capacity(records.len());
    for r in records {
        let s = cell(r, idx);
        if s.is_empty() {
            numbers.push(f64::NAN);
            continue;
        }
        match s.parse::<f64>() {
            Ok(v) => numbers.push(v),
            Err(_) => {
                return Column::Categorical(records.iter().map(|r| cell(r, idx).to_string()).collect());
            }
        }
    }
    Column::Numeric(numbers)
}

fn recode_column(
    records: &[StringRecord],
    idx: usize,
    name: &str,
    labels: [&str; 2],
) -> Result<Column, DataLoadError> {
    records
        .iter()
        .enumerate()
        .map(|(row, r)| {
            let raw = cell(r, idx);
            match raw.parse::<f64>() {
                Ok(v) if v == 0.0 => Ok(labels[0].to_string()),
                Ok(v) if v == 1.0 => Ok(labels[1].to_string()),
                _ => Err(DataLoadError::UnknownCode {
                    line: row + 2,
                    column: name.to_string(),
                    value: raw.to_string(),
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Column::Categorical)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldKind, YearMonth};

    const HEADER: &str = "Date,Rented Bike Count,Hour,Temperature(C),Dew point temperature(C),Solar Radiation (MJ/m2),Seasons,Holiday,Functioning Day,Winter,Summer,Spring,Autumn\n";

    fn csv(rows: &[&str]) -> String {
        let mut s = HEADER.to_string();
        for r in rows {
            s.push_str(r);
            s.push('\n');
        }
        s
    }

    #[test]
    fn loads_and_recodes_indicator_columns() {
        let data = csv(&[
            "01/12/2017,254,0,-5.2,-17.6,0,Winter,0,0,1,0,0,0",
            "01/12/2017,204,1,-5.5,-17.6,0,Winter,1,1,1,0,0,0",
        ]);
        let ds = read_dataset(data.as_bytes()).unwrap();

        assert_eq!(ds.len(), 2);
        assert_eq!(ds.categorical("Holiday").unwrap(), &["No Holiday", "Holiday"]);
        assert_eq!(ds.categorical("Functioning Day").unwrap(), &["Yes", "No"]);
        assert_eq!(ds.field_kind("Hour"), Some(FieldKind::Numeric));
        assert_eq!(ds.field_kind("Holiday"), Some(FieldKind::Categorical));
        assert_eq!(ds.month_keys(), &[YearMonth::new(2017, 12)]);
        assert_eq!(
            ds.available_fields(),
            &["Hour", "Temperature(C)", "Holiday", "Functioning Day"]
        );
    }

    #[test]
    fn strips_bom_from_first_header() {
        let data = format!("\u{feff}{}", csv(&["01/12/2017,254,0,-5.2,-17.6,0,Winter,0,0,1,0,0,0"]));
        let ds = read_dataset(data.as_bytes()).unwrap();
        assert_eq!(ds.year(0), 2017);
    }

    #[test]
    fn rejects_missing_required_column() {
        let data = "Date,Hour,Seasons,Holiday,Functioning Day\n01/12/2017,0,Winter,0,0\n";
        let err = read_dataset(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingColumn(c) if c == RESPONSE_FIELD));
    }

    #[test]
    fn rejects_iso_dates() {
        let data = csv(&["2017-12-01,254,0,-5.2,-17.6,0,Winter,0,0,1,0,0,0"]);
        let err = read_dataset(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::InvalidDate { line: 2, .. }));
    }

    #[test]
    fn rejects_unknown_holiday_code() {
        let data = csv(&["01/12/2017,254,0,-5.2,-17.6,0,Winter,2,0,1,0,0,0"]);
        let err = read_dataset(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::UnknownCode { ref column, .. } if column == "Holiday"));
    }

    #[test]
    fn rejects_header_only_file() {
        let err = read_dataset(HEADER.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::Empty));
    }

    #[test]
    fn rejects_blank_season_in_numeric_season_column() {
        let data = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,254,0,1,0,0
02/12/2017,204,1,,0,0
";
        let err = read_dataset(data.as_bytes()).unwrap_err();
        assert!(matches!(err, DataLoadError::MissingValue { line: 3, ref column } if column == SEASON_FIELD));
    }

    #[test]
    fn text_cell_makes_column_categorical() {
        let data = csv(&[
            "01/12/2017,254,0,-5.2,-17.6,0,Winter,0,0,1,0,0,0",
            "01/12/2017,204,1,n/a,-17.6,0,Winter,0,0,1,0,0,0",
        ]);
        let ds = read_dataset(data.as_bytes()).unwrap();
        assert_eq!(ds.field_kind("Temperature(C)"), Some(FieldKind::Categorical));
    }
}
