//! In-memory dataset store.
//!
//! A `Dataset` is built once (see `io::ingest`) and never mutated afterwards.
//! Every other component borrows it.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use indexmap::IndexMap;

use crate::domain::{FieldKind, YearMonth};

/// Response variable plotted on the y-axis.
pub const RESPONSE_FIELD: &str = "Rented Bike Count";
pub const DATE_FIELD: &str = "Date";
pub const SEASON_FIELD: &str = "Seasons";
pub const HOLIDAY_FIELD: &str = "Holiday";
pub const FUNCTIONING_DAY_FIELD: &str = "Functioning Day";

/// One-hot season indicator columns carried by the source file.
pub const SEASON_INDICATOR_FIELDS: [&str; 4] = ["Winter", "Summer", "Spring", "Autumn"];

/// Columns never offered as x-axis choices regardless of dataset shape.
pub const POLICY_EXCLUDED_FIELDS: [&str; 2] = ["Dew point temperature(C)", "Solar Radiation (MJ/m2)"];

/// Columns that must exist in the source.
pub const REQUIRED_FIELDS: [&str; 5] = [
    RESPONSE_FIELD,
    DATE_FIELD,
    SEASON_FIELD,
    HOLIDAY_FIELD,
    FUNCTIONING_DAY_FIELD,
];

/// Default x-axis field when the dashboard opens.
pub const DEFAULT_X_FIELD: &str = "Hour";

/// Typed column storage. Missing numeric cells are stored as `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
}

impl Column {
    pub fn kind(&self) -> FieldKind {
        match self {
            Column::Numeric(_) => FieldKind::Numeric,
            Column::Categorical(_) => FieldKind::Categorical,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A single cell value, borrowed from the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Number(f64),
    Label(&'a str),
}

impl std::fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Number(v) if v.is_finite() => write!(f, "{v}"),
            Value::Number(_) => Ok(()),
            Value::Label(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Dataset {
    /// Source columns in header order (the date column is kept in `dates`).
    columns: IndexMap<String, Column>,
    dates: Vec<NaiveDate>,
    year_months: Vec<YearMonth>,
    month_keys: Vec<YearMonth>,
    season_labels: Vec<String>,
    available_fields: Vec<String>,
}

impl Dataset {
    /// Assemble a dataset from already-typed columns and parsed dates.
    ///
    /// Derived calendar fields, the month key index and the season label map
    /// are computed here, once.
    pub(crate) fn from_parts(columns: IndexMap<String, Column>, dates: Vec<NaiveDate>) -> Self {
        let year_months: Vec<YearMonth> = dates
            .iter()
            .map(|d| YearMonth::new(d.year(), d.month()))
            .collect();

        let month_keys: Vec<YearMonth> = year_months
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut season_labels: Vec<String> = Vec::new();
        if let Some(Column::Categorical(seasons)) = columns.get(SEASON_FIELD) {
            for s in seasons {
                if !season_labels.iter().any(|l| l == s) {
                    season_labels.push(s.clone());
                }
            }
        }

        let available_fields = columns
            .keys()
            .filter(|name| is_selectable(name))
            .cloned()
            .collect();

        Self {
            columns,
            dates,
            year_months,
            month_keys,
            season_labels,
            available_fields,
        }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn response_field(&self) -> &'static str {
        RESPONSE_FIELD
    }

    /// Fields offered for the x-axis, in header order.
    pub fn available_fields(&self) -> &[String] {
        &self.available_fields
    }

    /// All source column names except the date, in header order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn field_kind(&self, name: &str) -> Option<FieldKind> {
        self.columns.get(name).map(Column::kind)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn numeric(&self, name: &str) -> Option<&[f64]> {
        match self.columns.get(name)? {
            Column::Numeric(v) => Some(v),
            Column::Categorical(_) => None,
        }
    }

    pub fn categorical(&self, name: &str) -> Option<&[String]> {
        match self.columns.get(name)? {
            Column::Categorical(v) => Some(v),
            Column::Numeric(_) => None,
        }
    }

    pub fn value(&self, name: &str, row: usize) -> Option<Value<'_>> {
        match self.columns.get(name)? {
            Column::Numeric(v) => v.get(row).map(|x| Value::Number(*x)),
            Column::Categorical(v) => v.get(row).map(|s| Value::Label(s.as_str())),
        }
    }

    pub fn date(&self, row: usize) -> NaiveDate {
        self.dates[row]
    }

    pub fn year(&self, row: usize) -> i32 {
        self.year_months[row].year
    }

    pub fn month(&self, row: usize) -> u32 {
        self.year_months[row].month
    }

    pub fn year_month(&self, row: usize) -> YearMonth {
        self.year_months[row]
    }

    /// Season label of a row. Empty if the season column is absent.
    pub fn season(&self, row: usize) -> &str {
        self.categorical(SEASON_FIELD)
            .and_then(|s| s.get(row))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Distinct year-month periods, ascending.
    pub fn month_keys(&self) -> &[YearMonth] {
        &self.month_keys
    }

    /// Distinct season labels in first-seen order.
    pub fn season_labels(&self) -> &[String] {
        &self.season_labels
    }

    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.dates.iter().min()?;
        let max = self.dates.iter().max()?;
        Some((*min, *max))
    }
}

fn is_selectable(name: &str) -> bool {
    name != RESPONSE_FIELD
        && name != DATE_FIELD
        && name != SEASON_FIELD
        && !SEASON_INDICATOR_FIELDS.contains(&name)
        && !POLICY_EXCLUDED_FIELDS.contains(&name)
}
