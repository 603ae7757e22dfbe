//! Selection resolver.
//!
//! `resolve` is a pure function of the dataset and a `Selection`; the result is
//! a fresh `View` every time. Views never outlive the dataset they index into.

use crate::data::Dataset;
use crate::domain::{Selection, YearMonth};
use crate::error::SelectionError;

/// The rows picked out by one selection, in file order.
#[derive(Debug, Clone)]
pub struct View<'a> {
    dataset: &'a Dataset,
    selection: Selection,
    label: String,
    rows: Vec<usize>,
}

impl<'a> View<'a> {
    /// A view over explicit rows, e.g. a caller-side narrowing of a resolved view.
    pub fn from_rows(dataset: &'a Dataset, selection: Selection, label: impl Into<String>, rows: Vec<usize>) -> Self {
        Self {
            dataset,
            selection,
            label: label.into(),
            rows,
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Human-readable name of the selected period or season.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Filter the dataset down to the rows matching `selection`.
pub fn resolve(dataset: &Dataset, selection: Selection) -> Result<View<'_>, SelectionError> {
    let (label, rows) = match selection {
        Selection::Month(index) => {
            let key = month_key(dataset, index)?;
            let rows = (0..dataset.len())
                .filter(|&row| dataset.year(row) == key.year && dataset.month(row) == key.month)
                .collect();
            (key.to_string(), rows)
        }
        Selection::Season(index) => {
            let label = season_label(dataset, index)?;
            let rows = (0..dataset.len())
                .filter(|&row| dataset.season(row) == label)
                .collect();
            (label.to_string(), rows)
        }
    };

    Ok(View {
        dataset,
        selection,
        label,
        rows,
    })
}

pub fn month_key(dataset: &Dataset, index: usize) -> Result<YearMonth, SelectionError> {
    let keys = dataset.month_keys();
    keys.get(index)
        .copied()
        .ok_or(SelectionError::MonthOutOfRange {
            index,
            len: keys.len(),
        })
}

pub fn season_label(dataset: &Dataset, index: usize) -> Result<&str, SelectionError> {
    let labels = dataset.season_labels();
    labels
        .get(index)
        .map(String::as_str)
        .ok_or(SelectionError::SeasonOutOfRange {
            index,
            len: labels.len(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_dataset;

    const DATA: &str = "\
Date,Rented Bike Count,Hour,Seasons,Holiday,Functioning Day
01/12/2017,254,0,Winter,0,0
15/12/2017,100,1,Winter,0,0
01/01/2018,90,2,Winter,1,0
01/03/2018,300,3,Spring,0,0
";

    #[test]
    fn month_selection_matches_year_and_month() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let view = resolve(&ds, Selection::Month(0)).unwrap();
        assert_eq!(view.rows(), &[0, 1]);
        assert_eq!(view.label(), "2017-12");

        let last = resolve(&ds, Selection::Month(ds.month_keys().len() - 1)).unwrap();
        assert_eq!(last.rows(), &[3]);
    }

    #[test]
    fn season_selection_matches_label() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        let view = resolve(&ds, Selection::Season(1)).unwrap();
        assert_eq!(view.label(), "Spring");
        assert_eq!(view.rows(), &[3]);
    }

    #[test]
    fn out_of_range_index_is_an_error() {
        let ds = read_dataset(DATA.as_bytes()).unwrap();
        assert_eq!(
            resolve(&ds, Selection::Month(3)).unwrap_err(),
            SelectionError::MonthOutOfRange { index: 3, len: 3 }
        );
        assert_eq!(
            resolve(&ds, Selection::Season(2)).unwrap_err(),
            SelectionError::SeasonOutOfRange { index: 2, len: 2 }
        );
    }
}
