//! Which chart kinds make sense for an x-axis field.

use serde::Serialize;

use crate::data::Dataset;
use crate::domain::{ChartKind, FieldKind};

const NUMERIC_KINDS: &[ChartKind] = &[
    ChartKind::Scatter,
    ChartKind::Heatmap,
    ChartKind::Bar,
    ChartKind::Box,
    ChartKind::Histogram,
];

const CATEGORICAL_KINDS: &[ChartKind] = &[ChartKind::Bar, ChartKind::Pie];

/// Chart kinds offered for a field, plus the kind selected on field change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartOptions {
    pub kinds: &'static [ChartKind],
    pub default: ChartKind,
}

impl ChartOptions {
    pub fn contains(&self, kind: ChartKind) -> bool {
        self.kinds.contains(&kind)
    }

    /// Next (or previous) kind in the option list, wrapping around.
    pub fn cycle(&self, current: ChartKind, delta: i32) -> ChartKind {
        let len = self.kinds.len() as i32;
        let pos = self.kinds.iter().position(|k| *k == current).unwrap_or(0) as i32;
        self.kinds[(pos + delta).rem_euclid(len) as usize]
    }
}

/// Options for `x_field`. Anything that is not a numeric column (including an
/// unknown name) is treated as categorical.
pub fn options_for(dataset: &Dataset, x_field: &str) -> ChartOptions {
    match dataset.field_kind(x_field) {
        Some(FieldKind::Numeric) => ChartOptions {
            kinds: NUMERIC_KINDS,
            default: ChartKind::Scatter,
        },
        Some(FieldKind::Categorical) | None => ChartOptions {
            kinds: CATEGORICAL_KINDS,
            default: ChartKind::Bar,
        },
    }
}
