//! Reporting utilities: dataset summaries and control/chart one-liners.

pub mod format;

pub use format::*;
