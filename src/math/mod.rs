//! Mathematical utilities: least squares trend lines and descriptive stats.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
