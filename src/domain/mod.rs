//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - control enums (`ChartKind`, `GroupingMode`) and the `ControlState`
//! - calendar keys (`YearMonth`) and the `Selection` filter
//! - run configuration (`DashConfig`, `InitialControls`)

pub mod types;

pub use types::*;
