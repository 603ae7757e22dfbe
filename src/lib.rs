//! `bike-dash` library crate.
//!
//! The binary (`bikedash`) is a thin wrapper around this library so that:
//!
//! - the load → select → render pipeline is testable without a terminal
//! - the TUI, the one-shot CLI commands and the exports share one controller
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod chart;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod tui;
pub mod view;
