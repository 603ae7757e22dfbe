//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - chart JSON and view CSV exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
