//! Row selection: turning the active slider into a filtered view.

pub mod resolve;

pub use resolve::*;
