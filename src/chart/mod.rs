//! Chart construction: option policy, renderer and the `ChartSpec` model.

pub mod policy;
pub mod render;
pub mod spec;

pub use policy::{ChartOptions, options_for};
pub use render::render;
pub use spec::*;
