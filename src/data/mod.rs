//! Dataset store and synthetic data generation.

pub mod dataset;
pub mod sample;

pub use dataset::{Column, Dataset, Value};
pub use sample::{SampleConfig, generate_sample, write_sample_csv};
