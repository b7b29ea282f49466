pub mod catalog;
pub mod chart;
pub mod cli;
pub mod config;
pub mod constants;
pub mod export;
pub mod label;
pub mod labels;
pub mod logging;
pub mod pivot;
pub mod query;

pub use labels::{LabelFormatter, LabelMap};
