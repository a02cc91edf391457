//! HATVP declaration datasets: loading, querying and charting support.
//!
//! The [`data`] module is the pipeline (typed CSV loading, query operations,
//! aggregation, background loads). [`views`] configures that pipeline once
//! per dashboard view. [`config`] and [`color`] hold the presentation
//! settings handed to the desktop shell.

pub mod color;
pub mod config;
pub mod data;
pub mod views;
