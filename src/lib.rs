//! Reshape benchmark result records into pivot tables and chart them.
//!
//! Input is plain text: directives (`TITLE`, `XLABEL`, `YLABEL`, `IGNORE`,
//! `SORT`, `RENAME`) and data lines of either `series y` or `series x y`.
//! [`processing::reshape`] turns that into mean/min/max pivots, which
//! [`render`] draws as line or bar charts.

pub mod app;
pub mod data;
pub mod error;
pub mod processing;
pub mod render;
pub mod state;
