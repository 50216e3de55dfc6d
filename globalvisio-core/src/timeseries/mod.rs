//! Time-series model and normalization pipeline.
//!
//! Modules include:
//! - `series`: the `Sample`/`Series` types and their column operations
//! - `window`: partitioning of date ranges into provider-limited windows
//! - `normalize`: the concat → sort → dedup → classify → diff/resample pipeline
/// Sample and series types plus timestamp parsing/formatting helpers.
pub mod series;
/// Range partitioning under the provider's per-request span limits.
pub mod window;
/// Normalization of raw per-window tables into one canonical series.
pub mod normalize;
