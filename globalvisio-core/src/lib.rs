//! globalvisio-core
//!
//! Core types and time-series utilities shared across the globalvisio
//! workspace.
//!
//! - `error`: the unified `GvError` taxonomy.
//! - `resources`: immutable site/device/point metadata snapshots and the
//!   name-matching rule used by lookups.
//! - `timeseries`: window partitioning and the normalization pipeline that
//!   turns heterogeneous provider responses into one hourly/daily series.
//!
//! This crate performs no I/O; the HTTP session, resource fetchers, and the
//! history writer live in the `globalvisio` crate.
#![warn(missing_docs)]

/// The unified error taxonomy.
pub mod error;
/// Resource metadata snapshots and lookup matching.
pub mod resources;
/// Time-series model, windowing, and normalization.
pub mod timeseries;

pub use error::GvError;
pub use resources::{DeviceInfo, PointInfo, PointSummary, SiteInfo, matches_words};
pub use timeseries::normalize::{merge_windows, normalize};
pub use timeseries::series::{
    PROVIDER_TZ, Sample, Series, format_provider_ts, parse_provider_ts,
};
pub use timeseries::window::{RangeKind, Window, partition};
