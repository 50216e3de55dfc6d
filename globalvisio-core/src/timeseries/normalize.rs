//! The normalization pipeline that turns raw per-window tables into one
//! canonical series.
//!
//! The provider's endpoints inconsistently return either a running meter
//! reading (cumulative) or discrete consumption samples at sub-hourly
//! granularity (incremental). Consumers need one hourly consumption series
//! regardless of which the endpoint happened to emit, so the pipeline
//! classifies the concatenated table and either differences it or averages
//! it per hour.

use tracing::debug;

use super::series::Series;

/// Normalize raw per-window tables into a single hourly series.
///
/// Steps, in order:
/// 1. concatenate all window tables, preserving row identity;
/// 2. sort ascending by (timestamp, value);
/// 3. deduplicate by timestamp keeping the first row, so the smallest value
///    wins on a collision;
/// 4. classify: a monotonically non-decreasing value column is treated as a
///    cumulative meter reading, anything else as incremental samples;
/// 5. cumulative → restrict to exact on-the-hour rows and replace values
///    with their successive difference (first row forced to `0.0`);
///    incremental → average all samples of each hour (hours with no samples
///    produce no row).
///
/// Returns `None` when no window produced any data.
///
/// The classification heuristic misreads a flat (constant) series as
/// cumulative and differences it to all zeros; that is a known limitation
/// kept for compatibility.
#[must_use]
pub fn normalize(tables: Vec<Series>) -> Option<Series> {
    let mut merged = concat(tables)?;
    merged.sort_by_ts_then_value();
    merged.dedup_by_ts_keep_first();

    if merged.is_cumulative() {
        debug!(rows = merged.len(), "series classified as cumulative meter reading");
        merged.retain_on_the_hour();
        merged.diff();
        Some(merged)
    } else {
        debug!(rows = merged.len(), "series classified as incremental samples");
        Some(merged.resample_hourly_mean())
    }
}

/// Merge raw per-window tables without classification or resampling:
/// concatenate, sort by (timestamp, value), and deduplicate keeping the
/// first row. Used for daily consumption, which the provider already
/// returns as one value per day.
///
/// Returns `None` when no window produced any data.
#[must_use]
pub fn merge_windows(tables: Vec<Series>) -> Option<Series> {
    let mut merged = concat(tables)?;
    merged.sort_by_ts_then_value();
    merged.dedup_by_ts_keep_first();
    Some(merged)
}

fn concat(tables: Vec<Series>) -> Option<Series> {
    let merged: Series = tables.into_iter().flatten().collect();
    if merged.is_empty() { None } else { Some(merged) }
}
