//! Windowed time-series fetching and the guarded write-back.
//!
//! The provider caps the span of one range request (88 days for hourly
//! history, 364 for daily consumption), so a caller range is partitioned
//! into consecutive windows and fetched sequentially. A hard failure in any
//! window aborts the whole fetch and discards partial results; a window
//! that legitimately has no data is logged and skipped.

use chrono::NaiveDate;
use tracing::{debug, warn};

use globalvisio_core::{
    GvError, RangeKind, Sample, Series, Window, merge_windows, normalize, parse_provider_ts,
    format_provider_ts, partition,
};

use crate::client::GvClient;
use crate::resources::Point;
use crate::wire::{ConsumptionPayload, HistoryPayload, SaveRequest, SaveRow, ValueRow};

impl Point {
    /// Fetch and normalize the point's hourly history over `[start, end]`.
    ///
    /// The range is split into ≤88-day windows, one GET each; the raw
    /// per-window tables then go through the normalization pipeline
    /// (sort, dedup, cumulative-vs-incremental classification, differencing
    /// or hourly averaging). Returns `Ok(None)` when no window produced any
    /// data — including the zero-iteration case `start == end`.
    ///
    /// # Errors
    /// `InvalidArg` when `start > end`; any hard failure
    /// (`Transport`/`Auth`/`Api`/`Decode`/`Schema`) in any window aborts the
    /// whole fetch.
    pub fn history(
        &self,
        client: &GvClient,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Series>, GvError> {
        let id = self.info().id;
        let tables = fetch_windows(start, end, RangeKind::History, |w| {
            let payload: HistoryPayload = client.get_payload(
                &format!(
                    "/api/points/history/{id}?dateStart={}&dateEnd={}",
                    w.start, w.end
                ),
                "point history",
            )?;
            Ok(payload.history)
        })?;
        Ok(normalize(tables))
    }

    /// Fetch the point's daily consumption over `[start, end]`.
    ///
    /// Windows are capped at 364 days. The per-window tables are merged
    /// (sorted, deduplicated) but not classified or resampled: the endpoint
    /// already returns one value per day. Returns `Ok(None)` when no window
    /// produced any data.
    ///
    /// # Errors
    /// Same policy as [`Point::history`].
    pub fn consumption_daily(
        &self,
        client: &GvClient,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Option<Series>, GvError> {
        let id = self.info().id;
        let tables = fetch_windows(start, end, RangeKind::Consumption, |w| {
            let payload: ConsumptionPayload = client.get_payload(
                &format!(
                    "/api/points/consumption/{id}?dateStart={}&dateEnd={}&period=2",
                    w.start, w.end
                ),
                "point consumption",
            )?;
            Ok(payload.consumption)
        })?;
        Ok(merge_windows(tables))
    }

    /// Push a series to this point as one `modeSave: "history"` batch.
    ///
    /// Only virtual "API" points accept writes: one of the point's labels
    /// must contain `"API"` case-insensitively. Rows are serialized in
    /// ascending timestamp order as `{datetime: "YYYY-MM-DD HH:MM:SS",
    /// value}`. There is no retry.
    ///
    /// # Errors
    /// `Rejected` — without any network call — when the label guard fails;
    /// otherwise the request plumbing's errors.
    pub fn save_history(&self, client: &GvClient, series: &Series) -> Result<(), GvError> {
        if !self.info().is_api_point() {
            warn!(
                point = self.info().id,
                label = %self.info().display_label(),
                "refusing to write to a point not dedicated to the API"
            );
            return Err(GvError::Rejected {
                label: self.info().display_label(),
            });
        }

        let mut rows: Vec<&Sample> = series.samples().iter().collect();
        rows.sort_by_key(|s| s.ts);
        let data = rows
            .into_iter()
            .map(|s| SaveRow {
                datetime: format_provider_ts(s.ts),
                value: s.value,
            })
            .collect();

        let body = SaveRequest {
            mode_save: "history",
            data,
        };
        client.post_status(
            &format!("/api/points/saveConsumption/{}", self.info().id),
            &body,
            "save history",
        )
    }
}

/// Run the sequential per-window fetch loop shared by both range endpoints.
///
/// `fetch_one` returns the raw rows of one window, or `None`/empty when the
/// provider reports no data for it (soft, continuable). Any `Err` aborts
/// the loop; partial results are discarded by propagation.
fn fetch_windows<F>(
    start: NaiveDate,
    end: NaiveDate,
    kind: RangeKind,
    mut fetch_one: F,
) -> Result<Vec<Series>, GvError>
where
    F: FnMut(&Window) -> Result<Option<Vec<ValueRow>>, GvError>,
{
    let windows = partition(start, end, kind)?;
    let mut tables = Vec::with_capacity(windows.len());
    for w in &windows {
        match fetch_one(w)? {
            Some(rows) if !rows.is_empty() => {
                debug!(start = %w.start, end = %w.end, rows = rows.len(), "window fetched");
                tables.push(parse_rows(rows)?);
            }
            _ => {
                warn!(start = %w.start, end = %w.end, "no data in window, continuing");
            }
        }
    }
    Ok(tables)
}

fn parse_rows(rows: Vec<ValueRow>) -> Result<Series, GvError> {
    rows.into_iter()
        .map(|r| {
            Ok(Sample {
                ts: parse_provider_ts(&r.date)?,
                value: r.value,
            })
        })
        .collect::<Result<Vec<_>, GvError>>()
        .map(Series::from_samples)
}
