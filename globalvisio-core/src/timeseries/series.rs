use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::GvError;

/// The provider's timezone. Timestamps are compared as instants (UTC) but
/// stored and displayed in this zone.
pub const PROVIDER_TZ: Tz = chrono_tz::Europe::Paris;

const HOUR: i64 = 3_600;

/// One (timestamp, value) pair of a point's series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Timezone-aware timestamp, canonicalized to Europe/Paris.
    pub ts: DateTime<Tz>,
    /// Measured value (meter reading or consumption delta, in the point's unit).
    pub value: f64,
}

/// An ordered sequence of samples.
///
/// The provider's "tabular" responses become a `Series`; every column-style
/// operation of the normalization pipeline (sort, dedup, diff, resample) is a
/// named method here so its tie-breaks are explicit and testable.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Series(Vec<Sample>);

impl Series {
    /// Build a series from samples, preserving their order.
    #[must_use]
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self(samples)
    }

    /// Borrow the underlying samples.
    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    /// Consume the series and return its samples.
    #[must_use]
    pub fn into_samples(self) -> Vec<Sample> {
        self.0
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the series has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sort ascending by (timestamp, value). Timestamps compare as instants,
    /// so the zone a sample was parsed in does not affect the order. For
    /// duplicate timestamps the smaller value sorts first, which makes the
    /// subsequent keep-first dedup deterministic.
    pub fn sort_by_ts_then_value(&mut self) {
        self.0
            .sort_by(|a, b| a.ts.cmp(&b.ts).then(a.value.total_cmp(&b.value)));
    }

    /// Drop rows whose timestamp equals the previous row's, keeping the
    /// first. After `sort_by_ts_then_value` this means the smallest value
    /// wins on a timestamp collision — a defined tie-break, not an accident.
    pub fn dedup_by_ts_keep_first(&mut self) {
        self.0.dedup_by(|b, a| b.ts == a.ts);
    }

    /// Whether the value column is monotonically non-decreasing.
    ///
    /// This is the heuristic for "cumulative meter reading". A flat series
    /// (all values equal) also tests true and is treated as cumulative,
    /// yielding an all-zero differenced series; that behavior is kept as-is
    /// for compatibility with the provider's consumers.
    #[must_use]
    pub fn is_cumulative(&self) -> bool {
        self.0.windows(2).all(|w| w[1].value >= w[0].value)
    }

    /// Keep only rows that sit exactly on the hour (minute and second zero).
    pub fn retain_on_the_hour(&mut self) {
        self.0.retain(|s| s.ts.minute() == 0 && s.ts.second() == 0);
    }

    /// Replace each value with its difference from the previous row. The
    /// first row has no predecessor; its value is forced to `0.0` rather
    /// than left undefined.
    pub fn diff(&mut self) {
        let mut prev: Option<f64> = None;
        for s in &mut self.0 {
            let raw = s.value;
            s.value = match prev {
                Some(p) => raw - p,
                None => 0.0,
            };
            prev = Some(raw);
        }
    }

    /// Resample to exactly one row per hour, averaging all samples that fall
    /// in that hour. Hours inside the range with no samples produce no row.
    ///
    /// Buckets are hour floors of the UTC instant, converted back to
    /// Europe/Paris for the output timestamp (Paris offsets are whole hours,
    /// so UTC-hour buckets coincide with local-hour buckets, including
    /// across DST transitions).
    ///
    /// Assumes the series is sorted by timestamp.
    #[must_use]
    pub fn resample_hourly_mean(&self) -> Self {
        let mut out: Vec<Sample> = Vec::new();
        let mut cur_bucket: Option<i64> = None;
        let mut sum = 0.0;
        let mut count = 0u32;

        let flush = |out: &mut Vec<Sample>, bucket: i64, sum: f64, count: u32| {
            // count > 0 by construction; empty hours never open a bucket
            let ts = Utc
                .timestamp_opt(bucket * HOUR, 0)
                .single()
                .map(|t| t.with_timezone(&PROVIDER_TZ));
            if let Some(ts) = ts {
                out.push(Sample {
                    ts,
                    value: sum / f64::from(count),
                });
            }
        };

        for s in &self.0 {
            let bucket = s.ts.timestamp().div_euclid(HOUR);
            match cur_bucket {
                Some(b) if b == bucket => {
                    sum += s.value;
                    count += 1;
                }
                Some(b) => {
                    flush(&mut out, b, sum, count);
                    cur_bucket = Some(bucket);
                    sum = s.value;
                    count = 1;
                }
                None => {
                    cur_bucket = Some(bucket);
                    sum = s.value;
                    count = 1;
                }
            }
        }
        if let Some(b) = cur_bucket {
            flush(&mut out, b, sum, count);
        }
        Self(out)
    }
}

impl IntoIterator for Series {
    type Item = Sample;
    type IntoIter = std::vec::IntoIter<Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<Sample> for Series {
    fn from_iter<I: IntoIterator<Item = Sample>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parse a provider timestamp as UTC and convert it to Europe/Paris.
///
/// The provider emits either RFC 3339 strings (offset-aware) or naive
/// `YYYY-MM-DD HH:MM:SS` / `YYYY-MM-DDTHH:MM:SS` strings; naive timestamps
/// are interpreted as UTC.
///
/// # Errors
/// Returns `GvError::Decode` when the string matches none of the accepted
/// shapes.
pub fn parse_provider_ts(raw: &str) -> Result<DateTime<Tz>, GvError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&PROVIDER_TZ));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(naive.and_utc().with_timezone(&PROVIDER_TZ));
        }
    }
    Err(GvError::decode(format!("unparseable timestamp {raw:?}")))
}

/// Format a timestamp the way the provider's write endpoint expects
/// (`YYYY-MM-DD HH:MM:SS`, local Paris time).
#[must_use]
pub fn format_provider_ts(ts: DateTime<Tz>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}
