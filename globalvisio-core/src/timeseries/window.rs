use chrono::{Days, NaiveDate};

use crate::GvError;

/// Which range endpoint a query targets; each has its own provider-imposed
/// maximum span per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeKind {
    /// Hourly history (`/api/points/history`), limited to 88 days.
    History,
    /// Daily consumption (`/api/points/consumption`), limited to 364 days.
    Consumption,
}

impl RangeKind {
    /// Maximum length of one query window, in days.
    #[must_use]
    pub const fn max_days(self) -> u64 {
        match self {
            Self::History => 88,
            Self::Consumption => 364,
        }
    }
}

/// One bounded sub-range of a caller-requested date range. Bounds are
/// inclusive calendar dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

/// Partition `[start, end]` into consecutive windows no longer than the
/// kind's maximum span. Windows are disjoint and cover the whole range:
/// each window's start is the previous window's end plus one day.
///
/// `start == end` yields an empty partition (the fetch loop performs zero
/// iterations).
///
/// # Errors
/// Returns `GvError::InvalidArg` when `start > end`.
pub fn partition(start: NaiveDate, end: NaiveDate, kind: RangeKind) -> Result<Vec<Window>, GvError> {
    if start > end {
        return Err(GvError::InvalidArg(format!(
            "range start {start} is after end {end}"
        )));
    }
    let max = Days::new(kind.max_days());
    let one_day = Days::new(1);

    let mut windows = Vec::new();
    let mut cursor = start;
    while cursor < end {
        let sub_end = cursor
            .checked_add_days(max)
            .map_or(end, |capped| capped.min(end));
        windows.push(Window {
            start: cursor,
            end: sub_end,
        });
        let Some(next) = sub_end.checked_add_days(one_day) else {
            break;
        };
        cursor = next;
    }
    Ok(windows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn equal_bounds_yield_no_windows() {
        let w = partition(d("2024-01-01"), d("2024-01-01"), RangeKind::History).unwrap();
        assert!(w.is_empty());
    }

    #[test]
    fn reversed_bounds_are_rejected() {
        let err = partition(d("2024-02-01"), d("2024-01-01"), RangeKind::History).unwrap_err();
        assert!(matches!(err, GvError::InvalidArg(_)));
    }

    #[test]
    fn short_range_is_a_single_window() {
        let w = partition(d("2024-01-01"), d("2024-01-10"), RangeKind::History).unwrap();
        assert_eq!(
            w,
            vec![Window {
                start: d("2024-01-01"),
                end: d("2024-01-10")
            }]
        );
    }
}
