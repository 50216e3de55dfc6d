use chrono::DateTime;
use chrono_tz::Tz;
use globalvisio_core::{PROVIDER_TZ, Sample, Series, merge_windows, normalize};
use proptest::prelude::*;
use std::collections::HashSet;

fn arb_ts() -> impl Strategy<Value = DateTime<Tz>> {
    // A few years of hourly-ish timestamps, with sub-hour jitter.
    (1_600_000_000i64..1_700_000_000i64)
        .prop_map(|s| DateTime::from_timestamp(s, 0).unwrap().with_timezone(&PROVIDER_TZ))
}

fn arb_sample() -> impl Strategy<Value = Sample> {
    (arb_ts(), 0u32..1_000_000u32).prop_map(|(ts, v)| Sample {
        ts,
        value: f64::from(v) / 100.0,
    })
}

fn arb_tables() -> impl Strategy<Value = Vec<Series>> {
    proptest::collection::vec(
        proptest::collection::vec(arb_sample(), 0..50).prop_map(Series::from_samples),
        0..5,
    )
}

proptest! {
    #[test]
    fn normalize_is_deterministic(tables in arb_tables()) {
        let once = normalize(tables.clone());
        let twice = normalize(tables);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn merge_windows_output_has_unique_sorted_timestamps(tables in arb_tables()) {
        let Some(out) = merge_windows(tables) else { return Ok(()); };
        let ts: Vec<i64> = out.samples().iter().map(|s| s.ts.timestamp()).collect();
        let unique: HashSet<i64> = ts.iter().copied().collect();
        prop_assert_eq!(unique.len(), ts.len());
        let mut sorted = ts.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, ts);
    }

    #[test]
    fn merge_windows_keeps_minimum_value_per_timestamp(tables in arb_tables()) {
        let mut min_by_ts: std::collections::HashMap<i64, f64> = std::collections::HashMap::new();
        for t in &tables {
            for s in t.samples() {
                min_by_ts
                    .entry(s.ts.timestamp())
                    .and_modify(|v| *v = v.min(s.value))
                    .or_insert(s.value);
            }
        }
        let Some(out) = merge_windows(tables) else {
            prop_assert!(min_by_ts.is_empty());
            return Ok(());
        };
        prop_assert_eq!(out.len(), min_by_ts.len());
        for s in out.samples() {
            prop_assert_eq!(s.value, min_by_ts[&s.ts.timestamp()]);
        }
    }

    #[test]
    fn merge_windows_is_idempotent(tables in arb_tables()) {
        let Some(once) = merge_windows(tables) else { return Ok(()); };
        let twice = merge_windows(vec![once.clone()]).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn normalized_output_is_hourly_or_empty(tables in arb_tables()) {
        use chrono::Timelike;
        let Some(out) = normalize(tables) else { return Ok(()); };
        for s in out.samples() {
            prop_assert_eq!(s.ts.minute(), 0);
            prop_assert_eq!(s.ts.second(), 0);
        }
    }
}
