use chrono::NaiveDate;
use globalvisio::{GvClient, GvError, Point, PointInfo};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> GvClient {
    GvClient::builder("alice", "s3cret")
        .base_url(server.base_url())
        .api_key("key-1")
        .build()
        .unwrap()
}

fn point(id: i64) -> Point {
    Point::from_info(PointInfo {
        id,
        device_id: 42,
        site_id: 10,
        automaton_label: None,
        human_label: Some("Conso générale".into()),
        last_value: None,
        last_value_date: None,
        kind: None,
        subkind: None,
        unit: Some("kWh".into()),
    })
}

fn d(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

#[test]
fn long_range_is_fetched_in_three_contiguous_windows() {
    let server = MockServer::start();
    let w1 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-01-01")
            .query_param("dateEnd", "2024-03-29");
        then.status(200).json_body(
            json!({"response": {"history": [{"date": "2024-01-10T00:00:00Z", "value": 100.0}]}}),
        );
    });
    let w2 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-03-30")
            .query_param("dateEnd", "2024-06-26");
        then.status(200).json_body(
            json!({"response": {"history": [{"date": "2024-04-10T00:00:00Z", "value": 105.0}]}}),
        );
    });
    let w3 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-06-27")
            .query_param("dateEnd", "2024-07-19");
        then.status(200).json_body(
            json!({"response": {"history": [{"date": "2024-07-01T00:00:00Z", "value": 115.0}]}}),
        );
    });

    let client = client_for(&server);
    let series = point(7)
        .history(&client, d("2024-01-01"), d("2024-07-19"))
        .unwrap()
        .unwrap();

    w1.assert_hits(1);
    w2.assert_hits(1);
    w3.assert_hits(1);

    // Monotonic readings classify as cumulative and are differenced,
    // first row forced to zero.
    let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![0.0, 5.0, 10.0]);
}

#[test]
fn incremental_samples_are_averaged_per_hour() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/points/history/7");
        then.status(200).json_body(json!({"response": {"history": [
            {"date": "2024-01-10T08:10:00Z", "value": 2.0},
            {"date": "2024-01-10T08:40:00Z", "value": 4.0},
            {"date": "2024-01-10T09:05:00Z", "value": 1.0}
        ]}}));
    });

    let client = client_for(&server);
    let series = point(7)
        .history(&client, d("2024-01-10"), d("2024-01-11"))
        .unwrap()
        .unwrap();
    let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
    assert_eq!(values, vec![3.0, 1.0]);
}

#[test]
fn a_failing_window_aborts_the_whole_fetch() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-01-01");
        then.status(200).json_body(
            json!({"response": {"history": [{"date": "2024-01-10T00:00:00Z", "value": 1.0}]}}),
        );
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-03-30");
        then.status(500).json_body(json!({"message": "erreur interne"}));
    });
    let w3 = server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-06-27");
        then.status(200).json_body(json!({"response": {"history": []}}));
    });

    let client = client_for(&server);
    let err = point(7)
        .history(&client, d("2024-01-01"), d("2024-07-19"))
        .unwrap_err();
    assert!(matches!(err, GvError::Api { status: 500, .. }));
    // Partial results are discarded and later windows never requested.
    w3.assert_hits(0);
}

#[test]
fn an_empty_window_is_skipped_not_fatal() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-01-01");
        then.status(200).json_body(json!({"response": {"history": []}}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/history/7")
            .query_param("dateStart", "2024-03-30");
        then.status(200).json_body(json!({"response": {"history": [
            {"date": "2024-03-30T10:00:00Z", "value": 3.0},
            {"date": "2024-03-30T11:00:00Z", "value": 2.0}
        ]}}));
    });

    let client = client_for(&server);
    let series = point(7)
        .history(&client, d("2024-01-01"), d("2024-03-31"))
        .unwrap()
        .unwrap();
    assert_eq!(series.len(), 2);
}

#[test]
fn equal_bounds_make_zero_requests_and_return_none() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET);
        then.status(200).json_body(json!({"response": {"history": []}}));
    });

    let client = client_for(&server);
    let out = point(7)
        .history(&client, d("2024-01-01"), d("2024-01-01"))
        .unwrap();
    assert!(out.is_none());
    any.assert_hits(0);
}

#[test]
fn daily_consumption_is_merged_without_differencing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/points/consumption/7")
            .query_param("dateStart", "2024-01-01")
            .query_param("dateEnd", "2024-02-01")
            .query_param("period", "2");
        then.status(200).json_body(json!({"response": {"consumption": [
            {"date": "2024-01-02T00:00:00Z", "value": 18.0},
            {"date": "2024-01-01T00:00:00Z", "value": 12.5}
        ]}}));
    });

    let client = client_for(&server);
    let series = point(7)
        .consumption_daily(&client, d("2024-01-01"), d("2024-02-01"))
        .unwrap()
        .unwrap();
    let values: Vec<f64> = series.samples().iter().map(|s| s.value).collect();
    // Sorted by timestamp, values untouched.
    assert_eq!(values, vec![12.5, 18.0]);
}
