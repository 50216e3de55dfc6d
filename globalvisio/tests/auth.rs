use globalvisio::{GvClient, GvError};
use httpmock::prelude::*;
use serde_json::json;

fn client_for(server: &MockServer) -> GvClient {
    GvClient::builder("alice", "s3cret")
        .base_url(server.base_url())
        .build()
        .unwrap()
}

#[test]
fn cached_token_is_reused_without_a_network_call() {
    let server = MockServer::start();
    let auth = server.mock(|when, then| {
        when.method(POST)
            .path("/api/auth/token")
            .json_body(json!({"username": "alice", "password": "s3cret"}));
        then.status(200).json_body(json!({
            "response": {"token": "tok-1", "expiration": "2999-01-01T00:00:00+01:00"}
        }));
    });

    let client = client_for(&server);
    assert_eq!(client.get_token().unwrap(), "tok-1");
    assert_eq!(client.get_token().unwrap(), "tok-1");
    assert_eq!(client.get_token().unwrap(), "tok-1");

    // Only the first call hit the wire.
    auth.assert_hits(1);
}

#[test]
fn expired_token_triggers_exactly_one_refresh_per_call() {
    let server = MockServer::start();
    let auth = server.mock(|when, then| {
        when.method(POST).path("/api/auth/token");
        then.status(200).json_body(json!({
            "response": {"token": "tok-old", "expiration": "2020-01-01T00:00:00+01:00"}
        }));
    });

    let client = client_for(&server);
    // The returned expiration is already in the past, so every get_token
    // goes back to the auth endpoint.
    assert_eq!(client.get_token().unwrap(), "tok-old");
    assert_eq!(client.get_token().unwrap(), "tok-old");
    auth.assert_hits(2);
}

#[test]
fn auth_failure_carries_the_provider_message_and_leaves_cache_untouched() {
    let server = MockServer::start();
    let denied = server.mock(|when, then| {
        when.method(POST).path("/api/auth/token");
        then.status(401)
            .json_body(json!({"message": "identifiants invalides"}));
    });

    let client = client_for(&server);
    let err = client.get_token().unwrap_err();
    match err {
        GvError::Auth { message } => assert_eq!(message, "identifiants invalides"),
        other => panic!("expected Auth error, got {other:?}"),
    }
    denied.assert_hits(1);

    // Still no cached token: the next call goes back to the wire.
    let _ = client.get_token();
    denied.assert_hits(2);
}

#[test]
fn rate_limit_header_updates_the_quota_gauge_even_on_failure() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/api/auth/token");
        then.status(401)
            .header("X-RateLimit-Remaining", "4998")
            .json_body(json!({"message": "non"}));
    });

    let client = client_for(&server);
    assert_eq!(client.remaining_day_requests(), None);
    let _ = client.get_token();
    assert_eq!(client.remaining_day_requests(), Some(4998));
}

#[test]
fn check_credentials_does_not_populate_the_token_cache() {
    let server = MockServer::start();
    let auth = server.mock(|when, then| {
        when.method(POST).path("/api/auth/token");
        then.status(200).json_body(json!({
            "response": {"token": "tok-2", "expiration": "2999-01-01T00:00:00+01:00"}
        }));
    });

    let client = client_for(&server);
    client.check_credentials().unwrap();
    auth.assert_hits(1);

    // get_token must still fetch for itself.
    assert_eq!(client.get_token().unwrap(), "tok-2");
    auth.assert_hits(2);
}

#[test]
fn data_requests_fall_back_to_the_token_flow_without_an_api_key() {
    let server = MockServer::start();
    let auth = server.mock(|when, then| {
        when.method(POST).path("/api/auth/token");
        then.status(200).json_body(json!({
            "response": {"token": "tok-3", "expiration": "2999-01-01T00:00:00+01:00"}
        }));
    });
    let sites = server.mock(|when, then| {
        when.method(GET)
            .path("/api/sites/index")
            .header("authorization", "Bearer tok-3");
        then.status(200)
            .json_body(json!({"response": {"sites": [{"id": 1, "nom": "Site A"}]}}));
    });

    let client = client_for(&server);
    let rows = client.sites().unwrap();
    assert_eq!(rows.len(), 1);
    auth.assert_hits(1);
    sites.assert_hits(1);
}

#[test]
fn api_key_is_preferred_over_the_token_flow() {
    let server = MockServer::start();
    let auth = server.mock(|when, then| {
        when.method(POST).path("/api/auth/token");
        then.status(500);
    });
    let sites = server.mock(|when, then| {
        when.method(GET)
            .path("/api/sites/index")
            .header("authorization", "Bearer key-1");
        then.status(200)
            .json_body(json!({"response": {"sites": [{"id": 1, "nom": "Site A"}]}}));
    });

    let client = GvClient::builder("alice", "s3cret")
        .base_url(server.base_url())
        .api_key("key-1")
        .build()
        .unwrap();
    client.sites().unwrap();
    auth.assert_hits(0);
    sites.assert_hits(1);
}
