//! End-to-end tests of the HTTP surface over a real TCP listener.

use path_counter::http::{CountBody, ErrorBody};
use path_counter::security::DECOY_URL;
use reqwest::header::{ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use std::collections::HashSet;

mod common;

#[tokio::test]
async fn test_first_hits_count_from_one() {
    let server = common::start_default().await;
    let client = common::client();

    let res = client.get(server.url("/hello/world")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await.unwrap(), r#"{"count":1}"#);

    let res = client.get(server.url("/hello/world")).send().await.unwrap();
    assert_eq!(res.text().await.unwrap(), r#"{"count":2}"#);

    let res = client.get(server.url("/hello")).send().await.unwrap();
    let body: CountBody = res.json().await.unwrap();
    assert_eq!(body.count, 1);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_landing_and_favicon() {
    let server = common::start_default().await;
    let client = common::client();

    let res = client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[CONTENT_TYPE], "text/plain");
    assert_eq!(res.text().await.unwrap(), "1");

    let res = client.get(server.url("/favicon.ico")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await.unwrap().is_empty());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_preflight_and_cors_headers() {
    let server = common::start_default().await;
    let client = common::client();

    let res = client
        .request(Method::OPTIONS, server.url("/some/counter"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_METHODS], "GET, OPTIONS");

    // The preflight must not have counted.
    let res = client.get(server.url("/some/counter")).send().await.unwrap();
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let body: CountBody = res.json().await.unwrap();
    assert_eq!(body.count, 1);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_configured_origin() {
    let config = path_counter::CounterConfig {
        cors_origin: "https://example.org".into(),
        ..Default::default()
    };
    let server = common::start_server(std::sync::Arc::new(path_counter::MemoryStore::new()), config).await;

    let res = common::client().get(server.url("/x")).send().await.unwrap();
    assert_eq!(res.headers()[ACCESS_CONTROL_ALLOW_ORIGIN], "https://example.org");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_method_not_allowed() {
    let server = common::start_default().await;
    let client = common::client();

    for method in [Method::POST, Method::PUT, Method::DELETE] {
        let res = client.request(method, server.url("/counter")).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        let body: ErrorBody = res.json().await.unwrap();
        assert_eq!(body.error, "Method not allowed");
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_scanner_paths_redirect() {
    let server = common::start_default().await;
    let client = common::client();

    for path in ["/admin", "/.env", "/wp-login.php", "/phpmyadmin/index.php", "/actuator/env", "/server-status"] {
        let res = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::FOUND, "{path}");
        assert_eq!(res.headers()[LOCATION], DECOY_URL);
    }

    let res = client.post(server.url("/config.json")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_invalid_key() {
    let server = common::start_default().await;
    let client = common::client();

    let res = client.get(server.url("/bad%7Ekey")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = res.json().await.unwrap();
    assert_eq!(body.error, "Key contains invalid characters");

    server.stop().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_hits_are_consecutive() {
    let server = common::start_default().await;
    let client = common::client();
    let n = 100;

    let mut handles = Vec::with_capacity(n);
    for _ in 0..n {
        let client = client.clone();
        let url = server.url("/race/key");
        handles.push(tokio::spawn(async move {
            let res = client.get(url).send().await.unwrap();
            assert_eq!(res.status(), StatusCode::OK);
            res.json::<CountBody>().await.unwrap().count
        }));
    }

    let mut seen = HashSet::new();
    for h in handles {
        assert!(seen.insert(h.await.unwrap()), "duplicate count");
    }
    assert_eq!(seen, (1..=n as i64).collect::<HashSet<_>>());

    server.stop().await.unwrap();
}
