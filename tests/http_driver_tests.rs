// Copyright (c) 2025 - Cowboy AI, Inc.
//! HTTP driver tests: latest-request-per-URL switching and URL filtering

use futures::stream::StreamExt;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

use cycle_runtime::driver::http::{HttpRequest, HttpResponse, HttpSource};
use cycle_runtime::driver::{Driver, HttpDriver, StaticTransport};
use cycle_runtime::stream::proxy;
use cycle_runtime::{Payload, PayloadStream};

const USERS: &str = "http://api.test/users/1";
const POSTS: &str = "http://api.test/posts/1";

fn transport() -> StaticTransport {
    StaticTransport::new()
        .route(USERS, 200, json!({"name": "Leanne Graham"}))
        .route(POSTS, 200, json!({"title": "sunt aut facere"}))
        .with_latency(Duration::from_millis(100))
}

fn responses(source: PayloadStream) -> futures::stream::BoxStream<'static, HttpResponse> {
    source
        .filter_map(|payload| futures::future::ready(payload.into_response()))
        .boxed()
}

#[tokio::test(start_paused = true)]
async fn test_newer_request_supersedes_older_one() {
    let transport = transport();
    let (feed, requests) = proxy::channel::<Payload>();
    let output = Box::new(HttpDriver::new(Arc::new(transport.clone())))
        .drive(requests.stream())
        .unwrap();
    let mut responses = responses(output.source.unwrap());
    let start = Instant::now();

    feed.push(Payload::Request(HttpRequest::get(USERS)));
    tokio::time::sleep(Duration::from_millis(10)).await;
    feed.push(Payload::Request(HttpRequest::get(USERS)));

    let response = responses.next().await.unwrap();
    assert_eq!(response.request.url, USERS);
    // Only the second request, sent at 10ms, completes
    assert!(start.elapsed() >= Duration::from_millis(110));

    let late = tokio::time::timeout(Duration::from_secs(1), responses.next()).await;
    assert!(late.is_err(), "superseded request must not respond");
    assert_eq!(transport.sent().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_requests_for_different_urls_run_side_by_side() {
    let (feed, requests) = proxy::channel::<Payload>();
    let output = Box::new(HttpDriver::new(Arc::new(transport())))
        .drive(requests.stream())
        .unwrap();
    let mut responses = responses(output.source.unwrap());

    feed.push(Payload::Request(HttpRequest::get(USERS)));
    feed.push(Payload::Request(HttpRequest::get(POSTS)));

    let mut urls = vec![
        responses.next().await.unwrap().request.url,
        responses.next().await.unwrap().request.url,
    ];
    urls.sort();
    assert_eq!(urls, vec![POSTS.to_string(), USERS.to_string()]);
}

#[tokio::test]
async fn test_http_source_selects_exact_url() {
    let (feed, source) = proxy::channel::<Payload>();
    let http = HttpSource::new(source);
    let mut users = http.responses(USERS);

    for url in [POSTS, "http://api.test/users/10", USERS] {
        feed.push(Payload::Response(HttpResponse {
            request_id: uuid::Uuid::now_v7(),
            request: HttpRequest::get(url),
            status: 200,
            body: json!(null),
        }));
    }

    let response = users.next().await.unwrap();
    assert_eq!(response.request.url, USERS);
}
