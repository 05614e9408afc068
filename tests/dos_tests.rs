//! `DoS` Attack Simulation and Prevention Tests
//!
//! The alignment and edit-distance algorithms are O(n·m) with no early exit.
//! These tests verify that oversized input is rejected at the boundary before
//! any matrix is allocated, and that concurrent requests stay independent.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tokio::time::timeout;
use tower::ServiceExt;

use myco_search::utils::validation::{
    MAX_QUERY_LENGTH, MAX_RESULT_LIMIT, MAX_SEQUENCE_LENGTH,
};
use myco_search::web::server::{api_router, AppState, MAX_REQUEST_BODY_SIZE};
use myco_search::SpeciesCatalog;

fn app() -> Router {
    let catalog = SpeciesCatalog::load_embedded().unwrap();
    api_router(Arc::new(AppState::new(catalog)))
}

async fn post_align(app: Router, sequence1: &str, sequence2: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/align")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "sequence1": sequence1, "sequence2": sequence2 }).to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

/// Sequences past the cap are rejected with 400, not aligned
#[tokio::test]
async fn test_oversized_sequence_rejected() {
    let too_long = "A".repeat(MAX_SEQUENCE_LENGTH + 1);

    let start = Instant::now();
    let (status, body) = post_align(app(), &too_long, "ACGT").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
    assert!(
        start.elapsed() < Duration::from_secs(5),
        "Rejection should not depend on running the alignment"
    );

    let (status, _) = post_align(app(), "ACGT", &too_long).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Sequences exactly at the cap are still served
#[tokio::test]
async fn test_sequence_at_cap_accepted() {
    let at_cap = "ACGT".repeat(MAX_SEQUENCE_LENGTH / 4);
    assert_eq!(at_cap.len(), MAX_SEQUENCE_LENGTH);

    let result = timeout(Duration::from_secs(60), post_align(app(), &at_cap, &at_cap)).await;
    let (status, body) = result.expect("Alignment at the cap should finish promptly");

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], i64::try_from(MAX_SEQUENCE_LENGTH).unwrap());
}

/// Bodies above the request limit are refused before parsing
#[tokio::test]
async fn test_request_body_limit() {
    let padding = "A".repeat(MAX_REQUEST_BODY_SIZE + 1);
    let request = Request::builder()
        .method("POST")
        .uri("/api/align")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "sequence1": padding, "sequence2": "A" }).to_string(),
        ))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

/// The body limit leaves room for two sequences at the cap
#[test]
fn test_body_limit_fits_two_capped_sequences() {
    let envelope = r#"{"sequence1":"","sequence2":""}"#.len();
    assert!(2 * MAX_SEQUENCE_LENGTH + envelope < MAX_REQUEST_BODY_SIZE);
}

/// Overlong fuzzy queries are rejected instead of scanned
#[tokio::test]
async fn test_overlong_search_query_rejected() {
    let query = "a".repeat(MAX_QUERY_LENGTH + 1);
    let request = Request::builder()
        .uri(format!("/api/search?q={query}"))
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

/// Requested result limits are clamped
#[tokio::test]
async fn test_search_limit_clamped() {
    let request = Request::builder()
        .uri("/api/search?q=mushroom&limit=100000")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["hits"].as_array().unwrap().len() <= MAX_RESULT_LIMIT);
}

/// Concurrent alignments share nothing and return identical results
#[tokio::test]
async fn test_concurrent_alignments_deterministic() {
    let router = app();
    let mut handles = Vec::new();

    for _ in 0..16 {
        let router = router.clone();
        handles.push(tokio::spawn(async move {
            post_align(router, "AGTACGCA", "TATGC").await
        }));
    }

    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], -3);
        assert_eq!(body["alignment1"], "AGTACGCA");
        assert_eq!(body["alignment2"], "--TATGC-");
    }
}
