//! HTTP API Tests
//!
//! Drives the API router in-process and checks status codes and response
//! bodies for every endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use myco_search::core::species::SpeciesEntry;
use myco_search::web::server::{api_router, AppState};
use myco_search::{SpeciesCatalog, SpeciesId};

fn app() -> Router {
    let catalog = SpeciesCatalog::load_embedded().unwrap();
    api_router(Arc::new(AppState::new(catalog)))
}

/// Catalog with an ITS mapping whose species record is missing
fn inconsistent_app() -> Router {
    let mut catalog = SpeciesCatalog::new();
    catalog
        .add_species(SpeciesEntry::new(1, "Amanita muscaria").with_common_names(["Fly Agaric"]))
        .unwrap();
    catalog
        .add_its_mapping("ACGTACGTACGT", SpeciesId::new(42))
        .unwrap();
    api_router(Arc::new(AppState::new(catalog)))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_align_classic_example() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/align",
            &json!({ "sequence1": "GATTACA", "sequence2": "GCATGCU" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], -1);
    assert_eq!(body["alignment1"], "GATTACA");
    assert_eq!(body["alignment2"], "GCATGCU");
}

#[tokio::test]
async fn test_align_empty_first_sequence() {
    let (status, body) = send(
        app(),
        post_json("/api/align", &json!({ "sequence1": "", "sequence2": "ATCG" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], -8);
    assert_eq!(body["alignment1"], "----");
    assert_eq!(body["alignment2"], "ATCG");
}

#[tokio::test]
async fn test_align_missing_field_is_bad_request() {
    let (status, body) = send(
        app(),
        post_json("/api/align", &json!({ "sequence1": "ACGT" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_request");
    assert!(body["error"].as_str().unwrap().contains("sequence2"));
}

#[tokio::test]
async fn test_align_wrong_type_is_bad_request() {
    let (status, _) = send(
        app(),
        post_json("/api/align", &json!({ "sequence1": 42, "sequence2": "ACGT" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_its_lookup_success() {
    let (status, body) = send(
        app(),
        post_json(
            "/api/its-lookup",
            &json!({ "sequence": " gtcgatgaagaacgcagcg " }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], 1);
    assert_eq!(body["scientific_name"], "Amanita muscaria");
    assert_eq!(body["common_name"], "Fly Agaric");
    assert!(body.get("image_url").is_some());
    assert!(body.get("description").is_some());
}

#[tokio::test]
async fn test_its_lookup_not_found() {
    let (status, body) = send(
        app(),
        post_json("/api/its-lookup", &json!({ "sequence": "AAAAAAAAAAAAAAAAAAAA" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "not_found");
}

#[tokio::test]
async fn test_its_lookup_missing_sequence() {
    let (status, _) = send(app(), post_json("/api/its-lookup", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app(),
        post_json("/api/its-lookup", &json!({ "sequence": ["ACGT"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_its_lookup_blank_sequence() {
    let (status, body) = send(
        app(),
        post_json("/api/its-lookup", &json!({ "sequence": "   " })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_its_lookup_inconsistent_mapping_is_neutral_404() {
    let (status, body) = send(
        inconsistent_app(),
        post_json("/api/its-lookup", &json!({ "sequence": "acgtacgtacgt" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    // The missing id stays in the server log
    assert!(!body.to_string().contains("42"));
}

#[tokio::test]
async fn test_search_fuzzy_name() {
    let (status, body) = send(app(), get("/api/search?q=fly%20agarik")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["query"], "fly agarik");
    let hits = body["hits"].as_array().unwrap();
    assert!(!hits.is_empty());
    assert_eq!(hits[0]["id"], "species:1");
    assert_eq!(hits[0]["matched"], "Fly Agaric");
    assert!(body.get("failed_sources").is_none());
}

#[tokio::test]
async fn test_search_by_its_sequence() {
    let (status, body) = send(app(), get("/api/search?q=GTCGATGAAGAACGCAGCG")).await;

    assert_eq!(status, StatusCode::OK);
    let hits = body["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["kind"], "sequence");
    assert_eq!(hits[0]["species_id"], 1);
}

#[tokio::test]
async fn test_search_limit() {
    let (status, body) = send(app(), get("/api/search?q=amanita&limit=1")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["hits"].as_array().unwrap().len() <= 1);
}

#[tokio::test]
async fn test_search_requires_query() {
    let (status, _) = send(app(), get("/api/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(app(), get("/api/search?q=%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "validation_error");
}

#[tokio::test]
async fn test_search_reports_failed_source() {
    let (status, body) = send(inconsistent_app(), get("/api/search?q=ACGTACGTACGT")).await;

    assert_eq!(status, StatusCode::OK);
    let failed = body["failed_sources"].as_array().unwrap();
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0]["source"], "its");
}

#[tokio::test]
async fn test_species_by_id() {
    let (status, body) = send(app(), get("/api/species/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["scientific_name"], "Boletus edulis");
    assert!(body["common_names"].as_array().unwrap().len() >= 1);

    let (status, _) = send(app(), get("/api/species/9999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(app(), get("/api/species/not-a-number")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_request");
}

#[tokio::test]
async fn test_search_bad_limit_is_json_error() {
    let (status, body) = send(app(), get("/api/search?q=morel&limit=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "invalid_request");
    assert!(body["error"].as_str().unwrap().contains("limit"));
}

#[tokio::test]
async fn test_search_full_length_its_region() {
    let its_region = "TCCGTAGGTG".repeat(24);
    let mut catalog = SpeciesCatalog::new();
    catalog
        .add_species(SpeciesEntry::new(2, "Cantharellus cibarius").with_common_names(["Chanterelle"]))
        .unwrap();
    catalog.add_its_mapping(&its_region, SpeciesId::new(2)).unwrap();
    let app = api_router(Arc::new(AppState::new(catalog)));

    let uri = format!("/api/search?q={}", its_region.to_lowercase());
    let (status, body) = send(app, get(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    let hits = body["hits"].as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["kind"], "sequence");
    assert_eq!(hits[0]["species_id"], 2);
    assert!(body.get("failed_sources").is_none());
}

#[tokio::test]
async fn test_catalog_listing() {
    let (status, body) = send(app(), get("/api/catalog")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 12);
    assert_eq!(body["species"].as_array().unwrap().len(), 12);
    assert_eq!(body["species"][0]["scientific_name"], "Amanita muscaria");
}
