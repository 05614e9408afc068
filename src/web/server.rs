use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_governor::{governor::GovernorConfigBuilder, GovernorLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;

use crate::alignment::{align_checked, AlignmentResult, ScoringScheme};
use crate::catalog::store::SpeciesCatalog;
use crate::cli::{load_catalog, ServeArgs};
use crate::core::species::SpeciesEntry;
use crate::core::types::SpeciesId;
use crate::matching::lookup::{ItsLookup, LookupError};
use crate::matching::{SearchAggregator, SearchConfig, SearchResults};
use crate::utils::validation::validate_search_query;

/// Maximum accepted request body. Two sequences at the length cap fit with room to spare.
pub const MAX_REQUEST_BODY_SIZE: usize = 64 * 1024;

/// Shared application state
pub struct AppState {
    pub catalog: SpeciesCatalog,
    pub scoring: ScoringScheme,
    pub search_config: SearchConfig,
}

impl AppState {
    /// State with default scoring and search configuration
    #[must_use]
    pub fn new(catalog: SpeciesCatalog) -> Self {
        Self {
            catalog,
            scoring: ScoringScheme::default(),
            search_config: SearchConfig::default(),
        }
    }
}

/// Error body returned by every endpoint
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Deserialize)]
struct AlignRequest {
    sequence1: String,
    sequence2: String,
}

#[derive(Deserialize)]
struct ItsLookupRequest {
    sequence: String,
}

/// Species record as returned by the ITS lookup
#[derive(Debug, Serialize)]
struct SpeciesSummary<'a> {
    id: SpeciesId,
    scientific_name: &'a str,
    common_name: &'a str,
    image_url: Option<&'a str>,
    description: Option<&'a str>,
}

impl<'a> From<&'a SpeciesEntry> for SpeciesSummary<'a> {
    fn from(entry: &'a SpeciesEntry) -> Self {
        Self {
            id: entry.id,
            scientific_name: &entry.scientific_name,
            common_name: entry.primary_common_name(),
            image_url: entry.image_url.as_deref(),
            description: entry.description.as_deref(),
        }
    }
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    limit: Option<usize>,
}

#[derive(Serialize)]
struct SearchResponse {
    query: String,
    #[serde(flatten)]
    results: SearchResults,
}

/// Create a safe error response that prevents information disclosure
/// while logging detailed errors server-side for debugging
pub fn create_safe_error_response(
    error_type: &str,
    user_message: &str,
    internal_error: Option<&str>,
) -> ErrorResponse {
    if let Some(internal_msg) = internal_error {
        tracing::error!("Internal error ({}): {}", error_type, internal_msg);
    }

    ErrorResponse {
        error: user_message.to_string(),
        error_type: error_type.to_string(),
        details: None,
    }
}

fn error_response(status: StatusCode, error_type: &str, user_message: &str) -> Response {
    (
        status,
        Json(create_safe_error_response(error_type, user_message, None)),
    )
        .into_response()
}

/// 500 with a generic `details` string; the real cause only goes to the log
fn internal_error_response(user_message: &str, internal_error: &str) -> Response {
    let mut body = create_safe_error_response("internal_error", user_message, Some(internal_error));
    body.details = Some("An unexpected error occurred while processing the request".to_string());
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Run the web server
///
/// # Errors
///
/// Returns an error if the tokio runtime cannot be created or the server fails to start.
pub fn run(args: ServeArgs) -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move { run_server(args).await })
}

/// API routes over the given state, with the body-size limit but without the
/// per-IP rate limiter (which needs connection info).
pub fn api_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/align", post(align_handler))
        .route("/api/its-lookup", post(its_lookup_handler))
        .route("/api/search", get(search_handler))
        .route("/api/species/{id}", get(species_handler))
        .route("/api/catalog", get(catalog_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_SIZE))
}

/// Create the application router with all routes and middleware configured.
///
/// # Errors
///
/// Returns an error if the rate limiter configuration is rejected.
pub fn create_router_with_catalog(catalog: SpeciesCatalog) -> anyhow::Result<Router> {
    let state = Arc::new(AppState::new(catalog));

    // Configure IP-based rate limiting
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(10) // 10 requests per second per IP
        .burst_size(50) // Allow bursts of 50 requests
        .finish()
        .ok_or_else(|| anyhow::anyhow!("invalid rate limiter configuration"))?;

    let app = api_router(state).layer(
        ServiceBuilder::new()
            // Security headers for browser protection
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-content-type-options"),
                HeaderValue::from_static("nosniff"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("x-frame-options"),
                HeaderValue::from_static("DENY"),
            ))
            .layer(SetResponseHeaderLayer::if_not_present(
                HeaderName::from_static("referrer-policy"),
                HeaderValue::from_static("strict-origin-when-cross-origin"),
            ))
            .layer(GovernorLayer {
                config: Arc::new(governor_conf),
            })
            // Alignment at the length cap finishes well inside this
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                Duration::from_secs(30),
            ))
            .layer(ConcurrencyLimitLayer::new(100)),
    );

    Ok(app)
}

async fn run_server(args: ServeArgs) -> anyhow::Result<()> {
    let catalog = load_catalog(args.catalog.as_deref())?;
    let app = create_router_with_catalog(catalog)?;

    let addr = format!("{}:{}", args.address, args.port);
    println!("Starting myco-search API at http://{addr}");
    tracing::info!(%addr, "listening");

    if args.open {
        let _ = open::that(format!("http://{addr}/api/catalog"));
    }

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Global alignment of two sequences
async fn align_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: AlignRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "rejected align request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "Both sequence1 and sequence2 are required and must be strings",
            );
        }
    };

    let scheme = state.scoring;
    let outcome = tokio::task::spawn_blocking(move || {
        align_checked(&request.sequence1, &request.sequence2, &scheme)
    })
    .await;

    match outcome {
        Ok(Ok(result)) => Json::<AlignmentResult>(result).into_response(),
        Ok(Err(e)) => error_response(StatusCode::BAD_REQUEST, "validation_error", &e.to_string()),
        Err(e) => internal_error_response(
            "Internal server error during sequence alignment",
            &format!("alignment task failed: {e}"),
        ),
    }
}

/// Exact species identification from an ITS sequence
async fn its_lookup_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: ItsLookupRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "rejected ITS lookup request body");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "sequence is required and must be a string",
            );
        }
    };

    match ItsLookup::new(&state.catalog).lookup_by_its(&request.sequence) {
        Ok(entry) => Json(SpeciesSummary::from(entry)).into_response(),
        Err(LookupError::InvalidInput(e)) => {
            error_response(StatusCode::BAD_REQUEST, "validation_error", &e.to_string())
        }
        Err(LookupError::NotFound) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            "No species matches the provided ITS sequence",
        ),
        // Logged by the lookup; the client only sees a neutral 404
        Err(LookupError::InconsistentMapping { .. }) => error_response(
            StatusCode::NOT_FOUND,
            "not_found",
            "Species record not found",
        ),
    }
}

/// Merged species suggestions for a name or sequence query
async fn search_handler(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(e) => {
            tracing::debug!(error = %e, "rejected search parameters");
            return error_response(
                StatusCode::BAD_REQUEST,
                "invalid_request",
                "Invalid query parameters: q must be text and limit a non-negative integer",
            );
        }
    };

    let Some(raw_query) = params.q else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "Query parameter q is required",
        );
    };

    let query = match validate_search_query(&raw_query) {
        Ok(query) => query,
        Err(e) => {
            return error_response(StatusCode::BAD_REQUEST, "validation_error", &e.to_string())
        }
    };

    let limit = params.limit.unwrap_or(state.search_config.result_limit);
    let results = SearchAggregator::for_catalog(&state.catalog, &state.search_config).search(query, limit);

    Json(SearchResponse {
        query: query.to_string(),
        results,
    })
    .into_response()
}

/// Full species record by id
async fn species_handler(
    State(state): State<Arc<AppState>>,
    id: Result<Path<SpeciesId>, PathRejection>,
) -> Response {
    let Ok(Path(id)) = id else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            "Species id must be a non-negative integer",
        );
    };

    match state.catalog.get(id) {
        Some(entry) => Json(entry).into_response(),
        None => error_response(StatusCode::NOT_FOUND, "not_found", "Species not found"),
    }
}

async fn catalog_handler(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let species: Vec<serde_json::Value> = state
        .catalog
        .species
        .iter()
        .map(|s| {
            serde_json::json!({
                "id": s.id,
                "scientific_name": s.scientific_name,
                "common_name": s.primary_common_name(),
                "image_url": s.image_url,
            })
        })
        .collect();

    Json(serde_json::json!({
        "count": species.len(),
        "its_mappings": state.catalog.its_mapping_count(),
        "species": species,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_error_response_hides_details() {
        let response = create_safe_error_response(
            "internal_error",
            "Something went wrong",
            Some("secret path /var/lib/catalog.json"),
        );
        assert_eq!(response.error, "Something went wrong");
        assert!(response.details.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("details").is_none());
        assert!(!json.to_string().contains("/var/lib"));
    }

    #[test]
    fn test_full_router_builds_with_security_layers() {
        let catalog = SpeciesCatalog::load_embedded().unwrap();
        assert!(create_router_with_catalog(catalog).is_ok());
    }

    #[test]
    fn test_species_summary_shape() {
        let entry = SpeciesEntry::new(3, "Boletus edulis")
            .with_common_names(["Porcini", "Cep"])
            .with_image_url("https://example.org/boletus.jpg");
        let json = serde_json::to_value(SpeciesSummary::from(&entry)).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["scientific_name"], "Boletus edulis");
        assert_eq!(json["common_name"], "Porcini");
        assert_eq!(json["image_url"], "https://example.org/boletus.jpg");
        assert!(json["description"].is_null());

        let described = entry.with_description("Prized edible bolete");
        let json = serde_json::to_value(SpeciesSummary::from(&described)).unwrap();
        assert_eq!(json["description"], "Prized edible bolete");
    }
}
