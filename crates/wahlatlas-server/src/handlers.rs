use crate::{AppState, CRATE_NAME};
use axum::extract::{Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::{error, info};
use wahlatlas_model::{resolve_district_id, StateKey};
use wahlatlas_scrape::AcquireRequest;

fn make_request_id(state: &AppState) -> String {
    let id = state.request_id_seed.fetch_add(1, Ordering::Relaxed);
    format!("req-{id:016x}")
}

fn with_request_id(mut response: Response, request_id: &str) -> Response {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub(crate) async fn version_handler(State(state): State<AppState>) -> Response {
    let request_id = make_request_id(&state);
    let payload = json!({
        "server": {
            "crate": CRATE_NAME,
            "version": env!("CARGO_PKG_VERSION"),
        },
        "sources": StateKey::ALL.iter().map(|key| key.as_str()).collect::<Vec<_>>(),
    });
    let mut response = Json(payload).into_response();
    if let Ok(value) = HeaderValue::from_str("public, max-age=30") {
        response.headers_mut().insert("cache-control", value);
    }
    with_request_id(response, &request_id)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DistrictResultParams {
    electoral_district: Option<String>,
    state: Option<String>,
    state_number: Option<String>,
    name: Option<String>,
}

/// The acquisition endpoint. Missing parameters are the caller's fault
/// (400); an unregistered state, a navigation failure or a cache-read
/// failure are pipeline failures (500). Either way the body is a single
/// `{ "error": … }` object, never a partial result.
pub(crate) async fn district_result_handler(
    State(state): State<AppState>,
    Query(params): Query<DistrictResultParams>,
) -> Response {
    let request_id = make_request_id(&state);
    let started = Instant::now();

    let Some(district) = params
        .electoral_district
        .as_deref()
        .map(str::trim)
        .filter(|district| !district.is_empty())
    else {
        return with_request_id(
            error_response(StatusCode::BAD_REQUEST, "electoralDistrict is required"),
            &request_id,
        );
    };
    let Some(state_param) = params
        .state
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
    else {
        return with_request_id(
            error_response(StatusCode::BAD_REQUEST, "state is required"),
            &request_id,
        );
    };

    let state_key = match StateKey::parse(state_param) {
        Ok(key) => key,
        Err(err) => {
            error!(request_id = %request_id, "district resolution failed: {err}");
            return with_request_id(
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
                &request_id,
            );
        }
    };

    let request = AcquireRequest {
        state: state_key,
        district: district.to_string(),
        state_number: params.state_number,
        name: params.name,
    };

    match state.pipeline.acquire(&request).await {
        Ok(result) => {
            info!(
                request_id = %request_id,
                state = state_key.as_str(),
                district = %request.district,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "district result served"
            );
            with_request_id(Json(result).into_response(), &request_id)
        }
        Err(err) => {
            error!(request_id = %request_id, "district acquisition failed: {err}");
            with_request_id(
                error_response(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string()),
                &request_id,
            )
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ResolveBody {
    state: String,
    properties: Map<String, Value>,
}

/// Feature-click helper: derives the district id a source expects from a
/// GeoJSON property bag.
pub(crate) async fn resolve_handler(
    State(state): State<AppState>,
    Json(body): Json<ResolveBody>,
) -> Response {
    let request_id = make_request_id(&state);

    let state_key = match StateKey::parse(&body.state) {
        Ok(key) => key,
        Err(err) => {
            return with_request_id(
                error_response(StatusCode::BAD_REQUEST, &err.to_string()),
                &request_id,
            )
        }
    };

    match resolve_district_id(state_key, &body.properties) {
        Ok(district) => with_request_id(
            Json(json!({ "state": state_key.as_str(), "district": district })).into_response(),
            &request_id,
        ),
        Err(err) => with_request_id(
            error_response(StatusCode::BAD_REQUEST, &err.to_string()),
            &request_id,
        ),
    }
}
