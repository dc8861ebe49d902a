#![forbid(unsafe_code)]

mod config;
mod handlers;

use axum::routing::{get, post};
use axum::Router;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use wahlatlas_scrape::Pipeline;

pub const CRATE_NAME: &str = "wahlatlas-server";

pub use config::{
    resolve_cache_dir, ServerConfig, ENV_WAHLATLAS_BIND_ADDR, ENV_WAHLATLAS_CACHE_DIR,
    ENV_WAHLATLAS_LOG,
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    pub(crate) request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(pipeline: Arc<Pipeline>) -> Self {
        Self {
            pipeline,
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route("/v1/version", get(handlers::version_handler))
        .route("/v1/district-result", get(handlers::district_result_handler))
        .route("/v1/resolve", post(handlers::resolve_handler))
        .with_state(state)
}
