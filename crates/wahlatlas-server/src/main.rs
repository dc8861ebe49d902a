use std::process::ExitCode;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;
use wahlatlas_scrape::{HttpFetcher, PageFetcher, Pipeline, PipelineConfig};
use wahlatlas_server::{build_router, AppState, ServerConfig, ENV_WAHLATLAS_LOG};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(ENV_WAHLATLAS_LOG).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env();

    let fetcher: Arc<dyn PageFetcher> = match HttpFetcher::new(config.fetch_timeout) {
        Ok(fetcher) => Arc::new(fetcher),
        Err(err) => {
            error!("failed to build http client: {err}");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = Arc::new(Pipeline::new(
        PipelineConfig {
            cache_dir: config.cache_dir.clone(),
            poll_interval: config.poll_interval,
        },
        fetcher,
    ));
    let app = build_router(AppState::new(pipeline));

    let listener = match TcpListener::bind(&config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {}: {err}", config.bind_addr);
            return ExitCode::FAILURE;
        }
    };
    info!(
        addr = %config.bind_addr,
        cache_dir = %config.cache_dir.display(),
        "wahlatlas server listening"
    );

    if let Err(err) = axum::serve(listener, app).await {
        error!("server error: {err}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
