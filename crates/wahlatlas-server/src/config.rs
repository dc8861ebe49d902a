use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_WAHLATLAS_LOG: &str = "WAHLATLAS_LOG";
pub const ENV_WAHLATLAS_BIND_ADDR: &str = "WAHLATLAS_BIND_ADDR";
pub const ENV_WAHLATLAS_CACHE_DIR: &str = "WAHLATLAS_CACHE_DIR";
const ENV_WAHLATLAS_FETCH_TIMEOUT_MS: &str = "WAHLATLAS_FETCH_TIMEOUT_MS";
const ENV_WAHLATLAS_POLL_INTERVAL_MS: &str = "WAHLATLAS_POLL_INTERVAL_MS";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3080";
const DEFAULT_FETCH_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

fn env_string(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .unwrap_or(default)
}

fn env_duration_ms(name: &str, default_ms: u64) -> Duration {
    Duration::from_millis(env_u64(name, default_ms))
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub cache_dir: PathBuf,
    pub fetch_timeout: Duration,
    pub poll_interval: Duration,
}

impl ServerConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            bind_addr: env_string(ENV_WAHLATLAS_BIND_ADDR, DEFAULT_BIND_ADDR),
            cache_dir: resolve_cache_dir(),
            fetch_timeout: env_duration_ms(ENV_WAHLATLAS_FETCH_TIMEOUT_MS, DEFAULT_FETCH_TIMEOUT_MS),
            poll_interval: env_duration_ms(ENV_WAHLATLAS_POLL_INTERVAL_MS, DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

/// Cache directory cascade: explicit override, XDG cache home, `~/.cache`,
/// relative fallback.
#[must_use]
pub fn resolve_cache_dir() -> PathBuf {
    if let Ok(explicit) = env::var(ENV_WAHLATLAS_CACHE_DIR) {
        let trimmed = explicit.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    if let Ok(xdg_cache_home) = env::var("XDG_CACHE_HOME") {
        let trimmed = xdg_cache_home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed).join("wahlatlas");
        }
    }

    if let Ok(home) = env::var("HOME") {
        let trimmed = home.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed).join(".cache").join("wahlatlas");
        }
    }

    PathBuf::from(".wahlatlas").join("cache")
}
