// SPDX-License-Identifier: Apache-2.0

use crate::extract;
use crate::fetch::PageFetcher;
use crate::normalize::{normalize, Fragments, RequestMeta};
use crate::page::{NavigationError, PageSession};
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};
use wahlatlas_model::{
    render_url, source_descriptor, DistrictKey, DistrictResult, ExtractorKind, Fragment, StateKey,
    UrlError,
};
use wahlatlas_store::{ResultCache, StoreError};

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub cache_dir: PathBuf,
    /// Re-fetch interval for selector waits.
    pub poll_interval: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("cache"),
            poll_interval: Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquireRequest {
    pub state: StateKey,
    pub district: String,
    /// Only the federal source embeds a separate state index in its URL.
    pub state_number: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug)]
pub enum AcquireError {
    Resolve(UrlError),
    Navigation(NavigationError),
    Cache(StoreError),
}

impl Display for AcquireError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Resolve(err) => write!(f, "{err}"),
            Self::Navigation(err) => write!(f, "{err}"),
            Self::Cache(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for AcquireError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Resolve(err) => Some(err),
            Self::Navigation(err) => Some(err),
            Self::Cache(err) => Some(err),
        }
    }
}

/// Per-key in-flight lock so concurrent requests for the same uncached
/// district share one scrape; the latecomer re-checks the cache under the
/// lock and hits.
struct ScrapeCoalescer {
    inflight: Mutex<HashMap<DistrictKey, Arc<Mutex<()>>>>,
}

impl ScrapeCoalescer {
    fn new() -> Self {
        Self {
            inflight: Mutex::new(HashMap::new()),
        }
    }

    async fn acquire(&self, key: &DistrictKey) -> OwnedMutexGuard<()> {
        let lock = {
            let mut inflight = self.inflight.lock().await;
            Arc::clone(
                inflight
                    .entry(key.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        lock.lock_owned().await
    }
}

/// The acquisition pipeline: cache check, session, extractor join,
/// normalization, cache write. One browser-style session per request, never
/// pooled; all state is held by this struct, initialized once at startup.
pub struct Pipeline {
    cache: ResultCache,
    fetcher: Arc<dyn PageFetcher>,
    poll_interval: Duration,
    coalescer: ScrapeCoalescer,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: PipelineConfig, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            cache: ResultCache::new(config.cache_dir),
            fetcher,
            poll_interval: config.poll_interval,
            coalescer: ScrapeCoalescer::new(),
        }
    }

    pub async fn acquire(&self, request: &AcquireRequest) -> Result<DistrictResult, AcquireError> {
        let descriptor = source_descriptor(request.state);
        if !descriptor.cacheable {
            return self.scrape(request).await;
        }

        let key = DistrictKey::new(request.state, request.district.clone());
        let _guard = self.coalescer.acquire(&key).await;

        if let Some(cached) = self.cache.get(&key).map_err(AcquireError::Cache)? {
            info!(key = %key, "serving cached district result");
            return Ok(cached);
        }

        let result = self.scrape(request).await?;
        if let Err(err) = self.cache.put(&key, &result) {
            warn!(key = %key, "cache write failed, serving fresh result anyway: {err}");
        }
        Ok(result)
    }

    async fn scrape(&self, request: &AcquireRequest) -> Result<DistrictResult, AcquireError> {
        let descriptor = source_descriptor(request.state);
        let url = render_url(descriptor, &request.district, request.state_number.as_deref())
            .map_err(AcquireError::Resolve)?;
        info!(
            state = request.state.as_str(),
            district = %request.district,
            url = %url,
            "scraping district result"
        );

        let page = PageSession::open(Arc::clone(&self.fetcher), url, self.poll_interval)
            .await
            .map_err(AcquireError::Navigation)?;

        let fragments = run_extractors(&page, descriptor.extractors).await;
        let meta = RequestMeta {
            name: request.name.clone(),
        };
        Ok(normalize(&meta, fragments))
    }
}

/// Runs every extractor the descriptor names concurrently against the same
/// loaded page and joins them; the normalizer only ever sees settled
/// fragments.
async fn run_extractors(page: &PageSession, kinds: &[ExtractorKind]) -> Fragments {
    let (table, statistics, charts, elected, turnout_chart, party_shares, asset_stats) = tokio::join!(
        applicable(kinds, ExtractorKind::VoteTable, extract::extract_vote_table(page)),
        applicable(kinds, ExtractorKind::Statistics, extract::extract_statistics(page)),
        applicable(kinds, ExtractorKind::Charts, extract::extract_charts(page)),
        applicable(kinds, ExtractorKind::ElectedRunnerUp, extract::extract_elected(page)),
        applicable(kinds, ExtractorKind::TurnoutChart, extract::extract_turnout_chart(page)),
        applicable(kinds, ExtractorKind::PartyShares, extract::extract_party_shares(page)),
        applicable(kinds, ExtractorKind::JsonAsset, extract::extract_json_asset(page)),
    );
    Fragments {
        table,
        statistics,
        charts,
        elected,
        turnout_chart,
        party_shares,
        asset_stats,
    }
}

async fn applicable<T>(
    kinds: &[ExtractorKind],
    kind: ExtractorKind,
    run: impl Future<Output = Fragment<T>>,
) -> Fragment<T> {
    if kinds.contains(&kind) {
        run.await
    } else {
        Fragment::Absent
    }
}
