// SPDX-License-Identifier: Apache-2.0

use crate::fetch::PageFetcher;
use scraper::{Html, Selector};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    pub url: String,
    pub message: String,
}

impl Display for NavigationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "navigation to {} failed: {}", self.url, self.message)
    }
}

impl std::error::Error for NavigationError {}

/// One loaded result page, scoped to a single acquisition request. Opening
/// performs the navigation fetch; teardown is the drop at the end of the
/// request, on every exit path.
///
/// `wait_for_selector` re-fetches the page at a fixed interval until the
/// selector matches or the deadline passes, standing in for selector waits
/// against a live document whose widgets render late.
pub struct PageSession {
    fetcher: Arc<dyn PageFetcher>,
    url: String,
    body: Mutex<String>,
    poll_interval: Duration,
}

impl std::fmt::Debug for PageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageSession")
            .field("url", &self.url)
            .field("poll_interval", &self.poll_interval)
            .finish_non_exhaustive()
    }
}

impl PageSession {
    pub async fn open(
        fetcher: Arc<dyn PageFetcher>,
        url: impl Into<String>,
        poll_interval: Duration,
    ) -> Result<Self, NavigationError> {
        let url = url.into();
        let body = fetcher.fetch(&url).await.map_err(|err| NavigationError {
            url: url.clone(),
            message: err.to_string(),
        })?;
        Ok(Self {
            fetcher,
            url,
            body: Mutex::new(body),
            poll_interval,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn body_snapshot(&self) -> String {
        self.body.lock().await.clone()
    }

    /// Returns true once `css` matches the document, false when the deadline
    /// passes first. A failed re-fetch keeps the last good document.
    pub async fn wait_for_selector(&self, css: &str, timeout: Duration) -> bool {
        let Ok(selector) = Selector::parse(css) else {
            return false;
        };
        let deadline = Instant::now() + timeout;
        loop {
            {
                let body = self.body.lock().await;
                if document_matches(&body, &selector) {
                    return true;
                }
            }
            if Instant::now() + self.poll_interval > deadline {
                return false;
            }
            tokio::time::sleep(self.poll_interval).await;
            match self.fetcher.fetch(&self.url).await {
                Ok(fresh) => *self.body.lock().await = fresh,
                Err(err) => debug!(url = %self.url, "re-fetch during selector wait failed: {err}"),
            }
        }
    }
}

fn document_matches(body: &str, selector: &Selector) -> bool {
    Html::parse_document(body).select(selector).next().is_some()
}
