// SPDX-License-Identifier: Apache-2.0

use super::charts::chart_fragment;
use super::selector;
use crate::page::PageSession;
use scraper::Html;
use std::time::Duration;
use tracing::warn;
use wahlatlas_model::{ChartFragment, Fragment};

const WAIT_SELECTOR: &str = "div.js-d3chart";
const TIMEOUT: Duration = Duration::from_secs(1);

/// The turnout widget, a single chart container.
pub async fn extract_turnout_chart(page: &PageSession) -> Fragment<ChartFragment> {
    if !page.wait_for_selector(WAIT_SELECTOR, TIMEOUT).await {
        warn!(url = page.url(), "turnout chart never appeared, recording absent");
        return Fragment::Absent;
    }
    let body = page.body_snapshot().await;
    Fragment::from(parse_turnout_chart(&body))
}

pub(crate) fn parse_turnout_chart(body: &str) -> Option<ChartFragment> {
    let document = Html::parse_document(body);
    let container = selector(WAIT_SELECTOR)?;
    document.select(&container).next().map(chart_fragment)
}
