// SPDX-License-Identifier: Apache-2.0

use super::{cell_text, selector};
use crate::page::PageSession;
use scraper::Html;
use std::time::Duration;
use tracing::warn;
use wahlatlas_model::{Fragment, StatItem};

const WAIT_SELECTOR: &str = "table.tablesaw tbody tr";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Label/value pairs from the statistics tables: first cell of each tablesaw
/// row is the label, last cell the value.
pub async fn extract_statistics(page: &PageSession) -> Fragment<Vec<StatItem>> {
    if !page.wait_for_selector(WAIT_SELECTOR, TIMEOUT).await {
        warn!(url = page.url(), "statistics table never appeared, recording absent");
        return Fragment::Absent;
    }
    let body = page.body_snapshot().await;
    Fragment::from(parse_statistics(&body))
}

pub(crate) fn parse_statistics(body: &str) -> Option<Vec<StatItem>> {
    let document = Html::parse_document(body);
    let rows = selector(WAIT_SELECTOR)?;
    let td = selector("td")?;

    let items: Vec<StatItem> = document
        .select(&rows)
        .map(|row| {
            let cells: Vec<_> = row.select(&td).collect();
            StatItem {
                label: cell_text(cells.first().copied()),
                value: cell_text(cells.last().copied()),
            }
        })
        .collect();
    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
