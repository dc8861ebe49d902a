// SPDX-License-Identifier: Apache-2.0

use super::{cell_text, collect_text, selector};
use crate::page::PageSession;
use scraper::Html;
use std::time::Duration;
use tracing::warn;
use wahlatlas_model::{ElectionTableRow, Fragment};

const WAIT_SELECTOR: &str = "table.tablesaw tbody tr";
/// Some sources mark the votes table explicitly; prefer it over other
/// tablesaw tables on the page.
const PREFERRED_ROW_SELECTOR: &str = "table.tablesaw.table-stimmen tbody tr";
const TIMEOUT: Duration = Duration::from_secs(10);

/// First/second-vote rows. The cell layout is fixed across sources: `th`
/// carries the party, then candidate, first votes, first-vote percentage,
/// two filler cells, second votes, second-vote percentage.
pub async fn extract_vote_table(page: &PageSession) -> Fragment<Vec<ElectionTableRow>> {
    if !page.wait_for_selector(WAIT_SELECTOR, TIMEOUT).await {
        warn!(url = page.url(), "vote table never appeared, recording absent");
        return Fragment::Absent;
    }
    let body = page.body_snapshot().await;
    Fragment::from(parse_vote_table(&body))
}

pub(crate) fn parse_vote_table(body: &str) -> Option<Vec<ElectionTableRow>> {
    let document = Html::parse_document(body);
    let preferred = selector(PREFERRED_ROW_SELECTOR)?;
    let fallback = selector(WAIT_SELECTOR)?;
    let th = selector("th")?;
    let td = selector("td")?;

    let mut rows: Vec<_> = document.select(&preferred).collect();
    if rows.is_empty() {
        rows = document.select(&fallback).collect();
    }
    if rows.is_empty() {
        return None;
    }

    let parsed = rows
        .iter()
        .map(|row| {
            let cells: Vec<_> = row.select(&td).collect();
            ElectionTableRow {
                party: cell_text(row.select(&th).next()),
                candidate: cell_text(cells.first().copied()),
                first_votes: cell_text(cells.get(1).copied()),
                first_vote_percentage: cell_text(cells.get(2).copied()),
                second_votes: cell_text(cells.get(5).copied()),
                second_vote_percentage: cell_text(cells.get(6).copied()),
            }
        })
        .collect();
    Some(parsed)
}
