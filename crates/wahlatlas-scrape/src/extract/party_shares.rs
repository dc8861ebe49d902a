// SPDX-License-Identifier: Apache-2.0

use super::{collect_text, selector};
use crate::page::PageSession;
use scraper::Html;
use std::time::Duration;
use tracing::warn;
use wahlatlas_model::{Fragment, StatItem, ABSENT_CELL};

const WAIT_SELECTOR: &str = "#parteienErststimmeTable2";
const DISTRICT_NAME_SELECTOR: &str = "#dieserWahlkreis";
const SECOND_VOTE_SELECTOR: &str = "#prozentWerteZweitstimmeTable";
const TIMEOUT: Duration = Duration::from_secs(10);

/// Fixed column order of the NRW percentage rows.
const PARTIES: [&str; 7] = ["CDU", "SPD", "FDP", "AfD", "GRUENE", "LINKE", "ANDERE"];

/// The NRW live page publishes percentages as one row per vote kind with the
/// party fixed by column position; the second-vote row carries a leading
/// label cell, hence its offset of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyShares {
    pub district_name: Option<String>,
    pub first_votes: Vec<StatItem>,
    pub second_votes: Vec<StatItem>,
}

pub async fn extract_party_shares(page: &PageSession) -> Fragment<PartyShares> {
    if !page.wait_for_selector(WAIT_SELECTOR, TIMEOUT).await {
        warn!(url = page.url(), "party share rows never appeared, recording absent");
        return Fragment::Absent;
    }
    let body = page.body_snapshot().await;
    Fragment::from(parse_party_shares(&body))
}

pub(crate) fn parse_party_shares(body: &str) -> Option<PartyShares> {
    let document = Html::parse_document(body);
    let district_name = selector(DISTRICT_NAME_SELECTOR)
        .and_then(|css| document.select(&css).next())
        .map(collect_text)
        .filter(|name| !name.is_empty());
    let first_votes = share_row(&document, WAIT_SELECTOR, 0);
    let second_votes = share_row(&document, SECOND_VOTE_SELECTOR, 1);

    if district_name.is_none() && first_votes.is_none() && second_votes.is_none() {
        return None;
    }
    Some(PartyShares {
        district_name,
        first_votes: first_votes.unwrap_or_default(),
        second_votes: second_votes.unwrap_or_default(),
    })
}

fn share_row(document: &Html, row_css: &str, offset: usize) -> Option<Vec<StatItem>> {
    let row = document.select(&selector(row_css)?).next()?;
    let td = selector("td")?;
    let cells: Vec<String> = row.select(&td).map(collect_text).collect();
    if cells.is_empty() {
        return None;
    }
    Some(
        PARTIES
            .iter()
            .enumerate()
            .map(|(index, party)| StatItem {
                label: (*party).to_string(),
                value: cells
                    .get(index + offset)
                    .cloned()
                    .filter(|value| !value.is_empty())
                    .unwrap_or_else(|| ABSENT_CELL.to_string()),
            })
            .collect(),
    )
}
