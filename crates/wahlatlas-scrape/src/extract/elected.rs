// SPDX-License-Identifier: Apache-2.0

use super::{cell_text, selector};
use crate::page::PageSession;
use scraper::Html;
use std::time::Duration;
use tracing::warn;
use wahlatlas_model::{CandidateCard, ElectedRunnerUp, Fragment, ABSENT_CELL};

const WAIT_SELECTOR: &str = "div.gewaehlter-direktbewerber";
const TIMEOUT: Duration = Duration::from_secs(10);

/// The "winning candidate" card plus its runner-up sibling, where the source
/// renders them.
pub async fn extract_elected(page: &PageSession) -> Fragment<ElectedRunnerUp> {
    if !page.wait_for_selector(WAIT_SELECTOR, TIMEOUT).await {
        warn!(url = page.url(), "elected candidate card never appeared, recording absent");
        return Fragment::Absent;
    }
    let body = page.body_snapshot().await;
    Fragment::from(parse_elected(&body))
}

pub(crate) fn parse_elected(body: &str) -> Option<ElectedRunnerUp> {
    let document = Html::parse_document(body);
    let elected_person = candidate_card(
        &document,
        WAIT_SELECTOR,
        ".gewaehlter-direktbewerber__name",
        ".gewaehlter-direktbewerber__partei abbr",
        ".gewaehlter-direktbewerber__value",
    );
    let runner_up_person = candidate_card(
        &document,
        "div.erstunterlegener",
        ".erstunterlegener__name",
        ".erstunterlegener__partei abbr",
        ".erstunterlegener__value",
    );
    if elected_person.is_none() && runner_up_person.is_none() {
        return None;
    }
    Some(ElectedRunnerUp {
        elected_person,
        runner_up_person,
    })
}

fn candidate_card(
    document: &Html,
    root_css: &str,
    name_css: &str,
    party_css: &str,
    value_css: &str,
) -> Option<CandidateCard> {
    let root = document.select(&selector(root_css)?).next()?;
    let name = cell_text(root.select(&selector(name_css)?).next());
    let party = root
        .select(&selector(party_css)?)
        .next()
        .and_then(|abbr| abbr.value().attr("title"))
        .map(str::to_string)
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| ABSENT_CELL.to_string());
    let percentage = cell_text(root.select(&selector(value_css)?).next());
    let color = root
        .select(&selector(".partei__farbe")?)
        .next()
        .and_then(|swatch| swatch.value().attr("style"))
        .and_then(|style| style.split_once("color:"))
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|color| !color.is_empty())
        .unwrap_or_else(|| ABSENT_CELL.to_string());

    Some(CandidateCard {
        name,
        party,
        percentage,
        color,
    })
}
