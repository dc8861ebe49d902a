// SPDX-License-Identifier: Apache-2.0

use crate::extract::{AssetStats, PartyShares};
use wahlatlas_model::{
    ChartFragment, DistrictResult, ElectedRunnerUp, ElectionTableRow, Fragment, StatItem,
    SvgFragment, ABSENT_CELL,
};

/// Request metadata passed through by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// Human-readable district label, attached verbatim when present.
    pub name: Option<String>,
}

/// The joined output of every extractor that ran for a request. Defaults to
/// all-absent; the pipeline fills in whatever the source supports.
#[derive(Debug, Clone, Default)]
pub struct Fragments {
    pub table: Fragment<Vec<ElectionTableRow>>,
    pub statistics: Fragment<Vec<StatItem>>,
    pub charts: Fragment<Vec<ChartFragment>>,
    pub elected: Fragment<ElectedRunnerUp>,
    pub turnout_chart: Fragment<ChartFragment>,
    pub party_shares: Fragment<PartyShares>,
    pub asset_stats: Fragment<AssetStats>,
}

const TURNOUT_LABEL: &str = "Wahlbeteiligung";

/// Pure assembly of the canonical result: every absent fragment becomes its
/// documented default (empty array or null) here and nowhere else. No I/O,
/// cannot fail.
#[must_use]
pub fn normalize(meta: &RequestMeta, fragments: Fragments) -> DistrictResult {
    let Fragments {
        table,
        statistics,
        charts,
        elected,
        turnout_chart,
        party_shares,
        asset_stats,
    } = fragments;

    let party_shares = party_shares.into_option();
    let asset_stats = asset_stats.into_option();

    let table_data = table
        .into_option()
        .or_else(|| party_shares.as_ref().map(share_rows))
        .unwrap_or_default();

    let statistics_data = statistics
        .into_option()
        .or_else(|| asset_stats.as_ref().map(|stats| stats.items.clone()))
        .unwrap_or_default();

    let voter_turnout = statistics_data
        .iter()
        .find(|item| item.label.contains(TURNOUT_LABEL))
        .map(|item| item.value.clone());

    let charts = charts.into_option();
    let svg_data = charts.as_ref().map(|list| {
        list.iter()
            .filter_map(|chart| {
                chart.svg.as_ref().map(|svg| SvgFragment {
                    svg: svg.clone(),
                    class_name: chart.class_name.clone(),
                })
            })
            .collect()
    });

    let name = meta
        .name
        .clone()
        .or_else(|| party_shares.as_ref().and_then(|shares| shares.district_name.clone()))
        .or_else(|| asset_stats.as_ref().and_then(|stats| stats.name.clone()));

    DistrictResult {
        name,
        table_data,
        statistics_data,
        svg_data,
        svg_data_charts: charts,
        elected_data: elected.into_option(),
        voter_turnout,
        voter_turnout_chart: turnout_chart.into_option(),
    }
}

/// Party percentage rows from the NRW page rendered as table rows; vote
/// counts and candidates are not published there.
fn share_rows(shares: &PartyShares) -> Vec<ElectionTableRow> {
    let driver = if shares.first_votes.is_empty() {
        &shares.second_votes
    } else {
        &shares.first_votes
    };
    driver
        .iter()
        .map(|first| {
            let second = shares
                .second_votes
                .iter()
                .find(|item| item.label == first.label);
            ElectionTableRow {
                party: first.label.clone(),
                first_vote_percentage: if shares.first_votes.is_empty() {
                    ABSENT_CELL.to_string()
                } else {
                    first.value.clone()
                },
                second_vote_percentage: second
                    .map(|item| item.value.clone())
                    .unwrap_or_else(|| ABSENT_CELL.to_string()),
                ..ElectionTableRow::default()
            }
        })
        .collect()
}
