// SPDX-License-Identifier: Apache-2.0

//! Field extractors. Each is an independent, timeout-bounded query against
//! the loaded page that yields a [`Fragment`] and never errors past its own
//! boundary: a missing widget on one source must not fail the others.

mod charts;
mod elected;
mod json_asset;
mod party_shares;
mod statistics;
mod table;
mod turnout;

pub use charts::extract_charts;
pub use elected::extract_elected;
pub use json_asset::{extract_json_asset, AssetStats};
pub use party_shares::{extract_party_shares, PartyShares};
pub use statistics::extract_statistics;
pub use table::extract_vote_table;
pub use turnout::extract_turnout_chart;

use scraper::{ElementRef, Selector};
use tracing::error;
use wahlatlas_model::ABSENT_CELL;

/// All extractor selectors are compile-time constants; a parse failure here
/// is a programming error, logged and treated as "nothing matched".
pub(crate) fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(err) => {
            error!(selector = css, "invalid css selector: {err}");
            None
        }
    }
}

pub(crate) fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Trimmed cell text, `"N/A"` when the cell is missing or empty.
pub(crate) fn cell_text(cell: Option<ElementRef<'_>>) -> String {
    cell.map(collect_text)
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| ABSENT_CELL.to_string())
}
