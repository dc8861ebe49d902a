// SPDX-License-Identifier: Apache-2.0

use super::selector;
use crate::page::PageSession;
use scraper::{ElementRef, Html};
use serde_json::Value;
use std::time::Duration;
use tracing::warn;
use wahlatlas_model::{ChartFragment, Fragment, UNNAMED_CHART_CLASS};

const WAIT_SELECTOR: &str = "[class*=\"chart\"]";
const TIMEOUT: Duration = Duration::from_secs(1);

/// Every element whose class mentions "chart": its inline SVG plus the JSON
/// chart config shipped in `data-chartdata`/`data-chartoptions`.
pub async fn extract_charts(page: &PageSession) -> Fragment<Vec<ChartFragment>> {
    if !page.wait_for_selector(WAIT_SELECTOR, TIMEOUT).await {
        warn!(url = page.url(), "no chart containers appeared, recording absent");
        return Fragment::Absent;
    }
    let body = page.body_snapshot().await;
    Fragment::from(parse_charts(&body))
}

pub(crate) fn parse_charts(body: &str) -> Option<Vec<ChartFragment>> {
    let document = Html::parse_document(body);
    let containers = selector(WAIT_SELECTOR)?;
    let fragments: Vec<ChartFragment> = document
        .select(&containers)
        .map(chart_fragment)
        .collect();
    if fragments.is_empty() {
        None
    } else {
        Some(fragments)
    }
}

pub(crate) fn chart_fragment(element: ElementRef<'_>) -> ChartFragment {
    ChartFragment {
        svg: inline_svg(element),
        chart_data: json_attr(element, "data-chartdata"),
        chart_options: json_attr(element, "data-chartoptions"),
        class_name: element
            .value()
            .attr("class")
            .map(str::to_string)
            .unwrap_or_else(|| UNNAMED_CHART_CLASS.to_string()),
    }
}

fn inline_svg(element: ElementRef<'_>) -> Option<String> {
    let svg = selector("svg")?;
    element
        .select(&svg)
        .next()
        .map(|child| child.html().trim().to_string())
}

/// A malformed attribute yields null for that field only; the fragment as a
/// whole survives.
fn json_attr(element: ElementRef<'_>, name: &str) -> Option<Value> {
    let raw = element.value().attr(name)?;
    serde_json::from_str(raw).ok()
}
