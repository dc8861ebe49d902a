// SPDX-License-Identifier: Apache-2.0

use crate::page::PageSession;
use serde_json::Value;
use tracing::warn;
use wahlatlas_model::{Fragment, StatItem};

/// The RLP source serves a plain JSON asset per district instead of a result
/// page. Top-level fields become label/value pairs; keys mentioning "name"
/// feed the district name and stay out of the list, matching how the result
/// card renders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetStats {
    pub name: Option<String>,
    pub items: Vec<StatItem>,
}

pub async fn extract_json_asset(page: &PageSession) -> Fragment<AssetStats> {
    let body = page.body_snapshot().await;
    let parsed = parse_json_asset(&body);
    if parsed.is_none() {
        warn!(url = page.url(), "district asset is not a json object, recording absent");
    }
    Fragment::from(parsed)
}

pub(crate) fn parse_json_asset(body: &str) -> Option<AssetStats> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    let mut name = None;
    let mut items = Vec::new();
    for (key, value) in object {
        let rendered = render_scalar(value);
        if key.to_lowercase().contains("name") {
            if name.is_none() && !rendered.is_empty() {
                name = Some(rendered);
            }
            continue;
        }
        items.push(StatItem {
            label: key.clone(),
            value: rendered,
        });
    }
    if name.is_none() && items.is_empty() {
        return None;
    }
    Some(AssetStats { name, items })
}

fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}
