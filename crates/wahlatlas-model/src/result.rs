use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder for a cell the source page does not render.
pub const ABSENT_CELL: &str = "N/A";

/// Class-attribute fallback for chart containers without one.
pub const UNNAMED_CHART_CLASS: &str = "No class name";

/// One row of the first/second-vote table. All values are display strings:
/// thousands separators, percent signs and locale decimal marks differ per
/// source, so numeric parsing is deferred to the consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ElectionTableRow {
    pub party: String,
    pub candidate: String,
    pub first_votes: String,
    pub first_vote_percentage: String,
    pub second_votes: String,
    pub second_vote_percentage: String,
}

impl Default for ElectionTableRow {
    fn default() -> Self {
        Self {
            party: ABSENT_CELL.to_string(),
            candidate: ABSENT_CELL.to_string(),
            first_votes: ABSENT_CELL.to_string(),
            first_vote_percentage: ABSENT_CELL.to_string(),
            second_votes: ABSENT_CELL.to_string(),
            second_vote_percentage: ABSENT_CELL.to_string(),
        }
    }
}

/// A label/value pair from a two-column statistics table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

/// An inline SVG lifted out of a chart container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SvgFragment {
    pub svg: String,
    pub class_name: String,
}

/// A chart container: its inline SVG (if any) plus the JSON chart config the
/// page ships in data attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ChartFragment {
    pub svg: Option<String>,
    pub chart_data: Option<Value>,
    pub chart_options: Option<Value>,
    pub class_name: String,
}

/// One candidate card from the "winning candidate" widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CandidateCard {
    pub name: String,
    pub party: String,
    pub percentage: String,
    pub color: String,
}

impl Default for CandidateCard {
    fn default() -> Self {
        Self {
            name: ABSENT_CELL.to_string(),
            party: ABSENT_CELL.to_string(),
            percentage: ABSENT_CELL.to_string(),
            color: ABSENT_CELL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ElectedRunnerUp {
    pub elected_person: Option<CandidateCard>,
    pub runner_up_person: Option<CandidateCard>,
}

/// The canonical, cacheable result for one district. Serialized verbatim to
/// both the cache file and the HTTP response, hence the camelCase wire names.
///
/// Array fields are always present (empty when the source lacks them) so
/// consumers never branch on missing keys; the nullable fields are null when
/// the source state does not publish that fragment kind at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct DistrictResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub table_data: Vec<ElectionTableRow>,
    #[serde(default)]
    pub statistics_data: Vec<StatItem>,
    #[serde(default)]
    pub svg_data: Option<Vec<SvgFragment>>,
    #[serde(default)]
    pub svg_data_charts: Option<Vec<ChartFragment>>,
    #[serde(default)]
    pub elected_data: Option<ElectedRunnerUp>,
    #[serde(default)]
    pub voter_turnout: Option<String>,
    #[serde(default)]
    pub voter_turnout_chart: Option<ChartFragment>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_fields_serialize_as_explicit_nulls() {
        let result = DistrictResult {
            name: None,
            table_data: Vec::new(),
            statistics_data: Vec::new(),
            svg_data: None,
            svg_data_charts: None,
            elected_data: None,
            voter_turnout: None,
            voter_turnout_chart: None,
        };
        let value = serde_json::to_value(&result).expect("serialize");
        let object = value.as_object().expect("object");
        assert!(!object.contains_key("name"));
        assert_eq!(object["tableData"], serde_json::json!([]));
        assert_eq!(object["statisticsData"], serde_json::json!([]));
        assert!(object["electedData"].is_null());
        assert!(object["svgData"].is_null());
        assert!(object["voterTurnoutChart"].is_null());
    }

    #[test]
    fn table_row_wire_names_are_camel_case() {
        let row = ElectionTableRow::default();
        let value = serde_json::to_value(&row).expect("serialize");
        let object = value.as_object().expect("object");
        for key in [
            "party",
            "candidate",
            "firstVotes",
            "firstVotePercentage",
            "secondVotes",
            "secondVotePercentage",
        ] {
            assert_eq!(object[key], ABSENT_CELL, "key {key}");
        }
    }
}
