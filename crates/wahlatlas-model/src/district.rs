use crate::state::StateKey;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Cache and dedup key for one scraped district. Two keys are equal iff both
/// fields match exactly; the resolver is the only place that normalizes
/// district ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DistrictKey {
    pub state: StateKey,
    pub district: String,
}

impl DistrictKey {
    #[must_use]
    pub fn new(state: StateKey, district: impl Into<String>) -> Self {
        Self {
            state,
            district: district.into(),
        }
    }

    /// Deterministic file-name stem, `{district}_{state}`.
    #[must_use]
    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.district, self.state.as_str())
    }
}

impl Display for DistrictKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.district, self.state.as_str())
    }
}
