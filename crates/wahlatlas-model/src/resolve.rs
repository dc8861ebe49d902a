use crate::sources::source_descriptor;
use crate::state::StateKey;
use serde_json::{Map, Value};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    MissingProperty {
        state: StateKey,
        property: &'static str,
    },
    NonNumeric {
        property: &'static str,
        value: String,
    },
}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingProperty { state, property } => write!(
                f,
                "feature has no `{property}` property for state `{state}`"
            ),
            Self::NonNumeric { property, value } => {
                write!(f, "district property `{property}` is not numeric: {value}")
            }
        }
    }
}

impl std::error::Error for ResolveError {}

/// The NRW result site addresses districts as three-digit path segments.
const NRW_DISTRICT_WIDTH: usize = 3;

/// Derives the district id a source site expects from a clicked feature's
/// property bag. Pure lookup, no I/O; same inputs always yield the same
/// output.
pub fn resolve_district_id(
    state: StateKey,
    properties: &Map<String, Value>,
) -> Result<String, ResolveError> {
    let property = source_descriptor(state).district_property;
    let value = properties
        .get(property)
        .ok_or(ResolveError::MissingProperty { state, property })?;

    let district = match value {
        Value::Number(number) if number.as_u64().is_some() => number.to_string(),
        Value::String(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
                return Err(ResolveError::NonNumeric {
                    property,
                    value: value.to_string(),
                });
            }
            trimmed.to_string()
        }
        other => {
            return Err(ResolveError::NonNumeric {
                property,
                value: other.to_string(),
            })
        }
    };

    Ok(match state {
        StateKey::Nrw => format!("{district:0>width$}", width = NRW_DISTRICT_WIDTH),
        _ => district,
    })
}
