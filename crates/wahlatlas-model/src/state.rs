use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError(pub String);

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ValidationError {}

/// One registered result source. The set is closed: adding a state means
/// adding a variant, a descriptor row and the matches the compiler then
/// demands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StateKey {
    Sh,
    Bremen,
    Berlin,
    Brandenburg,
    Bundestag,
    Nrw,
    Rlp,
}

impl StateKey {
    pub const ALL: [StateKey; 7] = [
        StateKey::Sh,
        StateKey::Bremen,
        StateKey::Berlin,
        StateKey::Brandenburg,
        StateKey::Bundestag,
        StateKey::Nrw,
        StateKey::Rlp,
    ];

    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        match input.trim() {
            "sh" => Ok(Self::Sh),
            "bremen" => Ok(Self::Bremen),
            "berlin" => Ok(Self::Berlin),
            "brandenburg" => Ok(Self::Brandenburg),
            "bundestag" => Ok(Self::Bundestag),
            "nrw" => Ok(Self::Nrw),
            "rlp" => Ok(Self::Rlp),
            other => Err(ValidationError(format!("unknown state key `{other}`"))),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sh => "sh",
            Self::Bremen => "bremen",
            Self::Berlin => "berlin",
            Self::Brandenburg => "brandenburg",
            Self::Bundestag => "bundestag",
            Self::Nrw => "nrw",
            Self::Rlp => "rlp",
        }
    }
}

impl Display for StateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
