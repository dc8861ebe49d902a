use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use wahlatlas_model::{DistrictKey, DistrictResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreErrorCode {
    Io,
    Corrupt,
    Serialize,
}

impl StoreErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io_error",
            Self::Corrupt => "corrupt_entry",
            Self::Serialize => "serialize_error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    #[must_use]
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for StoreError {}

/// One JSON file per district key under a single cache root. Entries are
/// written once after the first successful scrape and never updated, evicted
/// or expired: staleness is the accepted trade-off against re-scraping
/// fragile government sites.
#[derive(Debug, Clone)]
pub struct ResultCache {
    root: PathBuf,
}

impl ResultCache {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn entry_path(&self, key: &DistrictKey) -> PathBuf {
        self.root.join(format!("{}.json", key.storage_key()))
    }

    /// A present-but-unparsable entry is a `Corrupt` error, not a miss:
    /// silently re-scraping would hide cache corruption behind an expensive
    /// scrape.
    pub fn get(&self, key: &DistrictKey) -> Result<Option<DistrictResult>, StoreError> {
        let path = self.entry_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).map_err(|err| {
            StoreError::new(StoreErrorCode::Io, format!("read {}: {err}", path.display()))
        })?;
        let result = serde_json::from_str(&raw).map_err(|err| {
            StoreError::new(
                StoreErrorCode::Corrupt,
                format!("parse {}: {err}", path.display()),
            )
        })?;
        Ok(Some(result))
    }

    /// Creates the cache root lazily and writes the full serialized result;
    /// no merging with prior content.
    pub fn put(&self, key: &DistrictKey, result: &DistrictResult) -> Result<(), StoreError> {
        fs::create_dir_all(&self.root).map_err(|err| {
            StoreError::new(
                StoreErrorCode::Io,
                format!("create {}: {err}", self.root.display()),
            )
        })?;
        let body = serde_json::to_vec_pretty(result).map_err(|err| {
            StoreError::new(StoreErrorCode::Serialize, format!("serialize {key}: {err}"))
        })?;
        let path = self.entry_path(key);
        fs::write(&path, body).map_err(|err| {
            StoreError::new(StoreErrorCode::Io, format!("write {}: {err}", path.display()))
        })
    }
}
