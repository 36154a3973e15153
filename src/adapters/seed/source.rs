//! Seed data sources.

use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;

use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Where a seed dataset comes from.
///
/// Every deployment ships with seeds compiled into the binary; operators
/// can point any of them at a file on disk instead.
#[derive(Debug, Clone)]
pub(super) enum SeedSource {
    /// Seed text compiled into the binary.
    Builtin(&'static str),
    /// Seed file on disk, read on every (re)load.
    Path(PathBuf),
}

impl SeedSource {
    /// Reads the seed text.
    pub async fn read(&self) -> Result<Cow<'static, str>, DomainError> {
        match self {
            Self::Builtin(text) => Ok(Cow::Borrowed(*text)),
            Self::Path(path) => fs::read_to_string(path).await.map(Cow::Owned).map_err(|e| {
                DomainError::new(
                    ErrorCode::MalformedReferenceData,
                    format!("Failed to read seed file: {}", e),
                )
                .with_detail("path", path.display().to_string())
            }),
        }
    }
}

impl fmt::Display for SeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin(_) => write!(f, "builtin"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}
