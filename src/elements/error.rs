use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ElementsError {
    #[error("no element set available")]
    NoElementSetAvailable,
    #[error("element set fetch failed: {0}")]
    Fetch(#[from] reqwest::Error),
    #[error("publication source returned status {0}")]
    FetchStatus(u16),
    #[error("malformed element set text")]
    MalformedText,
    #[error("invalid element set: {0}")]
    InvalidTle(String),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}
