use thiserror::Error;

/// Failure inside the key-value store backing favorites.
///
/// The store contract is deliberately coarse: callers only learn that an
/// operation failed, not which backend detail caused it.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying file or device I/O failed.
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The store file existed but did not hold valid JSON.
    #[error("store payload was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A favorites write failed.
///
/// Unlike reads (which degrade to an empty list), write failures are always
/// surfaced: the caller's in-memory view may now diverge from persisted state
/// until the next `list`.
#[derive(Debug, Error)]
#[error("failed to persist favorites: {0}")]
pub struct PersistenceError(#[from] StoreError);

/// A raw forecast entry could not be normalized into a weather sample.
///
/// Provider payloads are validated at the client boundary, so the aggregator
/// itself never sees malformed input.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// `dt_txt` did not match the `YYYY-MM-DD HH:MM:SS` wall-clock format.
    #[error("sample timestamp '{0}' is not in 'YYYY-MM-DD HH:MM:SS' format")]
    BadTimestamp(String),

    /// The entry's `weather` array was empty, so no icon exists for it.
    #[error("forecast entry at '{0}' has no weather icon")]
    MissingIcon(String),
}
