use std::fmt;

// === LeafError ===

/// Errors raised while talking to the leaves backend or mutating the collection.
#[derive(Debug, Clone, PartialEq)]
pub enum LeafError {
    /// The backend answered HTTP 429.
    RateLimited,
    /// Any other network or HTTP failure.
    Transport(String),
    /// A client-side required-field check failed; nothing was sent.
    Validation(String),
    /// The backend has no record with this identifier.
    NotFound(u64),
    /// The operation was cancelled before it completed.
    Cancelled,
    /// A bulk fetch is already in flight.
    AlreadyRunning,
}

impl LeafError {
    /// Returns true when the failure may go away after a backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LeafError::RateLimited)
    }

    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16, context: &str) -> Self {
        match status {
            429 => LeafError::RateLimited,
            _ => LeafError::Transport(format!("{} returned HTTP {}", context, status)),
        }
    }
}

impl fmt::Display for LeafError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LeafError::RateLimited => write!(f, "Rate limit exceeded"),
            LeafError::Transport(msg) => write!(f, "Transport error: {}", msg),
            LeafError::Validation(msg) => write!(f, "Validation failed: {}", msg),
            LeafError::NotFound(id) => write!(f, "Record not found: {}", id),
            LeafError::Cancelled => write!(f, "Operation cancelled"),
            LeafError::AlreadyRunning => write!(f, "Bulk fetch already running"),
        }
    }
}

impl std::error::Error for LeafError {}

impl From<reqwest::Error> for LeafError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) if status.as_u16() == 429 => LeafError::RateLimited,
            _ => LeafError::Transport(err.to_string()),
        }
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === SnapshotError ===

/// Errors related to reading or writing collection snapshots.
#[derive(Debug)]
pub enum SnapshotError {
    /// Reading or writing the snapshot file failed.
    IoError(String),
    /// The snapshot file is not a JSON array of records.
    SerializationError(String),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotError::IoError(msg) => write!(f, "Snapshot I/O error: {}", msg),
            SnapshotError::SerializationError(msg) => {
                write!(f, "Snapshot serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for SnapshotError {}
