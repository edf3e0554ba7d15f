use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Store rejected request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    #[error("Failed to decode store response: {0}")]
    Decode(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether repeating the same request may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            StoreError::Http(_) => true,
            StoreError::Rejected { status, .. } => *status >= 500,
            StoreError::Decode(_) => false,
            StoreError::Unavailable(_) => true,
        }
    }
}

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("A constraint sync is already in progress")]
    Busy,

    #[error("Failed to clear remote couplings: {0}")]
    DeleteAll(#[source] StoreError),

    #[error("Failed to create coupling #{index} ({created} already stored): {source}")]
    Create {
        index: usize,
        created: usize,
        #[source]
        source: StoreError,
    },

    #[error("Failed to pull couplings: {0}")]
    Fetch(#[source] StoreError),
}

impl SyncError {
    /// The remote store was cleared but only some groups were re-created.
    ///
    /// Nothing is rolled back; the next full refresh exposes what was kept.
    pub fn left_partial_remote(&self) -> bool {
        matches!(self, SyncError::Create { .. })
    }

    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            SyncError::Busy => None,
            SyncError::DeleteAll(e) | SyncError::Fetch(e) => Some(e),
            SyncError::Create { source, .. } => Some(source),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        match self {
            SyncError::Busy => true,
            other => other.store_error().map(StoreError::is_recoverable).unwrap_or(false),
        }
    }
}
