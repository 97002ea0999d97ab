use bytes::Bytes;

/// Where an image belongs in the account tree, decided by URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Media,
    Profile,
}

impl ResourceKind {
    /// Classify an image URL by substring, media taking precedence.
    pub fn classify(url: &str) -> Self {
        if url.contains("media") {
            ResourceKind::Media
        } else {
            ResourceKind::Profile
        }
    }

    /// Subdirectory name under the account root.
    pub fn subdir(self) -> &'static str {
        match self {
            ResourceKind::Media => "media",
            ResourceKind::Profile => "profile",
        }
    }
}

/// Terminal result of a retried fetch.
///
/// `NotFound` means the archive confirmed the resource never existed; it is
/// not a failure and must not be retried. Transient failures surface as
/// [`FetchError`] once the retry budget is spent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(FetchBody),
    NotFound,
}

/// A successfully fetched body with the Content-Type it was served under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchBody {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("request failed after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
    #[error("fetch cancelled")]
    Cancelled,
}
