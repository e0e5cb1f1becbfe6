use thiserror::Error;

/// Cycle-level scan failure.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The instrument universe could not be listed, so nothing was scanned.
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("a scan is already in progress")]
    ScanInProgress,
}

/// Failure talking to the market data upstream.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
    #[error("upstream returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl ProviderError {
    /// Worth retrying: transport failures, throttling and server errors.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Request(_) => true,
            ProviderError::Status { status, .. } => *status == 429 || *status >= 500,
            ProviderError::Url(_) | ProviderError::Malformed(_) => false,
        }
    }
}

pub type ScanResult<T> = std::result::Result<T, ScanError>;
