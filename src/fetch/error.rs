use thiserror::Error;

/// Failures a fetch can end with.
///
/// A response with a non-2xx status is not an error: it resolves as an
/// envelope with `success == false`, the refresh attempt included.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// Network or connection failure reported by the transport.
    #[error("transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The attempt did not complete before its timer fired.
    #[error("Timeout {url}")]
    Timeout { url: String },

    /// The body could not be converted to the declared response type.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl FetchError {
    pub fn transport(url: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Transport {
            url: url.to_owned(),
            message: err.to_string(),
        }
    }

    pub fn timeout(url: &str) -> Self {
        FetchError::Timeout { url: url.to_owned() }
    }

    pub fn decode(url: &str, err: impl std::fmt::Display) -> Self {
        FetchError::Decode {
            url: url.to_owned(),
            message: err.to_string(),
        }
    }

    /// Target of the attempt that failed.
    pub fn url(&self) -> &str {
        match self {
            FetchError::Transport { url, .. }
            | FetchError::Timeout { url }
            | FetchError::Decode { url, .. } => url,
        }
    }

    /// Metric label for the failure.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Transport { .. } => "transport",
            FetchError::Timeout { .. } => "timeout",
            FetchError::Decode { .. } => "decode",
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}
