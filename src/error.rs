//! Error type shared by every transport.

/// Failure produced by a [`Transport`](crate::transport::Transport).
///
/// A non-2xx response is not an error: it comes back as `Ok(response)` and the
/// caller checks the status. Only failures that leave no response to inspect,
/// plus the zero-attempt configuration, show up here.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The reqwest client failed outright (connect, DNS, timeout, ...).
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// The request body is a stream and cannot be sent more than once.
    #[error("request body cannot be replayed (streaming bodies are not supported)")]
    BodyNotReplayable,

    /// Failure reported by a transport that is not backed by reqwest.
    #[error(transparent)]
    Other(#[from] anyhow::Error),

    /// The retry policy allows zero attempts, so nothing was sent.
    #[error("no attempts made: retry policy allows 0 attempts")]
    NoAttempts,
}

impl TransportError {
    /// Returns true when the failure came from the underlying transport rather
    /// than from the retry configuration.
    pub fn is_transport(&self) -> bool {
        !matches!(self, TransportError::NoAttempts)
    }
}
