//! Error types for the host API client.

/// Errors that can occur when talking to the LMS admin console.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A transport-level failure, or a retriable status that survived the
    /// whole retry policy.
    #[error("network error: {0}")]
    Network(String),
    /// The host returned a non-retriable status. Carries a body snippet.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// The next backoff sleep would have overrun the total time budget.
    #[error("retry budget exhausted after {elapsed_ms}ms")]
    BudgetExceeded { elapsed_ms: u64 },
    /// The operation was aborted through its cancellation token.
    #[error("request cancelled")]
    Cancelled,
    /// The response was well-formed but semantically invalid, e.g. a
    /// count field that is not numeric.
    #[error("unexpected API response: {0}")]
    Api(String),
}
