//! Anti-forgery token plumbing.
//!
//! The admin console rejects POSTs that do not carry the current
//! anti-forgery token. Where the token comes from (a page-embedded meta
//! tag in production) is the embedder's business; the client only needs
//! something that yields the current string on demand.

/// Source of the current anti-forgery token.
///
/// Consulted on every request, so a rotated token is picked up without
/// rebuilding the client. Returns an empty string when no token is
/// available; the header is omitted in that case.
pub trait TokenSource: Send + Sync {
    fn current(&self) -> String;
}

/// Fixed token value, for tests and non-rotating deployments.
pub struct StaticToken(pub String);

impl TokenSource for StaticToken {
    fn current(&self) -> String {
        self.0.clone()
    }
}
