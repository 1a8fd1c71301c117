//! Resilient HTTP client for the admin console's AJAX endpoints.
//!
//! Every call is a POST with a flat form payload. The client retries
//! transport failures and retriable statuses with exponential backoff,
//! honors `Retry-After`, enforces a total time budget per logical
//! request, and can be cancelled at any point, including mid-sleep.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::{token::TokenSource, Error};

const USER_AGENT: &str = concat!("coursetrack/", env!("CARGO_PKG_VERSION"));

/// Statuses worth retrying. Everything else fails the call immediately.
const RETRIABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// Retry behavior for one logical request, passed by value alongside the
/// call. Replaces the legacy pattern of mutable retry counters living on
/// the request object.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    /// Timeout applied to each individual attempt.
    pub attempt_timeout: Duration,
    /// Retries after the first attempt; total attempts = `max_retries + 1`.
    pub max_retries: u32,
    /// Backoff before the first retry.
    pub initial_delay: Duration,
    /// Growth factor applied per retry.
    pub multiplier: f64,
    /// Upper bound on any single backoff sleep.
    pub max_delay: Duration,
    /// Wall-clock cap across all attempts and sleeps of the call.
    pub total_budget: Duration,
}

impl RetryPolicy {
    /// Preset for bulk list fetches: generous timeout, few retries.
    pub fn bulk() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(20),
            max_retries: 3,
            initial_delay: Duration::from_secs(1),
            multiplier: 2.0,
            max_delay: Duration::from_secs(15),
            total_budget: Duration::from_secs(120),
        }
    }

    /// Preset for count probes: the host answers these fast or not at
    /// all, so the timeout is tight and retries are cheap.
    pub fn probe() -> Self {
        Self {
            attempt_timeout: Duration::from_millis(500),
            max_retries: 6,
            initial_delay: Duration::from_millis(300),
            multiplier: 2.0,
            max_delay: Duration::from_secs(5),
            total_budget: Duration::from_secs(30),
        }
    }
}

/// Backoff before retry number `attempt` (1-indexed):
/// `min(max_delay, initial_delay * multiplier^(attempt - 1))`.
pub fn backoff_delay(policy: &RetryPolicy, attempt: u32) -> Duration {
    let exp = policy.multiplier.powi(attempt.saturating_sub(1) as i32);
    policy.initial_delay.mul_f64(exp).min(policy.max_delay)
}

/// Owning side of a cancellation signal. Dropping it without calling
/// [`CancelSource::cancel`] leaves outstanding tokens un-cancelled.
pub struct CancelSource {
    tx: watch::Sender<bool>,
}

impl CancelSource {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Hands out a token observing this source.
    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }

    /// Fires the signal. All tokens observe it; firing twice is a no-op.
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Default for CancelSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Observing side of a cancellation signal, threaded through a whole
/// update run. Cheap to clone.
#[derive(Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

impl CancelToken {
    /// A token that can never fire, for call sites without a source.
    pub fn disconnected() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once the source fires. Pends forever if the source was
    /// dropped without firing.
    pub async fn cancelled(&self) {
        let mut rx = self.rx.clone();
        loop {
            if *rx.borrow() {
                return;
            }
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

/// What a single attempt came back with, before the retry decision.
enum AttemptError {
    Transport(String),
    Status {
        status: u16,
        body: String,
        retry_after: Option<u64>,
    },
    Parse(String),
}

/// HTTP client for the admin console.
///
/// Holds the console base URL and the anti-forgery token source. The
/// token source is consulted on every request rather than cached, so a
/// rotated token takes effect immediately.
pub struct Client {
    base_url: String,
    token_source: Arc<dyn TokenSource>,
    http: reqwest::Client,
}

impl Client {
    pub fn new(base_url: &str, token_source: Arc<dyn TokenSource>) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token_source,
            http,
        })
    }

    /// Sends one logical request: POSTs the form payload to `endpoint`,
    /// retrying per `policy`, and parses the response body as JSON.
    pub async fn send(
        &self,
        endpoint: &str,
        form: &[(String, String)],
        policy: &RetryPolicy,
        cancel: &CancelToken,
    ) -> Result<serde_json::Value, Error> {
        let started = Instant::now();
        let url = format!("{}{}", self.base_url, endpoint);
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let failure = tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                outcome = self.attempt(&url, form, policy) => match outcome {
                    Ok(value) => return Ok(value),
                    Err(e) => e,
                },
            };

            let (reason, retry_after) = match failure {
                AttemptError::Transport(msg) => (msg, None),
                AttemptError::Status {
                    status,
                    body,
                    retry_after,
                } => {
                    if !RETRIABLE_STATUSES.contains(&status) {
                        tracing::error!("{} failed with status {}: {}", endpoint, status, body);
                        return Err(Error::HttpStatus { status, body });
                    }
                    (format!("status {}", status), retry_after)
                }
                AttemptError::Parse(msg) => {
                    tracing::error!("{} returned an unparseable body: {}", endpoint, msg);
                    return Err(Error::Api(msg));
                }
            };

            if attempt > policy.max_retries {
                return Err(Error::Network(format!(
                    "{} failed after {} attempts: {}",
                    endpoint, attempt, reason
                )));
            }

            let mut delay = backoff_delay(policy, attempt);
            if let Some(secs) = retry_after {
                delay = delay.max(Duration::from_millis(secs.saturating_mul(1000)));
            }

            let elapsed = started.elapsed();
            if elapsed + delay > policy.total_budget {
                return Err(Error::BudgetExceeded {
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }

            tracing::warn!(
                "{} attempt {}/{} failed ({}), retrying in {:.1}s",
                endpoint,
                attempt,
                policy.max_retries + 1,
                reason,
                delay.as_secs_f64()
            );

            tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
    }

    async fn attempt(
        &self,
        url: &str,
        form: &[(String, String)],
        policy: &RetryPolicy,
    ) -> Result<serde_json::Value, AttemptError> {
        let token = self.token_source.current();
        let mut request = self
            .http
            .post(url)
            .timeout(policy.attempt_timeout)
            .header("accept", "application/json, text/plain, */*")
            .header("x-requested-with", "XMLHttpRequest")
            .form(&form);
        if !token.is_empty() {
            request = request.header("X-CSRF-TOKEN", token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(reqwest::header::RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());

        let body = response
            .text()
            .await
            .map_err(|e| AttemptError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(AttemptError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
                retry_after,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            AttemptError::Parse(format!("invalid JSON: {} | body: {}", e, truncate_body(&body)))
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 2000;
    if body.len() <= MAX {
        body.to_string()
    } else {
        format!("{}...[truncated]", &body[..MAX])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(initial_ms: u64, multiplier: f64, cap_ms: u64) -> RetryPolicy {
        RetryPolicy {
            attempt_timeout: Duration::from_secs(1),
            max_retries: 3,
            initial_delay: Duration::from_millis(initial_ms),
            multiplier,
            max_delay: Duration::from_millis(cap_ms),
            total_budget: Duration::from_secs(60),
        }
    }

    #[test]
    fn backoff_grows_geometrically() {
        let p = policy(100, 2.0, 60_000);
        assert_eq!(backoff_delay(&p, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(&p, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(&p, 3), Duration::from_millis(400));
        assert_eq!(backoff_delay(&p, 4), Duration::from_millis(800));
    }

    #[test]
    fn backoff_respects_cap() {
        let p = policy(1_000, 10.0, 5_000);
        assert_eq!(backoff_delay(&p, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(&p, 2), Duration::from_secs(5));
        assert_eq!(backoff_delay(&p, 5), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn token_observes_cancel() {
        let source = CancelSource::new();
        let token = source.token();
        assert!(!token.is_cancelled());
        source.cancel();
        assert!(token.is_cancelled());
        // Resolves immediately once fired.
        token.cancelled().await;
    }

    #[tokio::test(start_paused = true)]
    async fn disconnected_token_never_fires() {
        let token = CancelToken::disconnected();
        let waited = tokio::time::timeout(Duration::from_secs(3600), token.cancelled()).await;
        assert!(waited.is_err());
    }
}
