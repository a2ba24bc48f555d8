//! Report gateway: the retry/backoff core of the service.
//!
//! One `generate` call walks an explicit state machine:
//!
//! ```text
//! Idle -> Sending -> { Success, WaitingToRetry, Failed }
//! ```
//!
//! Rate limiting (HTTP 429) and network-level failures are the only
//! conditions recovered locally, via bounded retry with backoff. Any other
//! HTTP error fails immediately: retrying a structural problem wastes quota
//! and delays error surfacing. A 2xx reply without a usable candidate is
//! also terminal; the API was healthy and a retry would not decode better.

pub mod transport;

pub use transport::{GenerationTransport, HttpGenerationTransport, TransportError, TransportReply};

use rand::Rng;
use serde_json::Value;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use verdant_common::{ChatResponse, GenerationError};

/// Delay schedule between rate-limited attempts.
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// Same delay before every retry. The minimal viable policy.
    Fixed(Duration),
    /// `base * 2^(attempt-1)`, capped.
    Exponential { base: Duration, cap: Duration },
    /// Exponential with the delay drawn uniformly from zero to the
    /// exponential value. Preferred against a shared rate-limited API.
    ExponentialJitter { base: Duration, cap: Duration },
}

impl Backoff {
    /// Delay before attempt `attempt` (1-based; attempt 0 never waits).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        match self {
            Backoff::Fixed(d) => *d,
            Backoff::Exponential { base, cap } => exponential(*base, *cap, attempt),
            Backoff::ExponentialJitter { base, cap } => {
                let upper = exponential(*base, *cap, attempt);
                if upper.is_zero() {
                    upper
                } else {
                    let millis = rand::thread_rng().gen_range(0..=upper.as_millis() as u64);
                    Duration::from_millis(millis)
                }
            }
        }
    }
}

fn exponential(base: Duration, cap: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    base.saturating_mul(factor).min(cap)
}

/// Retry policy for one gateway. `max_attempts` counts the first send.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Zero-delay fixed policy, used by tests to count attempts without
    /// wall-clock waits.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            backoff: Backoff::Fixed(Duration::ZERO),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Backoff::Fixed(Duration::from_secs(2)),
        }
    }
}

/// Per-request state. Terminal outcomes are expressed as returns, so only
/// the live states appear here.
enum RequestState {
    Sending { attempt: u32 },
    WaitingToRetry { next_attempt: u32 },
}

/// The gateway: transport plus policy. No state outlives a `generate` call;
/// concurrent requests share nothing but the transport's HTTP client.
pub struct ReportGateway<T: GenerationTransport> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: GenerationTransport> ReportGateway<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// The underlying transport, exposed for attempt accounting in tests.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Generate report text for a prepared prompt.
    ///
    /// The cancellation token is observed before each send, during the
    /// in-flight call, and during backoff waits; once the caller is gone no
    /// further attempts are made.
    pub async fn generate(
        &self,
        system: &str,
        prompt: &str,
        cancel: &CancellationToken,
    ) -> Result<String, GenerationError> {
        let mut state = RequestState::Sending { attempt: 0 };

        loop {
            match state {
                RequestState::Sending { attempt } => {
                    if cancel.is_cancelled() {
                        return Err(GenerationError::Cancelled);
                    }

                    debug!("Generation attempt {}", attempt + 1);

                    let result = tokio::select! {
                        _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                        r = self.transport.send_prompt(system, prompt) => r,
                    };

                    match result {
                        Ok(reply) if (200..300).contains(&reply.status) => {
                            return match extract_candidate(&reply.body) {
                                Some(text) => {
                                    info!("Generation succeeded after {} attempt(s)", attempt + 1);
                                    Ok(text)
                                }
                                None => {
                                    warn!("2xx reply with no usable candidate");
                                    Err(GenerationError::EmptyGeneration)
                                }
                            };
                        }
                        Ok(reply) if reply.status == 429 => {
                            let attempts = attempt + 1;
                            if attempts >= self.policy.max_attempts {
                                warn!("Rate limit persisted through {} attempts", attempts);
                                return Err(GenerationError::RateLimitExhausted { attempts });
                            }
                            info!("Rate limited on attempt {}, backing off", attempts);
                            state = RequestState::WaitingToRetry {
                                next_attempt: attempts,
                            };
                        }
                        Ok(reply) => {
                            warn!("Generation API returned HTTP {}", reply.status);
                            return Err(GenerationError::UpstreamError(reply.status));
                        }
                        Err(e) => {
                            let attempts = attempt + 1;
                            if attempts >= self.policy.max_attempts {
                                warn!("Network failure persisted through {} attempts: {}", attempts, e);
                                return Err(GenerationError::NetworkError(e.0));
                            }
                            info!("Network failure on attempt {} ({}), backing off", attempts, e);
                            state = RequestState::WaitingToRetry {
                                next_attempt: attempts,
                            };
                        }
                    }
                }
                RequestState::WaitingToRetry { next_attempt } => {
                    let delay = self.policy.backoff.delay_for(next_attempt);
                    if !delay.is_zero() {
                        tokio::select! {
                            _ = cancel.cancelled() => return Err(GenerationError::Cancelled),
                            _ = tokio::time::sleep(delay) => {}
                        }
                    }
                    state = RequestState::Sending {
                        attempt: next_attempt,
                    };
                }
            }
        }
    }
}

/// Pull the first candidate's text out of a chat-completions reply.
/// An undecodable body or whitespace-only text counts as no candidate.
fn extract_candidate(body: &Value) -> Option<String> {
    let reply: ChatResponse = serde_json::from_value(body.clone()).ok()?;
    let text = reply.choices.into_iter().next()?.message.content;

    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_backoff_constant() {
        let b = Backoff::Fixed(Duration::from_secs(2));
        assert_eq!(b.delay_for(1), Duration::from_secs(2));
        assert_eq!(b.delay_for(4), Duration::from_secs(2));
    }

    #[test]
    fn test_exponential_backoff_doubles_and_caps() {
        let b = Backoff::Exponential {
            base: Duration::from_millis(100),
            cap: Duration::from_millis(350),
        };
        assert_eq!(b.delay_for(1), Duration::from_millis(100));
        assert_eq!(b.delay_for(2), Duration::from_millis(200));
        assert_eq!(b.delay_for(3), Duration::from_millis(350)); // capped from 400
    }

    #[test]
    fn test_jitter_stays_within_bound() {
        let b = Backoff::ExponentialJitter {
            base: Duration::from_millis(100),
            cap: Duration::from_millis(800),
        };
        for _ in 0..50 {
            assert!(b.delay_for(2) <= Duration::from_millis(200));
        }
    }

    #[test]
    fn test_jitter_zero_base_never_waits() {
        let b = Backoff::ExponentialJitter {
            base: Duration::ZERO,
            cap: Duration::from_secs(1),
        };
        assert_eq!(b.delay_for(3), Duration::ZERO);
    }

    #[test]
    fn test_extract_candidate_first_choice() {
        let body = json!({
            "choices": [
                { "message": { "role": "assistant", "content": "Water it." } },
                { "message": { "role": "assistant", "content": "Second." } }
            ]
        });
        assert_eq!(extract_candidate(&body), Some("Water it.".to_string()));
    }

    #[test]
    fn test_extract_candidate_empty_list() {
        assert_eq!(extract_candidate(&json!({ "choices": [] })), None);
    }

    #[test]
    fn test_extract_candidate_blank_text() {
        let body = json!({
            "choices": [{ "message": { "role": "assistant", "content": "   " } }]
        });
        assert_eq!(extract_candidate(&body), None);
    }

    #[test]
    fn test_extract_candidate_null_body() {
        assert_eq!(extract_candidate(&Value::Null), None);
    }
}
