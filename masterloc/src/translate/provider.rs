//! Machine-translation capability interface
//!
//! The network clients themselves live outside this crate; the engine only
//! sees the [`TranslationProvider`] trait and a result taxonomy that makes
//! the caller's retry policy a pure function over the result.

use std::thread;
use std::time::Duration;

use thiserror::Error;

/// Errors a translation provider can produce.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Worth retrying: timeout, rate limit, momentary outage.
    #[error("transient provider error: {0}")]
    Transient(String),

    /// Not worth retrying: bad credentials, rejected input, exhausted retries.
    #[error("terminal provider error: {0}")]
    Terminal(String),
}

/// A machine-translation capability.
pub trait TranslationProvider {
    /// Short human-readable name for logs.
    fn name(&self) -> &str;

    /// Translate `text` into `target_lang`.
    fn translate(&self, text: &str, target_lang: &str) -> Result<String, ProviderError>;

    /// Availability check performed once at resolver construction.
    fn validate(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}

/// Bounded retry with fixed inter-attempt delay.
///
/// Transient errors sleep and retry; terminal errors propagate immediately;
/// exhausting the bound escalates the last transient error to terminal.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total number of attempts, including the first one.
    pub max_attempts: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Run `attempt` under this policy.
    pub fn run<F>(&self, mut attempt: F) -> Result<String, ProviderError>
    where
        F: FnMut() -> Result<String, ProviderError>,
    {
        let mut tries = 0;
        loop {
            tries += 1;
            match attempt() {
                Ok(text) => return Ok(text),
                Err(ProviderError::Terminal(msg)) => return Err(ProviderError::Terminal(msg)),
                Err(ProviderError::Transient(msg)) if tries < self.max_attempts => {
                    tracing::warn!(
                        "attempt {}/{} failed: {msg}; retrying in {:?}",
                        tries,
                        self.max_attempts,
                        self.delay
                    );
                    thread::sleep(self.delay);
                }
                Err(ProviderError::Transient(msg)) => {
                    return Err(ProviderError::Terminal(format!(
                        "retries exhausted after {} attempts: {msg}",
                        self.max_attempts
                    )));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn immediate(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            delay: Duration::ZERO,
        }
    }

    #[test]
    fn test_retry_recovers_from_transient() {
        let mut calls = 0;
        let result = immediate(3).run(|| {
            calls += 1;
            if calls < 3 {
                Err(ProviderError::Transient("rate limited".into()))
            } else {
                Ok("done".into())
            }
        });
        assert_eq!(result.unwrap(), "done");
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_terminal_error_is_not_retried() {
        let mut calls = 0;
        let result = immediate(5).run(|| {
            calls += 1;
            Err(ProviderError::Terminal("bad key".into()))
        });
        assert!(matches!(result, Err(ProviderError::Terminal(_))));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_exhaustion_escalates_to_terminal() {
        let mut calls = 0;
        let result = immediate(4).run(|| {
            calls += 1;
            Err(ProviderError::Transient("timeout".into()))
        });
        assert!(matches!(result, Err(ProviderError::Terminal(_))));
        assert_eq!(calls, 4);
    }
}
