//! Transport decorator that retries failed attempts with exponential backoff.

use async_trait::async_trait;
use log::debug;
use reqwest::{Request, Response};

use super::backoff::BackoffSchedule;
use super::diagnostics::{Diagnostics, Failure, LogDiagnostics, RetryEvent};
use super::policy::RetryPolicy;
use crate::error::TransportError;
use crate::transport::{Transport, is_success};

/// Wraps a [`Transport`] and retries every non-2xx response or transport
/// error until an attempt succeeds or the policy's attempt budget runs out.
///
/// The decorator never inspects the method or body: every request is
/// considered safe to resend. When attempts run out, the last outcome is
/// returned exactly as the inner transport produced it, so a final 503 is
/// `Ok(response)` and the caller has to look at the status.
#[derive(Debug, Clone)]
pub struct RetryingTransport<T, D = LogDiagnostics> {
    inner: T,
    policy: RetryPolicy,
    diagnostics: D,
}

impl<T: Transport> RetryingTransport<T> {
    /// Retries through `inner`, logging each retry as a warning.
    pub fn new(inner: T, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            diagnostics: LogDiagnostics::default(),
        }
    }
}

impl<T: Transport, D: Diagnostics> RetryingTransport<T, D> {
    /// Replaces the diagnostics sink.
    pub fn with_diagnostics<D2: Diagnostics>(self, diagnostics: D2) -> RetryingTransport<T, D2> {
        RetryingTransport {
            inner: self.inner,
            policy: self.policy,
            diagnostics,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

#[async_trait]
impl<T: Transport, D: Diagnostics> Transport for RetryingTransport<T, D> {
    #[tracing::instrument(skip(self, request), fields(method = %request.method(), url = %request.url()))]
    async fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        let max_attempts = self.policy.max_attempts;
        if max_attempts == 0 {
            return Err(TransportError::NoAttempts);
        }

        let schedule = BackoffSchedule::from(&self.policy);
        let mut attempt = 1;

        loop {
            let outcome = self.inner.execute(request).await;

            // An Err carries no response, so only Ok outcomes have a status.
            let failure = match &outcome {
                Ok(response) if is_success(response) => None,
                Ok(response) => Some(Failure::Status(response.status())),
                Err(error) => Some(Failure::from_error(error)),
            };

            let Some(failure) = failure else {
                debug!("attempt {}/{} succeeded", attempt, max_attempts);
                return outcome;
            };

            if attempt >= max_attempts {
                debug!(
                    "attempt {}/{} failed ({}), giving up",
                    attempt, max_attempts, failure
                );
                return outcome;
            }

            // Release the connection before waiting.
            drop(outcome);

            let delay = schedule.delay(attempt);
            self.diagnostics.retrying(&RetryEvent {
                attempt,
                max_attempts,
                method: request.method().clone(),
                url: request.url().clone(),
                failure,
                delay,
            });

            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
