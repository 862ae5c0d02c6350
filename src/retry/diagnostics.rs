//! Diagnostics emitted between attempts.

use log::warn;
use reqwest::{Method, StatusCode, Url};
use std::fmt;
use std::time::Duration;

use crate::error::TransportError;
use crate::runtime::{Environment, RealEnvironment};

/// Proxy variables reported with every retry, in reporting order.
pub const PROXY_VARS: [&str; 6] = [
    "HTTP_PROXY",
    "http_proxy",
    "HTTPS_PROXY",
    "https_proxy",
    "NO_PROXY",
    "no_proxy",
];

/// Why an attempt did not succeed.
#[derive(Debug, Clone, PartialEq)]
pub enum Failure {
    /// A response arrived with a status outside 2xx.
    Status(StatusCode),
    /// The transport failed without producing a response.
    Transport(String),
}

impl Failure {
    pub(crate) fn from_error(error: &TransportError) -> Self {
        Failure::Transport(error.to_string())
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Failure::Status(status) => write!(f, "status code {}", status.as_u16()),
            Failure::Transport(msg) => write!(f, "transport error: {}", msg),
        }
    }
}

/// A failed attempt that is about to be retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryEvent {
    /// 1-based index of the attempt that failed.
    pub attempt: u32,
    pub max_attempts: u32,
    pub method: Method,
    pub url: Url,
    pub failure: Failure,
    /// How long the caller waits before the next attempt.
    pub delay: Duration,
}

/// Sink for retry events. Purely informational; it cannot influence the loop.
#[cfg_attr(test, mockall::automock)]
pub trait Diagnostics: Send + Sync {
    fn retrying(&self, event: &RetryEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn retrying(&self, _event: &RetryEvent) {}
}

/// Snapshot of the proxy variables at one moment.
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyEnv(Vec<(&'static str, Option<String>)>);

impl ProxyEnv {
    pub fn capture<E: Environment + ?Sized>(environment: &E) -> Self {
        Self(
            PROXY_VARS
                .iter()
                .map(|&key| (key, environment.env_var(key).ok()))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| v.as_deref())
    }
}

impl fmt::Display for ProxyEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value.as_deref().unwrap_or(""))?;
        }
        Ok(())
    }
}

/// Logs each retry as a warning, along with the proxy variables in effect.
#[derive(Debug, Clone, Default)]
pub struct LogDiagnostics<E: Environment = RealEnvironment> {
    environment: E,
}

impl<E: Environment> LogDiagnostics<E> {
    pub fn new(environment: E) -> Self {
        Self { environment }
    }
}

impl<E: Environment> Diagnostics for LogDiagnostics<E> {
    fn retrying(&self, event: &RetryEvent) {
        let proxy = ProxyEnv::capture(&self.environment);
        warn!(
            "Failed executing HTTP call: {} {} {}, attempt {}/{}, retrying in {:?}, request sent with: {}",
            event.method,
            event.url,
            event.failure,
            event.attempt,
            event.max_attempts,
            event.delay,
            proxy
        );
    }
}
