//! Retry and backoff.
//!
//! - `policy` - attempt budget and delay bounds
//! - `backoff` - attempt index to delay mapping
//! - `diagnostics` - events emitted before each retry
//! - `retrying` - the retrying transport decorator

mod backoff;
mod diagnostics;
mod policy;
mod retrying;

pub use backoff::{BackoffSchedule, GROWTH_FACTOR};
pub use diagnostics::{
    Diagnostics, Failure, LogDiagnostics, NoopDiagnostics, PROXY_VARS, ProxyEnv, RetryEvent,
};
pub use policy::{
    DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_DELAY_MS, RetryPolicy,
};
pub use retrying::RetryingTransport;
