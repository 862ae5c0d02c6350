//! Runtime abstraction for process-level reads.
//!
//! Diagnostics read environment variables through this trait so tests can
//! inject values without touching the real process environment.

mod env;

use std::env as std_env;

#[cfg_attr(test, mockall::automock)]
pub trait Environment: Send + Sync {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError>;
}

/// Reads from the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealEnvironment;

impl Environment for RealEnvironment {
    fn env_var(&self, key: &str) -> Result<String, std_env::VarError> {
        self.env_var_impl(key)
    }
}
