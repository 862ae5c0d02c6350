//! Environment variable access.

use std::env;

use super::RealEnvironment;

impl RealEnvironment {
    #[tracing::instrument(skip(self))]
    pub(crate) fn env_var_impl(&self, key: &str) -> Result<String, env::VarError> {
        env::var(key)
    }
}
