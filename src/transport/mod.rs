//! Transport abstraction.
//!
//! A transport executes one HTTP request and yields the response or a failure.
//! The raw reqwest transport and the retrying decorator both implement the same
//! trait, so decorators can wrap each other freely.

mod raw;

use async_trait::async_trait;
use reqwest::{Request, Response};
use std::sync::Arc;

use crate::error::TransportError;

pub use raw::ReqwestTransport;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Executes `request` once and returns whatever the server answered.
    ///
    /// Non-2xx statuses are returned as `Ok`; `Err` means there is no response.
    async fn execute(&self, request: &Request) -> Result<Response, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).execute(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn execute(&self, request: &Request) -> Result<Response, TransportError> {
        (**self).execute(request).await
    }
}

/// Returns true when `response` carries a 2xx status.
pub fn is_success(response: &Response) -> bool {
    (200..300).contains(&response.status().as_u16())
}
