//! HTTP client built on the retrying transport.

mod client;

pub use client::{HttpClient, ensure_success};
