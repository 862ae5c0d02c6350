pub mod error;
pub mod http;
pub mod retry;
pub mod runtime;
pub mod transport;

pub use error::TransportError;
pub use retry::{BackoffSchedule, RetryPolicy, RetryingTransport};
pub use transport::{ReqwestTransport, Transport};
