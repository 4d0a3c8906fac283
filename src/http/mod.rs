//! HTTP request/response shapes and the transport seam.

pub mod requestbody;
pub mod response;
pub mod transport;

// Re-exports for convenience
pub use requestbody::RequestBody;
pub use response::HttpResponse;
pub use transport::{transport_fn, HttpRequestInfo, Transport};
