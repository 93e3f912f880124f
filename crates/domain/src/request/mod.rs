//! Request-side types: method, headers and the resolved request.

mod headers;
mod method;
mod resolved;

pub use headers::{Header, Headers};
pub use method::HttpMethod;
pub use resolved::ResolvedRequest;
