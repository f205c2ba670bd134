//! API module
//!
//! HTTP client for the dashboard REST API, the middleware pipeline every call
//! runs through, and the wire types.

mod client;
pub mod interceptors;
pub mod middleware;
pub mod types;

pub use client::{ApiClient, ApiClientBuilder};
pub use interceptors::{AuthFailureGuard, BearerAuth, RequestTracing};
pub use middleware::{Middleware, Next, RequestContext};
