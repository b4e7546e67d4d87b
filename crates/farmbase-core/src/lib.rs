//! Cross-cutting service plumbing: tracing setup, request-id middleware,
//! and timestamp formatting shared by the API layer.

pub mod middleware;
pub mod time;
pub mod tracing;
