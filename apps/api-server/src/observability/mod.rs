//! Observability module - request IDs on top of the tracing stack.

mod request_id;

pub use request_id::RequestIdMiddleware;
