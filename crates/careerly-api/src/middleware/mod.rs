//! HTTP middleware: request logging, CORS and production error redaction.

pub mod cors;
pub mod logging;
pub mod redact;

pub use cors::build_cors_layer;
pub use logging::request_logging;
pub use redact::redact_internal_errors;
