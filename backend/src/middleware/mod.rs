//! HTTP middleware: request tracing and proxy-aware HTTPS enforcement.

pub mod https_redirect;
pub mod trace;

pub use https_redirect::RequireHttps;
pub use trace::{Trace, TraceId};
