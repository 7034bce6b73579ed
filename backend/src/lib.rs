//! Volunteer registration backend library modules.
//!
//! A small actix-web service for an animal-welfare NGO: a public form
//! persists volunteer submissions to PostgreSQL, staff are notified by
//! email, and a session-gated listing lets coordinators review entries.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
pub use middleware::Trace;
