//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they only depend on
//! domain services and ports, staying testable without real I/O.

use std::sync::Arc;

use crate::domain::SignupService;
use crate::domain::ports::LoginService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Submission workflow plus listing reads.
    pub signup: Arc<SignupService>,
    /// Staff credential verification.
    pub login: Arc<dyn LoginService>,
}

impl HttpState {
    /// Bundle the services the handlers need.
    pub fn new(signup: Arc<SignupService>, login: Arc<dyn LoginService>) -> Self {
        Self { signup, login }
    }
}
