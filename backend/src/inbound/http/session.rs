//! Session helpers keeping HTTP handlers free of framework specifics.
//!
//! Thin wrapper around Actix sessions so handlers deal with staff identity
//! instead of raw cookie keys.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, StaffId};

pub(crate) const STAFF_ID_KEY: &str = "staff_id";

/// Newtype wrapper exposing higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated staff id in the session cookie.
    ///
    /// # Errors
    ///
    /// Internal error when the session state cannot be written.
    pub fn persist_staff(&self, staff_id: StaffId) -> Result<(), Error> {
        self.0
            .insert(STAFF_ID_KEY, staff_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current staff id from the session, if present.
    ///
    /// A tampered or stale value is treated as anonymous rather than as a
    /// request failure.
    ///
    /// # Errors
    ///
    /// Internal error when the session state cannot be read.
    pub fn staff_id(&self) -> Result<Option<StaffId>, Error> {
        let raw = self
            .0
            .get::<String>(STAFF_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        match raw {
            Some(value) => match StaffId::parse(&value) {
                Ok(id) => Ok(Some(id)),
                Err(error) => {
                    tracing::warn!(%error, "invalid staff id in session cookie");
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    /// Remove all session state, returning the client to anonymous.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
