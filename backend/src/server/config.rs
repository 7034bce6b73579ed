//! HTTP server configuration object.

use std::net::SocketAddr;

use crate::config::{AppConfig, MailConfig};
use crate::inbound::http::session_config::SessionSettings;
use crate::outbound::persistence::DbPool;

/// Everything [`super::create_server`] needs to assemble the application.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) ssl_redirect: bool,
    pub(crate) mail: MailConfig,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Combine validated session settings with the application configuration.
    pub fn new(session: SessionSettings, app: &AppConfig) -> Self {
        Self {
            session,
            bind_addr: app.bind_addr,
            ssl_redirect: app.ssl_redirect,
            mail: app.mail.clone(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for the persistence adapters.
    ///
    /// Without a pool the server falls back to the in-memory store and the
    /// fixture login, which is only acceptable for development runs.
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
