//! Domain ports for driven adapters.
//!
//! Ports describe how the domain expects to reach the record store, the staff
//! directory, and the mail transport. Each trait exposes strongly typed
//! errors so adapters map their failures into predictable variants.
//!
//! The in-memory implementations at the bottom back handler tests and the
//! database-less development mode.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;

use super::auth::{LoginCredentials, StaffId};
use super::error::Error as DomainError;
use super::volunteer::{Volunteer, VolunteerDraft, VolunteerId};

/// Failures surfaced by volunteer persistence adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VolunteerPersistenceError {
    /// The store could not be reached (pool exhausted, connection refused).
    #[error("volunteer store unavailable: {message}")]
    Connection { message: String },
    /// The store rejected or failed the statement.
    #[error("volunteer store query failed: {message}")]
    Query { message: String },
}

impl VolunteerPersistenceError {
    /// Create a connection-level error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query-level error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Record store port: insert on submission, list for the staff view.
#[async_trait]
pub trait VolunteerRepository: Send + Sync {
    /// Persist a validated draft, assigning id and creation timestamp.
    async fn insert(&self, draft: VolunteerDraft) -> Result<Volunteer, VolunteerPersistenceError>;

    /// All stored volunteers, newest first.
    async fn list_all(&self) -> Result<Vec<Volunteer>, VolunteerPersistenceError>;
}

/// Staff credential verification port.
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials, returning the staff id on success.
    ///
    /// # Errors
    ///
    /// [`DomainError::unauthorized`] for unknown users or wrong passwords;
    /// persistence failures map to their usual service-unavailable/internal
    /// codes.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffId, DomainError>;
}

/// Failures surfaced by notification transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    /// The transport could not deliver the message.
    #[error("mail transport failed: {message}")]
    Transport { message: String },
    /// The mail provider answered with a non-success status.
    #[error("mail provider rejected the message: status {status}")]
    Rejected { status: u16 },
}

impl NotificationError {
    /// Create a transport-level error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Staff notification port, invoked after a successful insert.
#[async_trait]
pub trait SignupNotifier: Send + Sync {
    /// Announce the new volunteer to the configured staff list.
    async fn notify(&self, volunteer: &Volunteer) -> Result<(), NotificationError>;
}

/// In-memory record store for tests and database-less development runs.
#[derive(Default)]
pub struct InMemoryVolunteerRepository {
    records: Mutex<Vec<Volunteer>>,
}

impl InMemoryVolunteerRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VolunteerRepository for InMemoryVolunteerRepository {
    async fn insert(
        &self,
        draft: VolunteerDraft,
    ) -> Result<Volunteer, VolunteerPersistenceError> {
        let volunteer = Volunteer::from_draft(draft, VolunteerId::random(), Utc::now());
        let mut records = self
            .records
            .lock()
            .map_err(|_| VolunteerPersistenceError::query("record store lock poisoned"))?;
        records.push(volunteer.clone());
        Ok(volunteer)
    }

    async fn list_all(&self) -> Result<Vec<Volunteer>, VolunteerPersistenceError> {
        let records = self
            .records
            .lock()
            .map_err(|_| VolunteerPersistenceError::query("record store lock poisoned"))?;
        let mut all = records.clone();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }
}

/// Fixture login for tests and database-less development runs.
///
/// Accepts a single configured username/password pair and always resolves to
/// the same staff id, so a dev session survives server restarts.
pub struct FixtureLoginService {
    username: String,
    password: String,
    staff_id: StaffId,
}

impl FixtureLoginService {
    /// Create a fixture that accepts exactly the given pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            staff_id: StaffId::random(),
        }
    }

    /// The staff id returned on successful authentication.
    pub fn staff_id(&self) -> StaffId {
        self.staff_id
    }
}

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffId, DomainError> {
        if credentials.username() == self.username && credentials.password() == self.password {
            Ok(self.staff_id)
        } else {
            Err(DomainError::unauthorized("invalid credentials"))
        }
    }
}

/// Notifier that drops every message. Used where notifications are disabled.
pub struct NoOpNotifier;

#[async_trait]
impl SignupNotifier for NoOpNotifier {
    async fn notify(&self, _volunteer: &Volunteer) -> Result<(), NotificationError> {
        Ok(())
    }
}
