//! Signup orchestration: validate, persist, notify.

use std::sync::Arc;

use tracing::{error, warn};

use super::ports::{SignupNotifier, VolunteerPersistenceError, VolunteerRepository};
use super::volunteer::{RawSignup, SignupValidationError, Volunteer, VolunteerDraft};

/// Failures a submission can surface to the form boundary.
///
/// Notification failures never appear here: a failed email does not turn a
/// stored submission into an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignupError {
    /// One or more fields failed validation; nothing was stored.
    #[error(transparent)]
    Validation(#[from] SignupValidationError),
    /// The record store rejected the insert; nothing was stored.
    #[error(transparent)]
    Persistence(#[from] VolunteerPersistenceError),
}

/// Coordinates the submission workflow for the public form.
pub struct SignupService {
    repository: Arc<dyn VolunteerRepository>,
    notifier: Arc<dyn SignupNotifier>,
}

impl SignupService {
    /// Wire the service to its record store and notifier.
    pub fn new(repository: Arc<dyn VolunteerRepository>, notifier: Arc<dyn SignupNotifier>) -> Self {
        Self {
            repository,
            notifier,
        }
    }

    /// Process one submission: validate, insert, then notify staff.
    ///
    /// Validation failures never touch the store or the notifier. A
    /// persistence failure aborts the request before any notification is
    /// attempted. Notification failures that the dispatcher chooses to
    /// surface are logged here and the submission still succeeds.
    ///
    /// # Errors
    ///
    /// [`SignupError::Validation`] or [`SignupError::Persistence`].
    pub async fn submit(&self, raw: &RawSignup) -> Result<Volunteer, SignupError> {
        let draft = VolunteerDraft::parse(raw)?;
        let volunteer = self.repository.insert(draft).await?;

        if let Err(err) = self.notifier.notify(&volunteer).await {
            error!(volunteer = %volunteer.id, error = %err, "staff notification failed");
            warn!(volunteer = %volunteer.id, "submission stored without staff notification");
        }

        Ok(volunteer)
    }

    /// All stored volunteers, newest first.
    ///
    /// # Errors
    ///
    /// Propagates [`VolunteerPersistenceError`] from the store.
    pub async fn list_all(&self) -> Result<Vec<Volunteer>, VolunteerPersistenceError> {
        self.repository.list_all().await
    }
}
