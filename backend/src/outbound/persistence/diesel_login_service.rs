//! Diesel-backed staff credential verification.
//!
//! Passwords are stored as hex-encoded SHA-256 digests of a per-account
//! random salt concatenated with the password. Unknown users and wrong
//! passwords produce the same `unauthorized` error so the login form does
//! not reveal which accounts exist.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use sha2::{Digest, Sha256};

use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, StaffId};

use super::models::StaffAccountRow;
use super::pool::DbPool;
use super::schema::staff_accounts;

/// Diesel adapter for [`LoginService`].
#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

impl DieselLoginService {
    /// Create a service backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Compute the stored digest for a salt/password pair.
///
/// Exposed so account-provisioning tooling produces digests the service can
/// verify.
pub fn password_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

fn verify_password(password: &str, salt: &str, expected_digest: &str) -> bool {
    // Hex comparison of fixed-length digests; both sides are server-derived.
    password_digest(salt, password) == expected_digest
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<StaffId, Error> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| Error::service_unavailable(err.to_string()))?;

        let account: Option<StaffAccountRow> = staff_accounts::table
            .filter(staff_accounts::username.eq(credentials.username()))
            .select(StaffAccountRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| Error::internal(err.to_string()))?;

        let Some(account) = account else {
            return Err(Error::unauthorized("invalid credentials"));
        };

        if verify_password(
            credentials.password(),
            &account.password_salt,
            &account.password_digest,
        ) {
            Ok(StaffId::from_uuid(account.id))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
