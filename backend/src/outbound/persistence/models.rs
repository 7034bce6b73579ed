//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain; they exist to satisfy Diesel's type
//! requirements for queries and inserts.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{staff_accounts, volunteers};

/// Row struct for reading from the volunteers table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = volunteers)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct VolunteerRow {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub telefone: String,
    pub endereco: String,
    pub cidade: String,
    pub area: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for new volunteer records.
///
/// `created_at` is assigned by the database default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = volunteers)]
pub(crate) struct NewVolunteerRow<'a> {
    pub id: Uuid,
    pub nome: &'a str,
    pub email: &'a str,
    pub telefone: &'a str,
    pub endereco: &'a str,
    pub cidade: &'a str,
    pub area: &'a str,
}

/// Row struct for reading from the staff_accounts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = staff_accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StaffAccountRow {
    pub id: Uuid,
    #[expect(dead_code, reason = "looked up via filter; kept for completeness")]
    pub username: String,
    pub password_digest: String,
    pub password_salt: String,
    #[expect(dead_code, reason = "audit column, not used by authentication")]
    pub created_at: DateTime<Utc>,
}
