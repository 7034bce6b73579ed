//! Diesel-backed volunteer record store.
//!
//! Inserts assign the id in Rust and let the database default stamp
//! `created_at`; `RETURNING` hands the completed row back so the domain sees
//! exactly what was stored.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{VolunteerPersistenceError, VolunteerRepository};
use crate::domain::volunteer::{
    City, EmailAddress, FullName, PhoneNumber, StreetAddress, Volunteer, VolunteerArea,
    VolunteerDraft, VolunteerId,
};

use super::models::{NewVolunteerRow, VolunteerRow};
use super::pool::DbPool;
use super::schema::volunteers;

/// Diesel adapter for [`VolunteerRepository`].
#[derive(Clone)]
pub struct DieselVolunteerRepository {
    pool: DbPool,
}

impl DieselVolunteerRepository {
    /// Create a repository backed by the given pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

pub(crate) fn map_diesel_error(error: diesel::result::Error) -> VolunteerPersistenceError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            VolunteerPersistenceError::connection(error.to_string())
        }
        _ => VolunteerPersistenceError::query(error.to_string()),
    }
}

fn volunteer_from_row(row: VolunteerRow) -> Result<Volunteer, VolunteerPersistenceError> {
    let corrupt = |field: &str| {
        VolunteerPersistenceError::query(format!("corrupt {field} value in volunteers row"))
    };

    Ok(Volunteer {
        id: VolunteerId::from_uuid(row.id),
        nome: FullName::parse(&row.nome).map_err(|_| corrupt("nome"))?,
        email: EmailAddress::parse(&row.email).map_err(|_| corrupt("email"))?,
        telefone: PhoneNumber::parse(&row.telefone).map_err(|_| corrupt("telefone"))?,
        endereco: StreetAddress::parse(&row.endereco).map_err(|_| corrupt("endereco"))?,
        cidade: City::try_from(row.cidade.as_str()).map_err(|_| corrupt("cidade"))?,
        area: VolunteerArea::try_from(row.area.as_str()).map_err(|_| corrupt("area"))?,
        created_at: row.created_at,
    })
}

#[async_trait]
impl VolunteerRepository for DieselVolunteerRepository {
    async fn insert(
        &self,
        draft: VolunteerDraft,
    ) -> Result<Volunteer, VolunteerPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| VolunteerPersistenceError::connection(err.to_string()))?;

        let id = VolunteerId::random();
        let row = NewVolunteerRow {
            id: *id.as_uuid(),
            nome: draft.nome.as_str(),
            email: draft.email.as_str(),
            telefone: draft.telefone.as_str(),
            endereco: draft.endereco.as_str(),
            cidade: draft.cidade.as_str(),
            area: draft.area.as_str(),
        };

        let stored: VolunteerRow = diesel::insert_into(volunteers::table)
            .values(&row)
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        volunteer_from_row(stored)
    }

    async fn list_all(&self) -> Result<Vec<Volunteer>, VolunteerPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| VolunteerPersistenceError::connection(err.to_string()))?;

        let rows: Vec<VolunteerRow> = volunteers::table
            .order(volunteers::created_at.desc())
            .select(VolunteerRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter().map(volunteer_from_row).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn row() -> VolunteerRow {
        VolunteerRow {
            id: Uuid::new_v4(),
            nome: "Maria da Silva".to_owned(),
            email: "maria@example.com".to_owned(),
            telefone: "(12) 98765-4321".to_owned(),
            endereco: "Rua das Flores, 123".to_owned(),
            cidade: "Jacareí".to_owned(),
            area: "Associado".to_owned(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn well_formed_rows_convert_to_the_domain_type() {
        let volunteer = volunteer_from_row(row()).expect("valid row");
        assert_eq!(volunteer.cidade, City::Jacarei);
        assert_eq!(volunteer.area, VolunteerArea::Associate);
    }

    #[test]
    fn corrupt_city_is_a_query_error() {
        let mut bad = row();
        bad.cidade = "Atlantis".to_owned();
        let err = volunteer_from_row(bad).expect_err("corrupt row");
        assert!(matches!(err, VolunteerPersistenceError::Query { .. }));
        assert!(err.to_string().contains("cidade"));
    }

    #[test]
    fn not_found_maps_to_a_query_error() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, VolunteerPersistenceError::Query { .. }));
    }
}
