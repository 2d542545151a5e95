use sqlx::SqliteConnection;

use crate::dto::registration::CreateRegistrationRequest;
use crate::error::{Result, StorageError};
use crate::models::Registration;

pub struct RegistrationRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> RegistrationRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&mut self) -> Result<Vec<Registration>> {
        let registrations = sqlx::query_as::<_, Registration>(
            r#"
            SELECT id, first_name, last_name, registration, licence, si_id
            FROM registrations
            ORDER BY last_name, first_name
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(registrations)
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Registration> {
        sqlx::query_as::<_, Registration>(
            r#"
            SELECT id, first_name, last_name, registration, licence, si_id
            FROM registrations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn create(&mut self, req: &CreateRegistrationRequest) -> Result<Registration> {
        let registration = sqlx::query_as::<_, Registration>(
            r#"
            INSERT INTO registrations (first_name, last_name, registration, licence, si_id)
            VALUES (?, ?, ?, ?, ?)
            RETURNING id, first_name, last_name, registration, licence, si_id
            "#,
        )
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.registration)
        .bind(&req.licence)
        .bind(req.si_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(registration)
    }
}
