use sqlx::SqliteConnection;

use crate::dto::relay::CreateRelayRequest;
use crate::error::{Result, StorageError};
use crate::models::Relay;

/// Repository for relay teams
pub struct RelayRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> RelayRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// List relays grouped by class, then by club and name
    pub async fn list(&mut self) -> Result<Vec<Relay>> {
        let relays = sqlx::query_as::<_, Relay>(
            r#"
            SELECT id, class_id, club, name
            FROM relays
            ORDER BY class_id, club, name
            "#,
        )
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(relays)
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Relay> {
        sqlx::query_as::<_, Relay>("SELECT id, class_id, club, name FROM relays WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&mut self, req: &CreateRelayRequest) -> Result<Relay> {
        let relay = sqlx::query_as::<_, Relay>(
            r#"
            INSERT INTO relays (class_id, club, name)
            VALUES (?, ?, ?)
            RETURNING id, class_id, club, name
            "#,
        )
        .bind(req.class_id)
        .bind(&req.club)
        .bind(&req.name)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(relay)
    }
}
