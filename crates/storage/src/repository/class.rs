use sqlx::SqliteConnection;

use crate::error::{Result, StorageError};
use crate::models::RaceClass;

pub struct ClassRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> ClassRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&mut self) -> Result<Vec<RaceClass>> {
        let classes = sqlx::query_as::<_, RaceClass>("SELECT id, name FROM classes ORDER BY name")
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(classes)
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<RaceClass> {
        sqlx::query_as::<_, RaceClass>("SELECT id, name FROM classes WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn create(&mut self, name: &str) -> Result<RaceClass> {
        sqlx::query_as::<_, RaceClass>("INSERT INTO classes (name) VALUES (?) RETURNING id, name")
            .bind(name)
            .fetch_one(&mut *self.conn)
            .await
            .map_err(|e| StorageError::from_write(e, "Class name already exists"))
    }
}
