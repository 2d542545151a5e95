use sqlx::SqliteConnection;

use crate::dto::competitor::{CreateCompetitorRequest, CreatedCompetitor};
use crate::error::{Result, StorageError};
use crate::models::Competitor;

/// Repository for competitors
pub struct CompetitorRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> CompetitorRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Find competitor by ID
    pub async fn find_by_id(&mut self, id: i64) -> Result<Competitor> {
        sqlx::query_as::<_, Competitor>(
            r#"
            SELECT id, class_id, first_name, last_name, registration, licence, si_id, created_at
            FROM competitors
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Insert a competitor together with one unassigned run for every stage
    /// of the event. The run ids come back in stage order.
    pub async fn create(
        &mut self,
        req: &CreateCompetitorRequest,
        stage_count: u32,
    ) -> Result<CreatedCompetitor> {
        let competitor_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO competitors (class_id, first_name, last_name, registration, licence, si_id)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(req.class_id)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .bind(&req.registration)
        .bind(&req.licence)
        .bind(req.si_id)
        .fetch_one(&mut *self.conn)
        .await?;

        let mut run_ids = Vec::with_capacity(stage_count as usize);
        for stage_id in 1..=i64::from(stage_count) {
            let run_id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO runs (competitor_id, stage_id, si_id)
                VALUES (?, ?, ?)
                RETURNING id
                "#,
            )
            .bind(competitor_id)
            .bind(stage_id)
            .bind(req.si_id)
            .fetch_one(&mut *self.conn)
            .await?;
            run_ids.push(run_id);
        }

        Ok(CreatedCompetitor {
            competitor_id,
            run_ids,
        })
    }

    /// Move a competitor to another class
    pub async fn update_class(&mut self, id: i64, class_id: i64) -> Result<()> {
        let result = sqlx::query("UPDATE competitors SET class_id = ? WHERE id = ?")
            .bind(class_id)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}
