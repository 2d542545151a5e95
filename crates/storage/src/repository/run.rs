use sqlx::SqliteConnection;

use crate::dto::candidate::{LegCandidate, RelayLegEntry};
use crate::error::{Result, StorageError};
use crate::models::Run;

const CANDIDATE_SELECT: &str = r#"
    SELECT c.id AS competitor_id,
           COALESCE(c.last_name, '') || ' ' || COALESCE(c.first_name, '') AS competitor_name,
           c.registration,
           c.licence,
           c.si_id,
           c.class_id AS competitor_class_id,
           r.id AS run_id,
           r.relay_id,
           r.leg,
           CASE WHEN rl.id IS NULL THEN NULL
                ELSE COALESCE(rl.club, '') || ' ' || COALESCE(rl.name, '')
           END AS relay_name,
           rl.class_id AS relay_class_id,
           cl.name AS class_name
    FROM competitors c
    LEFT JOIN runs r ON r.competitor_id = c.id
    LEFT JOIN relays rl ON rl.id = r.relay_id
    LEFT JOIN classes cl ON cl.id = rl.class_id
"#;

/// Repository for runs, the competitor-to-relay-leg bindings
pub struct RunRepository<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> RunRepository<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Legs in use on a relay, ascending, without NULLs
    pub async fn list_legs(&mut self, relay_id: i64) -> Result<Vec<i64>> {
        let legs = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT leg
            FROM runs
            WHERE leg IS NOT NULL AND relay_id = ?
            ORDER BY leg
            "#,
        )
        .bind(relay_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(legs)
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Run> {
        sqlx::query_as::<_, Run>(
            r#"
            SELECT id, competitor_id, stage_id, relay_id, leg, si_id, is_running
            FROM runs
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?
        .ok_or(StorageError::NotFound)
    }

    pub async fn list_for_competitor(&mut self, competitor_id: i64) -> Result<Vec<Run>> {
        let runs = sqlx::query_as::<_, Run>(
            r#"
            SELECT id, competitor_id, stage_id, relay_id, leg, si_id, is_running
            FROM runs
            WHERE competitor_id = ?
            ORDER BY id
            "#,
        )
        .bind(competitor_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(runs)
    }

    /// Insert a run already placed on a relay leg
    pub async fn create(
        &mut self,
        competitor_id: i64,
        relay_id: i64,
        leg: i64,
        si_id: Option<i64>,
    ) -> Result<i64> {
        sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO runs (competitor_id, relay_id, leg, si_id)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(competitor_id)
        .bind(relay_id)
        .bind(leg)
        .bind(si_id)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| StorageError::from_write(e, "Leg already taken"))
    }

    /// Point an existing run at a relay leg
    pub async fn update_relay_leg(
        &mut self,
        id: i64,
        relay_id: i64,
        leg: i64,
        is_running: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE runs
            SET relay_id = ?,
                leg = ?,
                is_running = ?
            WHERE id = ?
            "#,
        )
        .bind(relay_id)
        .bind(leg)
        .bind(is_running)
        .bind(id)
        .execute(&mut *self.conn)
        .await
        .map_err(|e| StorageError::from_write(e, "Leg already taken"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    /// Runs placed on a relay, in leg order
    pub async fn list_relay_legs(&mut self, relay_id: i64) -> Result<Vec<RelayLegEntry>> {
        let entries = sqlx::query_as::<_, RelayLegEntry>(
            r#"
            SELECT r.id AS run_id,
                   r.leg,
                   c.id AS competitor_id,
                   COALESCE(c.last_name, '') || ' ' || COALESCE(c.first_name, '') AS competitor_name,
                   r.si_id,
                   r.is_running
            FROM runs r
            JOIN competitors c ON c.id = r.competitor_id
            WHERE r.relay_id = ? AND r.leg IS NOT NULL
            ORDER BY r.leg
            "#,
        )
        .bind(relay_id)
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(entries)
    }

    /// Every competitor with each of its runs, ordered by competitor name
    pub async fn list_candidates(&mut self) -> Result<Vec<LegCandidate>> {
        let sql = format!("{CANDIDATE_SELECT} ORDER BY competitor_name, r.id");
        let candidates = sqlx::query_as::<_, LegCandidate>(&sql)
            .fetch_all(&mut *self.conn)
            .await?;

        Ok(candidates)
    }

    /// The picker row for one competitor. Without `run_id` the competitor's
    /// first run is used.
    pub async fn find_candidate(
        &mut self,
        competitor_id: i64,
        run_id: Option<i64>,
    ) -> Result<LegCandidate> {
        let sql = format!(
            "{CANDIDATE_SELECT} WHERE c.id = ? AND (? IS NULL OR r.id = ?) ORDER BY r.id LIMIT 1"
        );
        sqlx::query_as::<_, LegCandidate>(&sql)
            .bind(competitor_id)
            .bind(run_id)
            .bind(run_id)
            .fetch_optional(&mut *self.conn)
            .await?
            .ok_or(StorageError::NotFound)
    }
}
