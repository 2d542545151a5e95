use async_trait::async_trait;
use sqlx::{Sqlite, SqlitePool, Transaction};
use storage::Database;
use storage::dto::competitor::{CreateCompetitorRequest, CreatedCompetitor};
use storage::error::Result;
use storage::repository::{CompetitorRepository, RunRepository};

use super::{RunSession, RunStore};

/// [`RunStore`] over the SQLite event database. Each session is one
/// `BEGIN IMMEDIATE` transaction: the write lock is taken before the legs
/// are read, so a session never has to upgrade a read snapshot.
#[derive(Debug, Clone)]
pub struct SqlRunStore {
    pool: SqlitePool,
    stage_count: u32,
}

impl SqlRunStore {
    /// `stage_count` is the number of unassigned runs created together
    /// with every new competitor.
    pub fn new(db: &Database, stage_count: u32) -> Self {
        Self {
            pool: db.pool().clone(),
            stage_count,
        }
    }
}

#[async_trait]
impl RunStore for SqlRunStore {
    async fn begin(&self) -> Result<Box<dyn RunSession>> {
        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;
        Ok(Box::new(SqlRunSession {
            tx,
            stage_count: self.stage_count,
        }))
    }
}

struct SqlRunSession {
    tx: Transaction<'static, Sqlite>,
    stage_count: u32,
}

#[async_trait]
impl RunSession for SqlRunSession {
    async fn list_legs(&mut self, relay_id: i64) -> Result<Vec<i64>> {
        RunRepository::new(&mut self.tx).list_legs(relay_id).await
    }

    async fn create_run(
        &mut self,
        competitor_id: i64,
        relay_id: i64,
        leg: i64,
        si_id: Option<i64>,
    ) -> Result<i64> {
        RunRepository::new(&mut self.tx)
            .create(competitor_id, relay_id, leg, si_id)
            .await
    }

    async fn update_run_relay_leg(
        &mut self,
        run_id: i64,
        relay_id: i64,
        leg: i64,
        is_running: bool,
    ) -> Result<()> {
        RunRepository::new(&mut self.tx)
            .update_relay_leg(run_id, relay_id, leg, is_running)
            .await
    }

    async fn update_competitor_class(&mut self, competitor_id: i64, class_id: i64) -> Result<()> {
        CompetitorRepository::new(&mut self.tx)
            .update_class(competitor_id, class_id)
            .await
    }

    async fn create_competitor(
        &mut self,
        request: &CreateCompetitorRequest,
    ) -> Result<CreatedCompetitor> {
        CompetitorRepository::new(&mut self.tx)
            .create(request, self.stage_count)
            .await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
