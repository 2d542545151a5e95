//! Persistence boundary of the relay core.
//!
//! Every read and write of one assignment happens on a single
//! [`RunSession`]. Writes become visible on [`RunSession::commit`];
//! dropping a session without committing discards them.

use async_trait::async_trait;
use storage::dto::competitor::{CreateCompetitorRequest, CreatedCompetitor};
use storage::error::Result;

mod sql;

pub use sql::SqlRunStore;

#[async_trait]
pub trait RunStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn RunSession>>;
}

#[async_trait]
pub trait RunSession: Send {
    /// Legs used on `relay_id`, ascending, NULL legs excluded.
    async fn list_legs(&mut self, relay_id: i64) -> Result<Vec<i64>>;

    async fn create_run(
        &mut self,
        competitor_id: i64,
        relay_id: i64,
        leg: i64,
        si_id: Option<i64>,
    ) -> Result<i64>;

    async fn update_run_relay_leg(
        &mut self,
        run_id: i64,
        relay_id: i64,
        leg: i64,
        is_running: bool,
    ) -> Result<()>;

    async fn update_competitor_class(&mut self, competitor_id: i64, class_id: i64) -> Result<()>;

    /// Creates the competitor and whatever runs the store generates for it.
    async fn create_competitor(
        &mut self,
        request: &CreateCompetitorRequest,
    ) -> Result<CreatedCompetitor>;

    async fn commit(self: Box<Self>) -> Result<()>;
}
