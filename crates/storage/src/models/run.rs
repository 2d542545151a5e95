use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Binding of a competitor to a relay leg. `relay_id` and `leg` are
/// either both set or both empty.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Run {
    pub id: i64,
    pub competitor_id: i64,
    pub stage_id: i64,
    pub relay_id: Option<i64>,
    pub leg: Option<i64>,
    pub si_id: Option<i64>,
    pub is_running: bool,
}

impl Run {
    pub fn is_assigned(&self) -> bool {
        self.relay_id.is_some() && self.leg.is_some()
    }
}
