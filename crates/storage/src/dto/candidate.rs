use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the competitor picker: a competitor together with one of
/// its runs and, when the run is assigned, the relay and class it
/// belongs to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LegCandidate {
    pub competitor_id: i64,
    pub competitor_name: String,
    pub registration: Option<String>,
    pub licence: Option<String>,
    pub si_id: Option<i64>,
    pub competitor_class_id: i64,
    pub run_id: Option<i64>,
    pub relay_id: Option<i64>,
    pub leg: Option<i64>,
    pub relay_name: Option<String>,
    pub relay_class_id: Option<i64>,
    pub class_name: Option<String>,
}

/// A run currently placed on a relay, listed in leg order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RelayLegEntry {
    pub run_id: i64,
    pub leg: i64,
    pub competitor_id: i64,
    pub competitor_name: String,
    pub si_id: Option<i64>,
    pub is_running: bool,
}
