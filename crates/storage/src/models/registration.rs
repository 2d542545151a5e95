use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Pending person record that is not a competitor yet.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Registration {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub registration: Option<String>,
    pub licence: Option<String>,
    pub si_id: Option<i64>,
}
