use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Competitor {
    pub id: i64,
    pub class_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub registration: Option<String>,
    pub licence: Option<String>,
    pub si_id: Option<i64>,
    pub created_at: chrono::NaiveDateTime,
}
