use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Relay {
    pub id: i64,
    pub class_id: i64,
    pub club: Option<String>,
    pub name: Option<String>,
}

impl Relay {
    /// "club name", the label the relay is listed under.
    pub fn display_name(&self) -> String {
        format!(
            "{} {}",
            self.club.as_deref().unwrap_or_default(),
            self.name.as_deref().unwrap_or_default()
        )
    }
}
