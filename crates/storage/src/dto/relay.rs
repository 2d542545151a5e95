use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRelayRequest {
    pub class_id: i64,

    #[validate(length(max = 255))]
    pub club: Option<String>,

    #[validate(length(max = 255))]
    pub name: Option<String>,
}
