use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRegistrationRequest {
    #[validate(length(min = 1, max = 255))]
    pub first_name: String,

    #[validate(length(min = 1, max = 255))]
    pub last_name: String,

    #[validate(length(max = 255))]
    pub registration: Option<String>,

    #[validate(length(max = 255))]
    pub licence: Option<String>,

    #[validate(range(min = 1))]
    pub si_id: Option<i64>,
}
