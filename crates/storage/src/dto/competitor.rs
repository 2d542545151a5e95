use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::Registration;

/// Request payload for creating a new competitor
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCompetitorRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "First name must be between 1 and 255 characters"
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Last name must be between 1 and 255 characters"
    ))]
    pub last_name: String,

    #[validate(length(max = 255))]
    pub registration: Option<String>,

    #[validate(length(max = 255))]
    pub licence: Option<String>,

    #[validate(range(min = 1))]
    pub si_id: Option<i64>,

    pub class_id: i64,
}

impl CreateCompetitorRequest {
    /// Copies the person fields of a registration and puts the new
    /// competitor into `class_id`.
    pub fn from_registration(registration: &Registration, class_id: i64) -> Self {
        Self {
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            registration: registration.registration.clone(),
            licence: registration.licence.clone(),
            si_id: registration.si_id,
            class_id,
        }
    }
}

/// A freshly inserted competitor and the unassigned runs created with it,
/// one per stage in stage order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedCompetitor {
    pub competitor_id: i64,
    pub run_ids: Vec<i64>,
}
