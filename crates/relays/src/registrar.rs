use serde::{Deserialize, Serialize};
use storage::dto::competitor::CreateCompetitorRequest;
use storage::models::Registration;
use tracing::{info, warn};
use validator::Validate;

use crate::assignment::RelaySlot;
use crate::context::AssignmentContext;
use crate::error::{RelayError, Result};
use crate::legs::free_leg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredLeg {
    pub competitor_id: i64,
    pub run_id: i64,
    pub leg: i64,
}

/// Turns a pending registration into a competitor running on a relay leg.
pub struct Registrar {
    context: AssignmentContext,
}

impl Registrar {
    pub fn new(context: AssignmentContext) -> Self {
        Self { context }
    }

    /// Creates the competitor in the slot's class and places its first
    /// generated run on the next free leg. All writes share one session.
    pub async fn register_and_assign(
        &self,
        registration: &Registration,
        target: RelaySlot,
    ) -> Result<RegisteredLeg> {
        let request = CreateCompetitorRequest::from_registration(registration, target.class_id);
        request.validate()?;

        let relay_id = target.relay_id;
        let _guard = self.context.locks.lock(relay_id).await;
        let mut session = self.context.store.begin().await?;

        let created = session.create_competitor(&request).await?;
        let competitor_id = created.competitor_id;
        let Some(&run_id) = created.run_ids.first() else {
            warn!(competitor_id, relay_id, "competitor created without a run");
            return Err(RelayError::InvariantViolation(format!(
                "competitor {} was created without a run",
                competitor_id
            )));
        };

        let leg = free_leg(session.as_mut(), relay_id).await?;
        session
            .update_run_relay_leg(run_id, relay_id, leg, true)
            .await?;
        session.commit().await?;

        info!(
            registration_id = registration.id,
            competitor_id, run_id, relay_id, leg, "registration placed on relay"
        );
        self.context.notifier.leg_added();

        Ok(RegisteredLeg {
            competitor_id,
            run_id,
            leg,
        })
    }
}
