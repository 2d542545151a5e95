//! Placing an existing competitor on a relay leg.
//!
//! The competitor either gets a new run, has its current run repointed to
//! the target relay (after the user agreed to take it from another relay),
//! or stays as it is.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use storage::dto::candidate::LegCandidate;
use tracing::{debug, info};

use crate::config::SameRelayPolicy;
use crate::context::AssignmentContext;
use crate::error::Result;
use crate::legs::free_leg;
use crate::notify::{MoveConfirmation, MovePrompt};

/// The competitor picked by the user, with the run it currently has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorSelection {
    pub competitor_id: i64,
    pub si_id: Option<i64>,
    pub run_id: Option<i64>,
    pub relay_id: Option<i64>,
    pub class_id: Option<i64>,
}

impl CompetitorSelection {
    /// Builds a selection from picker values where 0 stands for "none".
    pub fn from_raw(
        competitor_id: i64,
        si_id: i64,
        current_run_id: i64,
        current_relay_id: i64,
        current_class_id: i64,
    ) -> Self {
        let some = |id: i64| (id > 0).then_some(id);
        Self {
            competitor_id,
            si_id: some(si_id),
            run_id: some(current_run_id),
            relay_id: some(current_relay_id),
            class_id: some(current_class_id),
        }
    }
}

impl From<&LegCandidate> for CompetitorSelection {
    fn from(candidate: &LegCandidate) -> Self {
        Self {
            competitor_id: candidate.competitor_id,
            si_id: candidate.si_id,
            run_id: candidate.run_id,
            relay_id: candidate.relay_id,
            class_id: candidate
                .relay_class_id
                .or(Some(candidate.competitor_class_id)),
        }
    }
}

/// The relay slot the dialog was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySlot {
    pub relay_id: i64,
    pub class_id: i64,
}

impl RelaySlot {
    pub fn new(relay_id: i64, class_id: i64) -> Self {
        Self { relay_id, class_id }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Assignment {
    Created {
        run_id: i64,
        leg: i64,
    },
    Repointed {
        run_id: i64,
        leg: i64,
        class_changed: bool,
    },
    /// The competitor already runs for the target relay and the policy
    /// keeps that run.
    Unchanged {
        run_id: i64,
    },
    /// The user refused to take the competitor from its current relay.
    Declined,
}

enum Plan {
    CreateRun,
    Repoint { run_id: i64, update_class: bool },
}

pub struct AssignmentEngine {
    context: AssignmentContext,
    confirmation: Arc<dyn MoveConfirmation>,
    policy: SameRelayPolicy,
}

impl AssignmentEngine {
    pub fn new(
        context: AssignmentContext,
        confirmation: Arc<dyn MoveConfirmation>,
        policy: SameRelayPolicy,
    ) -> Self {
        Self {
            context,
            confirmation,
            policy,
        }
    }

    pub async fn assign(
        &self,
        selection: &CompetitorSelection,
        target: RelaySlot,
    ) -> Result<Assignment> {
        let competitor_id = selection.competitor_id;
        let relay_id = target.relay_id;

        let plan = match (selection.run_id, selection.relay_id) {
            (None, _) => Plan::CreateRun,
            (Some(run_id), Some(current)) if current == relay_id => match self.policy {
                SameRelayPolicy::AddRun => Plan::CreateRun,
                SameRelayPolicy::KeepExisting => {
                    debug!(competitor_id, relay_id, run_id, "already on relay");
                    return Ok(Assignment::Unchanged { run_id });
                }
            },
            (Some(run_id), Some(from_relay_id)) => {
                let prompt = MovePrompt {
                    competitor_id,
                    from_relay_id,
                    to_relay_id: relay_id,
                };
                if !self.confirmation.confirm_move(&prompt) {
                    info!(competitor_id, from_relay_id, relay_id, "move declined");
                    return Ok(Assignment::Declined);
                }
                Plan::Repoint {
                    run_id,
                    update_class: selection.class_id != Some(target.class_id),
                }
            }
            // A run without a relay keeps the competitor's class.
            (Some(run_id), None) => Plan::Repoint {
                run_id,
                update_class: false,
            },
        };

        let _guard = self.context.locks.lock(relay_id).await;
        let mut session = self.context.store.begin().await?;

        let assignment = match plan {
            Plan::CreateRun => {
                let leg = free_leg(session.as_mut(), relay_id).await?;
                let run_id = session
                    .create_run(competitor_id, relay_id, leg, selection.si_id)
                    .await?;
                Assignment::Created { run_id, leg }
            }
            Plan::Repoint {
                run_id,
                update_class,
            } => {
                if update_class {
                    session
                        .update_competitor_class(competitor_id, target.class_id)
                        .await?;
                }
                let leg = free_leg(session.as_mut(), relay_id).await?;
                session
                    .update_run_relay_leg(run_id, relay_id, leg, true)
                    .await?;
                Assignment::Repointed {
                    run_id,
                    leg,
                    class_changed: update_class,
                }
            }
        };

        session.commit().await?;

        info!(competitor_id, relay_id, ?assignment, "leg assigned");
        self.context.notifier.leg_added();

        Ok(assignment)
    }
}
