use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::store::{RunSession, RunStore};

/// First gap in an ascending leg sequence, or one past its contiguous
/// prefix. An empty sequence yields 1.
pub fn first_free_leg(legs: impl IntoIterator<Item = i64>) -> i64 {
    let mut free_leg = 1;
    for leg in legs {
        if leg != free_leg {
            break;
        }
        free_leg += 1;
    }
    free_leg
}

/// Free leg of `relay_id` as seen by `session`.
pub async fn free_leg(session: &mut dyn RunSession, relay_id: i64) -> Result<i64> {
    let legs = session.list_legs(relay_id).await?;
    let leg = first_free_leg(legs.iter().copied());
    debug!(relay_id, used = legs.len(), leg, "computed free leg");
    Ok(leg)
}

/// Answers "which leg comes next" for a relay outside of an assignment.
#[derive(Clone)]
pub struct LegAssigner {
    store: Arc<dyn RunStore>,
}

impl LegAssigner {
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self { store }
    }

    pub async fn find_free_leg(&self, relay_id: i64) -> Result<i64> {
        let mut session = self.store.begin().await?;
        free_leg(session.as_mut(), relay_id).await
    }
}
