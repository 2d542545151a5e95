use std::sync::Arc;

use crate::locks::RelayLocks;
use crate::notify::LegNotifier;
use crate::store::RunStore;

/// Collaborators shared by the assignment engine and the registrar. Clones
/// share the same locks and notification channel.
#[derive(Clone)]
pub struct AssignmentContext {
    pub store: Arc<dyn RunStore>,
    pub locks: RelayLocks,
    pub notifier: LegNotifier,
}

impl AssignmentContext {
    pub fn new(store: Arc<dyn RunStore>) -> Self {
        Self {
            store,
            locks: RelayLocks::new(),
            notifier: LegNotifier::default(),
        }
    }
}
