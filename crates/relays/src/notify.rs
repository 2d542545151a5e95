use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 64;

/// Fired once after every successful assignment. Carries nothing; the
/// listener reloads whatever view it shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LegAdded;

#[derive(Debug, Clone)]
pub struct LegNotifier {
    sender: broadcast::Sender<LegAdded>,
}

impl LegNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn leg_added(&self) {
        // No receivers is fine.
        let _ = self.sender.send(LegAdded);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LegAdded> {
        self.sender.subscribe()
    }
}

impl Default for LegNotifier {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// The question put to the user before a competitor is taken away from
/// another relay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePrompt {
    pub competitor_id: i64,
    pub from_relay_id: i64,
    pub to_relay_id: i64,
}

impl MovePrompt {
    pub fn message(&self) -> &'static str {
        "Competitor has different relay assigned already. Move it to current one?"
    }
}

/// Synchronous yes/no collaborator.
pub trait MoveConfirmation: Send + Sync {
    fn confirm_move(&self, prompt: &MovePrompt) -> bool;
}

impl<F> MoveConfirmation for F
where
    F: Fn(&MovePrompt) -> bool + Send + Sync,
{
    fn confirm_move(&self, prompt: &MovePrompt) -> bool {
        self(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_subscriber_sees_leg_added() {
        let notifier = LegNotifier::default();
        let mut first = notifier.subscribe();
        let mut second = notifier.subscribe();

        notifier.leg_added();

        assert_eq!(first.recv().await.unwrap(), LegAdded);
        assert_eq!(second.recv().await.unwrap(), LegAdded);
    }

    #[test]
    fn test_leg_added_without_subscribers_is_silent() {
        LegNotifier::default().leg_added();
    }

    #[test]
    fn test_closure_is_a_confirmation() {
        let prompt = MovePrompt {
            competitor_id: 1,
            from_relay_id: 2,
            to_relay_id: 3,
        };
        let decline = |_: &MovePrompt| false;
        assert!(!decline.confirm_move(&prompt));
    }
}
