pub mod assignment;
pub mod config;
pub mod context;
pub mod error;
pub mod legs;
pub mod locks;
pub mod notify;
pub mod registrar;
pub mod store;

pub use assignment::{Assignment, AssignmentEngine, CompetitorSelection, RelaySlot};
pub use config::{Config, SameRelayPolicy};
pub use context::AssignmentContext;
pub use error::{RelayError, Result};
pub use legs::LegAssigner;
pub use notify::{LegAdded, LegNotifier, MoveConfirmation, MovePrompt};
pub use registrar::{RegisteredLeg, Registrar};
pub use store::{RunSession, RunStore, SqlRunStore};
