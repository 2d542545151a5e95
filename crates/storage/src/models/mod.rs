pub mod class;
pub mod competitor;
pub mod registration;
pub mod relay;
pub mod run;

pub use class::RaceClass;
pub use competitor::Competitor;
pub use registration::Registration;
pub use relay::Relay;
pub use run::Run;
