pub mod class;
pub mod competitor;
pub mod registration;
pub mod relay;
pub mod run;

pub use class::ClassRepository;
pub use competitor::CompetitorRepository;
pub use registration::RegistrationRepository;
pub use relay::RelayRepository;
pub use run::RunRepository;
