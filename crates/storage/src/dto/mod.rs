pub mod candidate;
pub mod competitor;
pub mod registration;
pub mod relay;
