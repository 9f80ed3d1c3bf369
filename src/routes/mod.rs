pub mod resilience;
pub mod user;
