pub mod dashboard;
pub mod empty;
pub mod error;
