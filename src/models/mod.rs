pub mod alert;
pub mod config;
pub mod embedding;
pub mod health;
pub mod insight;
pub mod user;

pub use health::HealthRecord;
