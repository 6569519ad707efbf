pub mod alerts;
pub mod auth;
pub mod cache;
pub mod profile;
pub mod rate_limit;
pub mod records;
pub mod search;
pub mod summary;
pub mod trend;
pub mod validation;
