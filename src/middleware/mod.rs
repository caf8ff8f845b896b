pub mod auth_extractor;
pub mod rate_limit;
