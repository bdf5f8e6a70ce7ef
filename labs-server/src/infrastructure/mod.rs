pub mod config;
pub mod database;
pub mod logging;
pub mod rate_limit;
pub mod security;
