pub mod admin;
pub mod ban;
pub mod board;
pub mod config;
pub mod error;
pub mod infrastructure_config;
pub mod paint;
pub mod persistence;
pub mod ports;
pub mod tokens;
