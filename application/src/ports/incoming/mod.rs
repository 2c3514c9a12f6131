pub mod admin;
pub mod board;
pub mod paint;
pub mod tokens;
