//! CLI command implementations.

pub mod check;
pub mod create_post;
pub mod generate;
