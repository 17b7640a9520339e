//! Day planner CLI library.
//!
//! This crate provides the `dayplan` command-line interface on top of the
//! event engine (`dp-core`) and the day-file store (`dp-store`).

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::{CategoryConfig, Config};
