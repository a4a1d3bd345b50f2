//! Worker time tracker CLI library.
//!
//! This crate provides the `wk` command-line interface over `wk-core`.

mod cli;
pub mod commands;
mod config;
pub mod store;

pub use cli::{Cli, ClockAction, Commands, ProjectAction};
pub use config::Config;
