//! CLI subcommand implementations.

pub mod clock;
pub mod project;
pub mod report;
pub mod status;
pub mod time;
pub mod util;
