use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use wk_cli::commands::{clock, project, report, status, time, util};
use wk_cli::store::{self, Store};
use wk_cli::{Cli, ClockAction, Commands, Config, ProjectAction};
use wk_core::{LoadRange, Milliseconds, TimeIntervalId};

fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");
    Ok(config)
}

/// Resolves `--at`, defaulting to now.
fn instant_at(at: Option<&str>, now: Milliseconds) -> Result<Milliseconds> {
    at.map_or(Ok(now), |at| util::parse_instant(at, now, &Local))
}

fn ids(values: &[i64]) -> Vec<TimeIntervalId> {
    values.iter().copied().map(TimeIntervalId::new).collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let now = Milliseconds::now();
    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Project(action)) => {
            let config = load_config(cli.config.as_deref())?;
            match action {
                ProjectAction::Add { name } => {
                    store::update(&config, |store| project::add(&mut stdout, store, name))?;
                }
                ProjectAction::List { position, size } => {
                    let store = Store::open(&config)?;
                    project::list(&mut stdout, &store, LoadRange::new(*position, *size))?;
                }
                ProjectAction::Remove { name } => {
                    store::update(&config, |store| project::remove(&mut stdout, store, name))?;
                }
            }
        }
        Some(Commands::Clock(action)) => {
            let config = load_config(cli.config.as_deref())?;
            match action {
                ClockAction::In { project, at } => {
                    let at = instant_at(at.as_deref(), now)?;
                    store::update(&config, |store| {
                        clock::clock_in(&mut stdout, store, project, at, &Local)
                    })?;
                }
                ClockAction::Out { project, at } => {
                    let at = instant_at(at.as_deref(), now)?;
                    store::update(&config, |store| {
                        clock::clock_out(&mut stdout, store, project, at, &Local, config.time_format)
                    })?;
                }
            }
        }
        Some(Commands::Register { project, ids: values }) => {
            let config = load_config(cli.config.as_deref())?;
            store::update(&config, |store| {
                time::register(&mut stdout, store, project, &ids(values))
            })?;
        }
        Some(Commands::RemoveTime { ids: values }) => {
            let config = load_config(cli.config.as_deref())?;
            store::update(&config, |store| time::remove(&mut stdout, store, &ids(values)))?;
        }
        Some(Commands::Status) => {
            let config = load_config(cli.config.as_deref())?;
            let store = Store::open(&config)?;
            status::run(
                &mut stdout,
                &store,
                config.time_summary,
                config.time_format,
                now,
                &Local,
            )?;
        }
        Some(Commands::Report {
            project,
            days,
            position,
            size,
            not_registered,
            json,
        }) => {
            let config = load_config(cli.config.as_deref())?;
            let store = Store::open(&config)?;
            let options = report::ReportOptions {
                by_day: *days,
                not_registered: *not_registered,
                json: *json,
                range: LoadRange::new(*position, *size),
                format: config.time_format,
            };
            report::run(&mut stdout, &store, project, &options, now, &Local)?;
        }
        None => {
            // No subcommand, show help
            use clap::CommandFactory;
            Cli::command().print_help()?;
            writeln!(stdout)?;
        }
    }

    Ok(())
}
