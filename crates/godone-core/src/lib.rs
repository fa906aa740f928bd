pub mod calendar;
pub mod cli;
pub mod clock;
pub mod commands;
pub mod config;
pub mod dashboard;
pub mod deadline;
pub mod error;
pub mod priority;
pub mod relative;
pub mod render;
pub mod source;
pub mod task;

use std::ffi::OsString;

use chrono::Utc;
use clap::Parser;
use tracing::{
  debug,
  info
};

pub use error::EngineError;

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    json = cli.json,
    "starting godone CLI"
  );

  let cfg = config::Config::load(
    cli.config.as_deref()
  )?;
  debug!(
    file = ?cfg.loaded_file,
    "configuration ready"
  );

  let session = commands::Session {
    renderer: render::Renderer::new(
      &cfg
    ),
    cfg,
    json: cli.json,
    now: Utc::now()
  };

  commands::dispatch(
    &session,
    cli.command
  )?;

  info!("done");
  Ok(())
}
