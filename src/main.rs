use std::io::IsTerminal;

use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

mod cli;
mod collect;
mod error;
mod ext;
mod filter;
mod model;
mod params;
mod render;
mod reporters;
mod sources;
mod util;

use crate::cli::{Cli, normalize};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

  // stdout carries the report; logs go to stderr
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_ansi(std::io::stderr().is_terminal())
    .init();
}

fn run() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;
  debug!(?cfg, "effective configuration");

  // Phase 2: build reporters (fails early on missing credentials)
  let reporters = reporters::build_reporters(&cfg)?;
  let report_cfg = params::build_report_config(&cfg);

  // Phase 3: collect and render
  let data = collect::collect_report_data(&reporters, &report_cfg)?;

  if cfg.json {
    println!("{}", render::render_json(&data)?);
  } else {
    print!("{}", render::render_tables(&data, cfg.short));
  }

  Ok(())
}

fn main() {
  init_tracing();

  if let Err(err) = run() {
    error!("{:#}", err);
    std::process::exit(1);
  }
}
