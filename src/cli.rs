use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use once_cell::sync::Lazy;

use crate::filter::FieldFilter;
use crate::sources::github_api::{CI_SIGNAL_ORG, CI_SIGNAL_PROJECT_NUMBER, DEFAULT_GRAPHQL_URL};
use crate::sources::testgrid_api::DEFAULT_TESTGRID_URL;

#[derive(Parser, Debug)]
#[command(
    name = "ci-signal-report",
    version,
    about = "Report CI signal from the GitHub CI signal board and Testgrid dashboards",
    long_about = None
)]
pub struct Cli {
  /// Which reporter to run (default: both, GitHub first)
  #[command(subcommand)]
  pub command: Option<ReporterCommand>,

  /// Release version to include, e.g. 1.31 (adds release-branch dashboards and filters the board)
  #[arg(long, global = true)]
  pub release_version: Option<String>,

  /// Hide records whose status is RESOLVED or PASSING in table output
  #[arg(long, global = true)]
  pub short: bool,

  /// Emit the report as JSON instead of tables
  #[arg(long, global = true)]
  pub json: bool,

  /// Keep only board items whose FIELD equals one of the given values (repeatable)
  #[arg(long = "allow", value_name = "FIELD=VALUE", global = true)]
  pub allow: Vec<String>,

  /// Drop board items whose FIELD equals VALUE (repeatable)
  #[arg(long = "deny", value_name = "FIELD=VALUE", global = true)]
  pub deny: Vec<String>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Testgrid base URL (hidden; tests only)
  #[arg(long, hide = true, global = true, default_value = DEFAULT_TESTGRID_URL)]
  pub testgrid_url: String,

  /// GitHub GraphQL endpoint (hidden; tests only)
  #[arg(long, hide = true, global = true, default_value = DEFAULT_GRAPHQL_URL)]
  pub graphql_url: String,

  /// Organization owning the CI signal board (hidden)
  #[arg(long, hide = true, global = true, default_value = CI_SIGNAL_ORG)]
  pub org: String,

  /// Project number of the CI signal board (hidden)
  #[arg(long, hide = true, global = true, default_value_t = CI_SIGNAL_PROJECT_NUMBER)]
  pub project_number: u32,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterCommand {
  /// Report items from the GitHub CI signal project board
  Github,
  /// Report job states from Testgrid dashboards
  Testgrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReporterSelection {
  All,
  Github,
  Testgrid,
}

impl ReporterSelection {
  pub fn wants_github(&self) -> bool {
    matches!(self, ReporterSelection::All | ReporterSelection::Github)
  }

  pub fn wants_testgrid(&self) -> bool {
    matches!(self, ReporterSelection::All | ReporterSelection::Testgrid)
  }
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub selection: ReporterSelection,
  pub release_version: Option<String>, // "1.31", without a leading "v"
  pub short: bool,
  pub json: bool,
  pub filter: FieldFilter,
  pub testgrid_url: String,
  pub graphql_url: String,
  pub org: String,
  pub project_number: u32,
}

fn normalize_release_version(raw: &str) -> Result<String> {
  static RE_VERSION: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^\d+\.\d+$").unwrap());

  let trimmed = raw.trim();
  let version = trimmed.strip_prefix('v').unwrap_or(trimmed);

  if !RE_VERSION.is_match(version) {
    bail!("invalid --release-version {:?}: expected MAJOR.MINOR, e.g. 1.31", raw);
  }

  Ok(version.to_string())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  let selection = match cli.command {
    None => ReporterSelection::All,
    Some(ReporterCommand::Github) => ReporterSelection::Github,
    Some(ReporterCommand::Testgrid) => ReporterSelection::Testgrid,
  };

  let release_version = cli.release_version.as_deref().map(normalize_release_version).transpose()?;

  let filter = FieldFilter::parse_pairs(&cli.allow, &cli.deny).context("parsing --allow/--deny")?;

  Ok(EffectiveConfig {
    selection,
    release_version,
    short: cli.short,
    json: cli.json,
    filter,
    testgrid_url: cli.testgrid_url.trim_end_matches('/').to_string(),
    graphql_url: cli.graphql_url,
    org: cli.org,
    project_number: cli.project_number,
  })
}
