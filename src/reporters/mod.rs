// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Named reporters (GitHub board, Testgrid) and the caller-side construction of the reporter list
// role: reporters/namespace
// inputs: EffectiveConfig (selection, endpoints); GitHub token discovery
// outputs: Ordered Vec<Box<dyn CiReporter>>: GitHub first, then Testgrid
// invariants: A selected GitHub reporter without a token fails before any request is made
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod github;
pub mod testgrid;

use anyhow::Result;

use crate::cli::EffectiveConfig;
use crate::collect::CiReporter;
use crate::sources::{github_api, testgrid_api};
use crate::util;

pub fn build_reporters(cfg: &EffectiveConfig) -> Result<Vec<Box<dyn CiReporter>>> {
  let mut reporters: Vec<Box<dyn CiReporter>> = Vec::new();

  if cfg.selection.wants_github() {
    let api = github_api::make_default_api(&cfg.graphql_url, util::get_github_token())?;
    reporters.push(Box::new(github::GithubReporter::new(api)));
  }

  if cfg.selection.wants_testgrid() {
    let source = testgrid_api::make_default_source(&cfg.testgrid_url)?;
    reporters.push(Box::new(testgrid::TestgridReporter::new(source)));
  }

  Ok(reporters)
}
