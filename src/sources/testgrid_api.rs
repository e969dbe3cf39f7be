// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch Testgrid dashboard summaries concurrently and classify jobs by overall status
// role: sources/testgrid
// inputs: dashboard names; base URL (default https://testgrid.k8s.io); env CSR_TEST_TESTGRID_JSON for fixtures
// outputs: DashboardData keyed by dashboard name; DashboardOverview per dashboard
// side_effects: One HTTP GET per dashboard, each on its own worker thread
// invariants:
// - One worker per dashboard; a single unbuffered channel; only the calling thread writes the map
// - Failed dashboards never hide successful ones; the error is None iff every dashboard succeeded
// - overview fails on the first unrecognized status and returns no partial buckets
// errors: Per-dashboard failures wrapped with the dashboard name into DashboardFetchError
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::mpsc;

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use tracing::debug;

use crate::error::{DashboardFailure, DashboardFetchError, UnrecognizedStatus};
use crate::model::{DashboardData, DashboardOverview, JobData, OverallStatus};

pub const DEFAULT_TESTGRID_URL: &str = "https://testgrid.k8s.io";

const FIXTURE_ENV: &str = "CSR_TEST_TESTGRID_JSON";

// --- Trait seam for the summary endpoint ---
pub trait SummarySource: Send + Sync {
  fn fetch_summary(&self, dashboard: &str) -> Result<JobData>;
}

pub struct HttpSummarySource {
  base_url: String,
  agent: ureq::Agent,
}

impl HttpSummarySource {
  pub fn new(base_url: &str) -> Self {
    Self {
      base_url: base_url.trim_end_matches('/').to_string(),
      agent: ureq::AgentBuilder::new().build(),
    }
  }

  pub fn summary_url(&self, dashboard: &str) -> String {
    format!("{}/{}/summary", self.base_url, dashboard)
  }
}

impl SummarySource for HttpSummarySource {
  fn fetch_summary(&self, dashboard: &str) -> Result<JobData> {
    let url = self.summary_url(dashboard);

    let response = self
      .agent
      .get(&url)
      .set("Accept", "application/json")
      .set("User-Agent", "ci-signal-report")
      .call()
      .with_context(|| format!("GET {}", url))?;

    let body = response
      .into_string()
      .with_context(|| format!("reading body of {}", url))?;

    decode_summary(&body).with_context(|| format!("decoding summary from {}", url))
  }
}

/// Decode a summary document; an empty object is treated as an unknown dashboard.
pub fn decode_summary(body: &str) -> Result<JobData> {
  let jobs: JobData = serde_json::from_str(body)?;

  if jobs.is_empty() {
    bail!("summary lists no jobs");
  }

  Ok(jobs)
}

/// Fixture-backed source: `CSR_TEST_TESTGRID_JSON` maps dashboard name to summary JSON.
/// A dashboard absent from the map behaves like a 404.
struct EnvSummarySource {
  fixtures: serde_json::Value,
}

impl SummarySource for EnvSummarySource {
  fn fetch_summary(&self, dashboard: &str) -> Result<JobData> {
    let Some(summary) = self.fixtures.get(dashboard) else {
      bail!("no summary fixture for dashboard {:?}", dashboard);
    };

    decode_summary(&summary.to_string())
  }
}

fn env_wants_mock() -> bool {
  std::env::var(FIXTURE_ENV).is_ok()
}

/// Pick the fixture source when its env var is set, HTTP otherwise.
pub fn make_default_source(base_url: &str) -> Result<Box<dyn SummarySource>> {
  if env_wants_mock() {
    let raw = std::env::var(FIXTURE_ENV)?;
    let fixtures: serde_json::Value =
      serde_json::from_str(&raw).with_context(|| format!("parsing {}", FIXTURE_ENV))?;

    return Ok(Box::new(EnvSummarySource { fixtures }));
  }

  Ok(Box::new(HttpSummarySource::new(base_url)))
}

/// Fetch every dashboard concurrently.
///
/// Returns whatever succeeded alongside a combined error for the rest. Completion
/// order is arbitrary; the map is keyed by dashboard name.
pub fn fetch_dashboards(source: &dyn SummarySource, names: &[String]) -> (DashboardData, Option<DashboardFetchError>) {
  let mut data = DashboardData::new();
  let mut failures = Vec::new();

  std::thread::scope(|scope| {
    let (tx, rx) = mpsc::sync_channel::<(String, Result<JobData>)>(0);

    for name in names {
      let tx = tx.clone();

      scope.spawn(move || {
        debug!(dashboard = %name, "fetching testgrid summary");
        let result = source.fetch_summary(name);
        // the receiver lives until every sender is gone
        let _ = tx.send((name.clone(), result));
      });
    }

    drop(tx);

    for (name, result) in rx {
      match result {
        Ok(mut jobs) => {
          for job in jobs.values_mut() {
            if job.dashboard_name.is_empty() {
              job.dashboard_name = name.clone();
            }
          }
          debug!(dashboard = %name, jobs = jobs.len(), "testgrid summary decoded");
          data.insert(name, jobs);
        }
        Err(cause) => failures.push(DashboardFailure { dashboard: name, cause }),
      }
    }
  });

  if failures.is_empty() {
    (data, None)
  } else {
    (data, Some(DashboardFetchError { failures }))
  }
}

/// Partition job names by overall status.
pub fn overview(jobs: &JobData) -> Result<DashboardOverview, UnrecognizedStatus> {
  let mut out = DashboardOverview::default();

  for (name, job) in jobs {
    let bucket = match &job.overall_status {
      OverallStatus::Passing => &mut out.passing,
      OverallStatus::Flaky => &mut out.flaky,
      OverallStatus::Failing => &mut out.failing,
      OverallStatus::Stale => &mut out.stale,
      OverallStatus::Unrecognized(raw) => {
        return Err(UnrecognizedStatus {
          job: name.clone(),
          status: raw.clone(),
        })
      }
    };

    bucket.push(name.clone());
  }

  Ok(out)
}

/// The "X of Y" fraction embedded in a job's status text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassRate {
  pub passed: u32,
  pub total: u32,
}

impl PassRate {
  pub fn parse(status: &str) -> Option<PassRate> {
    static RE_FRACTION: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"(\d+) of (\d+)").unwrap());

    let caps = RE_FRACTION.captures(status)?;
    let passed = caps.get(1)?.as_str().parse().ok()?;
    let total = caps.get(2)?.as_str().parse().ok()?;

    Some(PassRate { passed, total })
  }

  pub fn percent(&self) -> f64 {
    if self.total == 0 {
      return 0.0;
    }

    f64::from(self.passed) * 100.0 / f64::from(self.total)
  }
}
