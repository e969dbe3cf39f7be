use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use tracing::warn;

use crate::collect::CiReporter;
use crate::model::{CIReportRecord, CIReporterInfo, JobData, JobSummary};
use crate::params::ReportConfig;
use crate::sources::testgrid_api::{fetch_dashboards, overview, PassRate, SummarySource};
use crate::util::epoch_to_rfc3339;

pub const TESTGRID_REPORTER_NAME: &str = "testgrid";

/// Reports every job of the release dashboards, worst state first.
pub struct TestgridReporter {
  source: Box<dyn SummarySource>,
}

impl TestgridReporter {
  pub fn new(source: Box<dyn SummarySource>) -> Self {
    Self { source }
  }
}

impl CiReporter for TestgridReporter {
  fn head(&self) -> CIReporterInfo {
    CIReporterInfo {
      name: TESTGRID_REPORTER_NAME.to_string(),
    }
  }

  fn collect_report_data(&self, cfg: &ReportConfig) -> Result<Vec<CIReportRecord>> {
    let names = cfg.dashboards();
    let (data, failed) = fetch_dashboards(self.source.as_ref(), &names);

    if let Some(err) = failed {
      warn!(failed = ?err.dashboards(), "continuing without some dashboards: {}", err);
    }

    let mut records = Vec::new();

    for name in &names {
      let Some(jobs) = data.get(name) else { continue };
      records.extend(dashboard_records(&cfg.testgrid_url, name, jobs)?);
    }

    Ok(records)
  }
}

fn dashboard_records(base_url: &str, dashboard: &str, jobs: &JobData) -> Result<Vec<CIReportRecord>> {
  let ov = overview(jobs).with_context(|| format!("classifying jobs of dashboard {}", dashboard))?;

  let ordered = ov
    .failing
    .iter()
    .chain(ov.flaky.iter())
    .chain(ov.stale.iter())
    .chain(ov.passing.iter());

  let mut out = Vec::with_capacity(ov.total());

  for job_name in ordered {
    if let Some(job) = jobs.get(job_name) {
      out.push(job_record(base_url, dashboard, job_name, job));
    }
  }

  Ok(out)
}

fn job_record(base_url: &str, dashboard: &str, job_name: &str, job: &JobSummary) -> CIReportRecord {
  CIReportRecord {
    id: format!("{}#{}", dashboard, job_name),
    title: job_name.to_string(),
    url: format!("{}/{}#{}", base_url, dashboard, job_name),
    status: job.overall_status.to_string(),
    sigs: sigs_in_job_name(job_name),
    created_timestamp: epoch_to_rfc3339(job.last_run_timestamp),
    detail: job_detail(job),
  }
}

fn sigs_in_job_name(job_name: &str) -> Vec<String> {
  static RE_SIG: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"(?:^|[-_])sig-([a-z0-9]+)").unwrap());

  let mut sigs: Vec<String> = Vec::new();

  for sig in RE_SIG.captures_iter(job_name).filter_map(|c| c.get(1)) {
    if !sigs.iter().any(|s| s == sig.as_str()) {
      sigs.push(sig.as_str().to_string());
    }
  }

  sigs
}

fn job_detail(job: &JobSummary) -> Option<String> {
  let mut parts = Vec::new();

  if let Some(rate) = PassRate::parse(&job.status) {
    parts.push(format!("{} of {} runs passed ({:.1}%)", rate.passed, rate.total, rate.percent()));
  }

  match job.tests.len() {
    0 => {}
    1 => parts.push("1 failing test".to_string()),
    n => parts.push(format!("{} failing tests", n)),
  }

  if parts.is_empty() {
    None
  } else {
    Some(parts.join(", "))
  }
}
