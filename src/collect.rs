// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Run the registered reporters in order and assemble the combined report
// role: processing/aggregator
// inputs: Ordered reporter list built by the caller; ReportConfig
// outputs: CIReportDataFields with one entry per reporter, in registration order
// invariants:
// - Sequential; no reordering or sorting
// - Fail-fast: the first reporter error aborts with no data
// errors: Reporter errors carry the reporter name as context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use tracing::info;

use crate::model::{CIReportData, CIReportDataFields, CIReportRecord, CIReporterInfo};
use crate::params::ReportConfig;

/// A named data source that produces report records.
pub trait CiReporter {
  fn head(&self) -> CIReporterInfo;
  fn collect_report_data(&self, cfg: &ReportConfig) -> Result<Vec<CIReportRecord>>;
}

pub fn collect_report_data(reporters: &[Box<dyn CiReporter>], cfg: &ReportConfig) -> Result<CIReportDataFields> {
  let mut out = Vec::with_capacity(reporters.len());

  for reporter in reporters {
    let info = reporter.head();
    info!(reporter = %info.name, "collecting report data");

    let records = reporter
      .collect_report_data(cfg)
      .with_context(|| format!("reporter {}", info.name))?;

    info!(reporter = %info.name, records = records.len(), "report data collected");
    out.push(CIReportData { info, records });
  }

  Ok(out)
}
