use anyhow::Result;
use tracing::debug;

use crate::collect::CiReporter;
use crate::model::{BoardItem, CIReportRecord, CIReporterInfo};
use crate::params::ReportConfig;
use crate::sources::github_api::{query_board_items, BoardApi};

pub const GITHUB_REPORTER_NAME: &str = "github";

const STATUS_FIELD: &str = "Status";

/// Reports the cards of the CI signal project board.
pub struct GithubReporter {
  api: Box<dyn BoardApi>,
}

impl GithubReporter {
  pub fn new(api: Box<dyn BoardApi>) -> Self {
    Self { api }
  }
}

impl CiReporter for GithubReporter {
  fn head(&self) -> CIReporterInfo {
    CIReporterInfo {
      name: GITHUB_REPORTER_NAME.to_string(),
    }
  }

  fn collect_report_data(&self, cfg: &ReportConfig) -> Result<Vec<CIReportRecord>> {
    let filter = cfg.board_filter();
    if !filter.is_empty() {
      debug!(allow = ?filter.allow, deny = ?filter.deny, "board field filter");
    }

    let items = query_board_items(self.api.as_ref(), &cfg.board, &filter)?;

    Ok(items.into_iter().map(board_item_record).collect())
  }
}

fn board_item_record(item: BoardItem) -> CIReportRecord {
  let status = item
    .field(STATUS_FIELD)
    .map(|s| s.to_uppercase())
    .unwrap_or_else(|| "UNKNOWN".to_string());

  let (url, sigs, created_timestamp, detail) = match &item.content {
    Some(c) => (
      c.url.clone(),
      c.labels
        .iter()
        .filter_map(|l| l.strip_prefix("sig/"))
        .map(String::from)
        .collect::<Vec<_>>(),
      c.created_at.clone(),
      Some(c.kind.label().to_string()),
    ),
    None => (String::new(), Vec::new(), None, None),
  };

  CIReportRecord {
    id: item.id,
    title: item.title,
    url,
    status,
    sigs,
    created_timestamp,
    detail,
  }
}
