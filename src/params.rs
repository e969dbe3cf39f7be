use crate::cli::EffectiveConfig;
use crate::filter::FieldFilter;
use crate::sources::github_api::BoardCoordinates;

/// Board field carrying the release an item is tracked against.
pub const RELEASE_FIELD: &str = "K8s Release";

/// Runtime configuration handed to every reporter.
#[derive(Debug, Clone)]
pub struct ReportConfig {
  pub release_version: Option<String>,
  pub filter: FieldFilter,
  pub board: BoardCoordinates,
  pub testgrid_url: String,
}

impl ReportConfig {
  /// The user's filter plus the release allow-list, when a release is selected.
  pub fn board_filter(&self) -> FieldFilter {
    let mut filter = self.filter.clone();

    if let Some(version) = &self.release_version {
      filter.allow_value(RELEASE_FIELD, &format!("v{}", version));
    }

    filter
  }

  pub fn dashboards(&self) -> Vec<String> {
    testgrid_dashboards(self.release_version.as_deref())
  }
}

pub fn testgrid_dashboards(release_version: Option<&str>) -> Vec<String> {
  let mut names = vec![
    "sig-release-master-blocking".to_string(),
    "sig-release-master-informing".to_string(),
  ];

  if let Some(version) = release_version {
    names.push(format!("sig-release-{}-blocking", version));
    names.push(format!("sig-release-{}-informing", version));
  }

  names
}

pub fn build_report_config(cfg: &EffectiveConfig) -> ReportConfig {
  ReportConfig {
    release_version: cfg.release_version.clone(),
    filter: cfg.filter.clone(),
    board: BoardCoordinates {
      org: cfg.org.clone(),
      number: cfg.project_number,
    },
    testgrid_url: cfg.testgrid_url.clone(),
  }
}
