use thiserror::Error;

/// One dashboard that could not be fetched or decoded.
#[derive(Debug, Error)]
#[error("dashboard {dashboard}: {cause:#}")]
pub struct DashboardFailure {
  pub dashboard: String,
  pub cause: anyhow::Error,
}

/// Every failure of a multi-dashboard fetch, in completion order.
#[derive(Debug, Error)]
#[error("{} dashboard(s) failed: {}", .failures.len(), join_failures(.failures))]
pub struct DashboardFetchError {
  pub failures: Vec<DashboardFailure>,
}

impl DashboardFetchError {
  pub fn dashboards(&self) -> Vec<&str> {
    self.failures.iter().map(|f| f.dashboard.as_str()).collect()
  }
}

fn join_failures(failures: &[DashboardFailure]) -> String {
  failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; ")
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("job {job} has unrecognized overall status {status:?}")]
pub struct UnrecognizedStatus {
  pub job: String,
  pub status: String,
}
