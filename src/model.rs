// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the data model (Testgrid summaries, board items, report records) shared by sources, reporters and rendering
// role: model/types
// outputs: Serializable structs with stable field names; report records are immutable once built
// invariants: OverallStatus never fails to deserialize; unknown values are kept verbatim for classification
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Overall state of a Testgrid job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OverallStatus {
  Passing,
  Failing,
  Flaky,
  Stale,
  Unrecognized(String),
}

impl OverallStatus {
  pub fn as_str(&self) -> &str {
    match self {
      OverallStatus::Passing => "PASSING",
      OverallStatus::Failing => "FAILING",
      OverallStatus::Flaky => "FLAKY",
      OverallStatus::Stale => "STALE",
      OverallStatus::Unrecognized(raw) => raw,
    }
  }
}

impl From<String> for OverallStatus {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "PASSING" => OverallStatus::Passing,
      "FAILING" => OverallStatus::Failing,
      "FLAKY" => OverallStatus::Flaky,
      "STALE" => OverallStatus::Stale,
      _ => OverallStatus::Unrecognized(raw),
    }
  }
}

impl From<OverallStatus> for String {
  fn from(status: OverallStatus) -> Self {
    status.as_str().to_string()
  }
}

impl Default for OverallStatus {
  fn default() -> Self {
    OverallStatus::Unrecognized(String::new())
  }
}

impl fmt::Display for OverallStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Summary fields may be `null`; they decode to the zero value like absent ones.
fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

/// A recently failing test as listed in a dashboard summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FailingTest {
  #[serde(deserialize_with = "null_as_default")]
  pub display_name: String,
  #[serde(deserialize_with = "null_as_default")]
  pub test_name: String,
  #[serde(deserialize_with = "null_as_default")]
  pub fail_count: i64,
  #[serde(deserialize_with = "null_as_default")]
  pub fail_timestamp: i64,
  #[serde(deserialize_with = "null_as_default")]
  pub pass_timestamp: i64,
  #[serde(deserialize_with = "null_as_default")]
  pub build_link: String,
  #[serde(deserialize_with = "null_as_default")]
  pub failure_message: String,
  #[serde(deserialize_with = "null_as_default")]
  pub linked_bugs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSummary {
  #[serde(deserialize_with = "null_as_default")]
  pub overall_status: OverallStatus,
  #[serde(deserialize_with = "null_as_default")]
  pub last_run_timestamp: i64,
  #[serde(deserialize_with = "null_as_default")]
  pub last_update_timestamp: i64,
  #[serde(deserialize_with = "null_as_default")]
  pub latest_green: String,
  #[serde(deserialize_with = "null_as_default")]
  pub status: String,
  #[serde(deserialize_with = "null_as_default")]
  pub tests: Vec<FailingTest>,
  #[serde(deserialize_with = "null_as_default")]
  pub dashboard_name: String,
  #[serde(deserialize_with = "null_as_default")]
  pub bug_url: String,
  #[serde(deserialize_with = "null_as_default")]
  pub alert: String,
}

pub type JobData = BTreeMap<String, JobSummary>;

pub type DashboardData = BTreeMap<String, JobData>;

/// Job names of one dashboard grouped by overall status.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardOverview {
  pub passing: Vec<String>,
  pub flaky: Vec<String>,
  pub failing: Vec<String>,
  pub stale: Vec<String>,
}

impl DashboardOverview {
  pub fn total(&self) -> usize {
    self.passing.len() + self.flaky.len() + self.failing.len() + self.stale.len()
  }
}

/// Field fragment of a project board item, keyed on the GraphQL `__typename`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "__typename")]
pub enum FieldValue {
  #[serde(rename = "ProjectV2ItemFieldTextValue")]
  Text {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    field: FieldRef,
  },
  #[serde(rename = "ProjectV2ItemFieldSingleSelectValue")]
  SingleSelect {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    field: FieldRef,
  },
  #[serde(other)]
  Other,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldRef {
  #[serde(default)]
  pub name: String,
}

impl FieldValue {
  /// The `(field, value)` pair this fragment contributes, if any.
  ///
  /// Text wins unless empty; a single-select then supplies both field and value.
  pub fn resolve(&self) -> Option<(&str, &str)> {
    match self {
      FieldValue::Text { text: Some(text), field } if !text.is_empty() => Some((field.name.as_str(), text.as_str())),
      FieldValue::SingleSelect { name: Some(name), field } if !name.is_empty() => {
        Some((field.name.as_str(), name.as_str()))
      }
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
  Issue,
  PullRequest,
}

impl ContentKind {
  pub fn label(&self) -> &'static str {
    match self {
      ContentKind::Issue => "issue",
      ContentKind::PullRequest => "pull request",
    }
  }

  pub fn url_key(&self) -> &'static str {
    match self {
      ContentKind::Issue => "Issue URL",
      ContentKind::PullRequest => "PullRequest URL",
    }
  }
}

/// Issue or pull request linked from a board item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemContent {
  pub kind: ContentKind,
  pub url: String,
  pub title: String,
  pub created_at: Option<String>,
  pub labels: Vec<String>,
}

/// One card of the project board, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardItem {
  pub id: String,
  pub title: String,
  pub fields: Vec<(String, String)>,
  pub content: Option<ItemContent>,
}

impl BoardItem {
  pub fn field(&self, name: &str) -> Option<&str> {
    self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CIReportRecord {
  pub id: String,
  pub title: String,
  pub url: String,
  pub status: String,
  #[serde(default)]
  pub sigs: Vec<String>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub created_timestamp: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CIReporterInfo {
  pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CIReportData {
  pub info: CIReporterInfo,
  pub records: Vec<CIReportRecord>,
}

pub type CIReportDataFields = Vec<CIReportData>;
