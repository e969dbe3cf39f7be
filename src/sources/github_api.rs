// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Page through a GitHub Projects V2 board over GraphQL and flatten each item's field values
// role: sources/github-board
// inputs: board coordinates (org, project number); bearer token; env CSR_TEST_BOARD_PAGES_JSON for fixtures
// outputs: BoardItem list in board order, already narrowed by the field filter
// side_effects: Sequential POSTs to the GraphQL endpoint, one per page
// invariants:
// - Cursor pagination starts empty and follows endCursor while hasNextPage
// - Any page failure aborts the query; no partial item list is returned
// - Text field values win unless empty; single-select values otherwise
// errors: Transport, GraphQL `errors`, and missing project surface with page context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::ext::serde_json::JsonFetch;
use crate::filter::FieldFilter;
use crate::model::{BoardItem, ContentKind, FieldValue, ItemContent};

pub const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
pub const CI_SIGNAL_ORG: &str = "kubernetes";
pub const CI_SIGNAL_PROJECT_NUMBER: u32 = 68;

const FIXTURE_ENV: &str = "CSR_TEST_BOARD_PAGES_JSON";
const ITEMS_PATH: &str = "organization.projectV2.items";

const BOARD_ITEMS_QUERY: &str = r#"
query($org: String!, $number: Int!, $cursor: String) {
  organization(login: $org) {
    projectV2(number: $number) {
      items(first: 100, after: $cursor) {
        pageInfo { hasNextPage endCursor }
        nodes {
          id
          content {
            __typename
            ... on Issue { url title createdAt labels(first: 20) { nodes { name } } }
            ... on PullRequest { url title createdAt labels(first: 20) { nodes { name } } }
          }
          fieldValues(first: 20) {
            nodes {
              __typename
              ... on ProjectV2ItemFieldTextValue { text field { ... on ProjectV2FieldCommon { name } } }
              ... on ProjectV2ItemFieldSingleSelectValue { name field { ... on ProjectV2FieldCommon { name } } }
            }
          }
        }
      }
    }
  }
}
"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardCoordinates {
  pub org: String,
  pub number: u32,
}

impl Default for BoardCoordinates {
  fn default() -> Self {
    Self {
      org: CI_SIGNAL_ORG.to_string(),
      number: CI_SIGNAL_PROJECT_NUMBER,
    }
  }
}

// --- Trait seam for the GraphQL endpoint ---
pub trait BoardApi {
  /// Fetch one page; `cursor` is empty for the first page. Returns the `data` object.
  fn fetch_page(&self, board: &BoardCoordinates, cursor: &str) -> Result<serde_json::Value>;
}

pub struct GraphqlHttpApi {
  url: String,
  token: String,
  agent: ureq::Agent,
}

impl GraphqlHttpApi {
  pub fn new(url: &str, token: String) -> Self {
    Self {
      url: url.to_string(),
      token,
      agent: ureq::AgentBuilder::new().build(),
    }
  }
}

impl BoardApi for GraphqlHttpApi {
  fn fetch_page(&self, board: &BoardCoordinates, cursor: &str) -> Result<serde_json::Value> {
    let after = if cursor.is_empty() { serde_json::Value::Null } else { cursor.into() };
    let payload = serde_json::json!({
      "query": BOARD_ITEMS_QUERY,
      "variables": { "org": board.org, "number": board.number, "cursor": after },
    });

    let response = self
      .agent
      .post(&self.url)
      .set("Accept", "application/json")
      .set("User-Agent", "ci-signal-report")
      .set("Authorization", &format!("Bearer {}", self.token))
      .send_json(payload)
      .with_context(|| format!("POST {}", self.url))?;

    let body: serde_json::Value = response.into_json().context("decoding GraphQL response")?;

    graphql_data(body)
  }
}

/// Unwrap a GraphQL response body into its `data`, surfacing the `errors` array.
fn graphql_data(body: serde_json::Value) -> Result<serde_json::Value> {
  let messages: Vec<String> = body
    .fetch("errors")
    .get()
    .and_then(|e| e.as_array())
    .map(|errors| errors.iter().map(|e| e.fetch("message").to_or_default::<String>()).collect())
    .unwrap_or_default();

  if !messages.is_empty() {
    bail!("GraphQL errors: {}", messages.join("; "));
  }

  match body.get("data") {
    Some(data) if !data.is_null() => Ok(data.clone()),
    _ => bail!("GraphQL response has no data"),
  }
}

/// Fixture-backed API: `CSR_TEST_BOARD_PAGES_JSON` is an array of GraphQL response bodies.
/// The page after the one whose endCursor matches the request cursor is served.
struct EnvBoardApi {
  pages: Vec<serde_json::Value>,
}

impl BoardApi for EnvBoardApi {
  fn fetch_page(&self, _board: &BoardCoordinates, cursor: &str) -> Result<serde_json::Value> {
    let index = if cursor.is_empty() {
      0
    } else {
      let path = format!("data.{}.pageInfo.endCursor", ITEMS_PATH);
      let previous = self
        .pages
        .iter()
        .position(|p| p.fetch(&path).to::<String>().as_deref() == Some(cursor))
        .with_context(|| format!("no fixture page ends at cursor {:?}", cursor))?;

      previous + 1
    };

    let Some(page) = self.pages.get(index) else {
      bail!("no fixture page {}", index);
    };

    graphql_data(page.clone())
  }
}

fn env_wants_mock() -> bool {
  std::env::var(FIXTURE_ENV).is_ok()
}

/// Pick the fixture API when its env var is set; otherwise a token is required.
pub fn make_default_api(url: &str, token: Option<String>) -> Result<Box<dyn BoardApi>> {
  if env_wants_mock() {
    let raw = std::env::var(FIXTURE_ENV)?;
    let pages: Vec<serde_json::Value> =
      serde_json::from_str(&raw).with_context(|| format!("parsing {}", FIXTURE_ENV))?;

    return Ok(Box::new(EnvBoardApi { pages }));
  }

  let Some(token) = token else {
    bail!("no GitHub token found: set GITHUB_TOKEN (or GH_TOKEN, or log in with `gh auth login`)");
  };

  Ok(Box::new(GraphqlHttpApi::new(url, token)))
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
  #[serde(rename = "pageInfo")]
  page_info: PageInfo,
  #[serde(default)]
  nodes: Vec<ItemNode>,
}

#[derive(Debug, Deserialize)]
struct PageInfo {
  #[serde(rename = "hasNextPage")]
  has_next_page: bool,
  #[serde(rename = "endCursor", default)]
  end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NodeList<T> {
  #[serde(default = "Vec::new")]
  nodes: Vec<T>,
}

impl<T> Default for NodeList<T> {
  fn default() -> Self {
    Self { nodes: Vec::new() }
  }
}

#[derive(Debug, Deserialize)]
struct ItemNode {
  id: String,
  #[serde(default)]
  content: Option<ContentNode>,
  #[serde(rename = "fieldValues", default)]
  field_values: NodeList<FieldValue>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "__typename")]
enum ContentNode {
  Issue(ContentFields),
  PullRequest(ContentFields),
  #[serde(other)]
  Other,
}

#[derive(Debug, Deserialize)]
struct ContentFields {
  #[serde(default)]
  url: String,
  #[serde(default)]
  title: String,
  #[serde(rename = "createdAt", default)]
  created_at: Option<String>,
  #[serde(default)]
  labels: NodeList<LabelNode>,
}

#[derive(Debug, Deserialize)]
struct LabelNode {
  name: String,
}

impl ContentFields {
  fn into_content(self, kind: ContentKind) -> ItemContent {
    ItemContent {
      kind,
      url: self.url,
      title: self.title,
      created_at: self.created_at,
      labels: self.labels.nodes.into_iter().map(|l| l.name).collect(),
    }
  }
}

fn decode_items_page(data: &serde_json::Value) -> Result<ItemsPage> {
  let Some(items) = data.fetch(ITEMS_PATH).get() else {
    bail!("project board not found (no {} in response)", ITEMS_PATH);
  };

  serde_json::from_value(items.clone()).context("decoding board items page")
}

fn upsert(fields: &mut Vec<(String, String)>, key: &str, value: &str) {
  match fields.iter_mut().find(|(k, _)| k == key) {
    Some(slot) => slot.1 = value.to_string(),
    None => fields.push((key.to_string(), value.to_string())),
  }
}

fn into_board_item(node: ItemNode) -> BoardItem {
  let mut fields: Vec<(String, String)> = Vec::new();

  for value in &node.field_values.nodes {
    if let Some((name, value)) = value.resolve() {
      upsert(&mut fields, name, value);
    }
  }

  let content = match node.content {
    Some(ContentNode::Issue(c)) => Some(c.into_content(ContentKind::Issue)),
    Some(ContentNode::PullRequest(c)) => Some(c.into_content(ContentKind::PullRequest)),
    Some(ContentNode::Other) | None => None,
  };

  if let Some(c) = &content {
    upsert(&mut fields, "Title", &c.title);
    upsert(&mut fields, c.kind.url_key(), &c.url);
  }

  let title = fields
    .iter()
    .find(|(k, _)| k == "Title")
    .map(|(_, v)| v.clone())
    .unwrap_or_default();

  BoardItem {
    id: node.id,
    title,
    fields,
    content,
  }
}

/// Query every page of the board, keeping the items the filter admits.
pub fn query_board_items(api: &dyn BoardApi, board: &BoardCoordinates, filter: &FieldFilter) -> Result<Vec<BoardItem>> {
  let mut items = Vec::new();
  let mut cursor = String::new();
  let mut page_no = 0usize;

  loop {
    page_no += 1;

    let data = api
      .fetch_page(board, &cursor)
      .with_context(|| format!("fetching board page {} of {}/{}", page_no, board.org, board.number))?;
    let page = decode_items_page(&data).with_context(|| format!("board page {}", page_no))?;

    debug!(page = page_no, nodes = page.nodes.len(), "board page fetched");

    for node in page.nodes {
      let item = into_board_item(node);

      if filter.admits(&item.fields) {
        items.push(item);
      } else {
        debug!(item = %item.id, "board item rejected by field filter");
      }
    }

    if !page.page_info.has_next_page {
      break;
    }

    cursor = match page.page_info.end_cursor {
      Some(c) if !c.is_empty() => c,
      _ => bail!("board page {} has more items but no end cursor", page_no),
    };
  }

  Ok(items)
}
