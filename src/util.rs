// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for token discovery, timestamp formatting, text clipping and man page rendering
// role: utilities/helpers
// inputs: env GITHUB_TOKEN / GH_TOKEN; optional `gh` CLI; epoch timestamps; clap CommandFactory
// outputs: Token strings, RFC3339 timestamps, clipped cells, man page text
// side_effects: get_github_token may spawn `gh auth token`
// invariants:
// - Token discovery prefers GITHUB_TOKEN, then GH_TOKEN, then `gh auth token`; blank values are skipped
// - clip_chars never splits a character
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{SecondsFormat, TimeZone, Utc};
use clap::CommandFactory;

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn get_github_token() -> Option<String> {
  for var in ["GITHUB_TOKEN", "GH_TOKEN"] {
    if let Ok(t) = std::env::var(var) {
      if !t.trim().is_empty() {
        return Some(t.trim().to_string());
      }
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

/// Testgrid reports run times in seconds or, on newer endpoints, milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Format a Unix timestamp as RFC3339 UTC; zero or negative means "never".
pub fn epoch_to_rfc3339(epoch: i64) -> Option<String> {
  if epoch <= 0 {
    return None;
  }

  let secs = if epoch >= MILLIS_THRESHOLD { epoch / 1000 } else { epoch };
  let dt = Utc.timestamp_opt(secs, 0).single()?;

  Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true))
}

/// Clip `text` to at most `max` characters, marking the cut with "...".
pub fn clip_chars(text: &str, max: usize) -> String {
  if text.chars().count() <= max {
    return text.to_string();
  }

  let keep = max.saturating_sub(3);
  let mut out: String = text.chars().take(keep).collect();
  out.push_str("...");

  out
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
