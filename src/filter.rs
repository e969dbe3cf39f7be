// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Allow/deny predicates over a board item's flattened fields
// role: filtering/predicates
// inputs: Item fields in source order; allow and deny lists keyed by field name
// outputs: Admit/reject decision per item
// invariants:
// - Per field: deny check first, then allow check; the first rejection ends evaluation
// - An allow-listed field the item does not carry rejects the item
// - With no intersecting filter the item is admitted
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use anyhow::{bail, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
  pub allow: BTreeMap<String, Vec<String>>,
  pub deny: BTreeMap<String, Vec<String>>,
}

impl FieldFilter {
  pub fn is_empty(&self) -> bool {
    self.allow.is_empty() && self.deny.is_empty()
  }

  pub fn allow_value(&mut self, field: &str, value: &str) {
    self.allow.entry(field.to_string()).or_default().push(value.to_string());
  }

  pub fn deny_value(&mut self, field: &str, value: &str) {
    self.deny.entry(field.to_string()).or_default().push(value.to_string());
  }

  /// Build a filter from `Field=Value` strings as given on the command line.
  pub fn parse_pairs(allow: &[String], deny: &[String]) -> Result<FieldFilter> {
    let mut filter = FieldFilter::default();

    for pair in allow {
      let (field, value) = split_pair(pair)?;
      filter.allow_value(field, value);
    }

    for pair in deny {
      let (field, value) = split_pair(pair)?;
      filter.deny_value(field, value);
    }

    Ok(filter)
  }

  pub fn admits(&self, fields: &[(String, String)]) -> bool {
    for (name, value) in fields {
      if let Some(denied) = self.deny.get(name) {
        if denied.iter().any(|d| d == value) {
          return false;
        }
      }

      if let Some(allowed) = self.allow.get(name) {
        if !allowed.iter().any(|a| a == value) {
          return false;
        }
      }
    }

    self.allow.keys().all(|required| fields.iter().any(|(name, _)| name == required))
  }
}

fn split_pair(pair: &str) -> Result<(&str, &str)> {
  match pair.split_once('=') {
    Some((field, value)) if !field.trim().is_empty() => Ok((field.trim(), value.trim())),
    _ => bail!("invalid field filter {:?}: expected FIELD=VALUE", pair),
  }
}
