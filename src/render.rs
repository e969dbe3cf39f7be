use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;

use crate::model::{CIReportData, CIReportDataFields, CIReportRecord};
use crate::util::clip_chars;

const COLUMNS: [&str; 5] = ["ID", "TITLE", "STATUS", "SIGS", "URL"];
const HIDDEN_WHEN_SHORT: [&str; 2] = ["RESOLVED", "PASSING"];
const MAX_TITLE_CHARS: usize = 60;

pub fn render_json(data: &CIReportDataFields) -> Result<String> {
  Ok(serde_json::to_string_pretty(data)?)
}

/// Records to show; `short` hides the ones already settled.
pub fn visible_records(records: &[CIReportRecord], short: bool) -> Vec<&CIReportRecord> {
  records
    .iter()
    .filter(|r| !(short && HIDDEN_WHEN_SHORT.contains(&r.status.as_str())))
    .collect()
}

pub fn category_counts(records: &[&CIReportRecord]) -> BTreeMap<String, usize> {
  let mut counts = BTreeMap::new();

  for r in records {
    *counts.entry(r.status.clone()).or_insert(0) += 1;
  }

  counts
}

pub fn footer_line(counts: &BTreeMap<String, usize>) -> String {
  let total: usize = counts.values().sum();
  let mut parts = vec![format!("TOTAL: {}", total)];
  parts.extend(counts.iter().map(|(status, n)| format!("{}: {}", status, n)));

  parts.join(" | ")
}

fn row_cells(r: &CIReportRecord) -> [String; 5] {
  [
    r.id.clone(),
    clip_chars(&r.title, MAX_TITLE_CHARS),
    r.status.clone(),
    r.sigs.join(","),
    r.url.clone(),
  ]
}

fn border(widths: &[usize; 5]) -> String {
  let mut line = String::from("+");

  for w in widths {
    line.push_str(&"-".repeat(w + 2));
    line.push('+');
  }

  line
}

fn row(cells: &[String; 5], widths: &[usize; 5]) -> String {
  let mut line = String::from("|");

  for (cell, w) in cells.iter().zip(widths) {
    let pad = w - cell.chars().count();
    let _ = write!(line, " {}{} |", cell, " ".repeat(pad));
  }

  line
}

pub fn render_table(data: &CIReportData, short: bool) -> String {
  let shown = visible_records(&data.records, short);
  let header = COLUMNS.map(String::from);
  let rows: Vec<[String; 5]> = shown.iter().map(|r| row_cells(r)).collect();

  let mut widths = header.clone().map(|h| h.chars().count());
  for cells in &rows {
    for (w, cell) in widths.iter_mut().zip(cells) {
      *w = (*w).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let _ = writeln!(out, "{} REPORT", data.info.name.to_uppercase());
  let _ = writeln!(out, "{}", border(&widths));
  let _ = writeln!(out, "{}", row(&header, &widths));
  let _ = writeln!(out, "{}", border(&widths));
  for cells in &rows {
    let _ = writeln!(out, "{}", row(cells, &widths));
  }
  let _ = writeln!(out, "{}", border(&widths));
  let _ = writeln!(out, "{}", footer_line(&category_counts(&shown)));

  out
}

pub fn render_tables(data: &CIReportDataFields, short: bool) -> String {
  data
    .iter()
    .map(|d| render_table(d, short))
    .collect::<Vec<_>>()
    .join("\n")
}
