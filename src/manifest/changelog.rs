//! Changelog index: release notes keyed by `major.minor.patch`
//!
//! The changelog document is loosely structured text. An entry starts with a
//! heading naming one or more versions and the release date:
//!
//! ```text
//! - v3.1.0、v1.1.0（2024-05-01）：
//!   - Fix poster lookup
//!   - Add season images
//! ```
//!
//! followed by a block indented deeper than the heading. Every version on the
//! heading gets the same block text, with the block's common indentation
//! stripped. Headings are parsed with winnow; a line that does not parse as a
//! whole heading is ordinary text.

use crate::core::error::{FeedResult, ResultExt};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{preceded, separated, terminated};
use winnow::prelude::*;
use winnow::token::one_of;

/// One parsed changelog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeLogEntry {
  /// Three-part versions listed on the heading, without the `v`
  pub versions: Vec<String>,
  pub date: NaiveDate,
  /// Reflowed bullet block
  pub body: String,
}

/// Lookup from a three-part version prefix to release notes
#[derive(Debug, Clone, Default)]
pub struct ChangeLogIndex {
  entries: Vec<ChangeLogEntry>,
  by_prefix: BTreeMap<String, usize>,
}

impl ChangeLogIndex {
  /// Build the index from changelog text
  ///
  /// When two entries list the same version the topmost one wins.
  pub fn parse(text: &str) -> Self {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let lines: Vec<&str> = text.lines().collect();
    let mut index = Self::default();

    let mut i = 0;
    while i < lines.len() {
      let Some((versions, date)) = parse_heading(lines[i]) else {
        i += 1;
        continue;
      };

      let heading_indent = indent_of(lines[i]);
      let start = i + 1;
      let mut end = start;
      while end < lines.len() && is_block_line(lines[end], heading_indent) {
        end += 1;
      }

      let body = reflow(&lines[start..end]);
      if body.is_empty() {
        tracing::debug!(line = i + 1, "changelog heading without a bullet block");
      } else {
        index.insert(ChangeLogEntry { versions, date, body });
      }
      i = end;
    }

    index
  }

  /// Load and parse the changelog at `path`; a missing file gives an empty index
  pub fn load(path: &Path) -> FeedResult<Self> {
    match fs::read_to_string(path) {
      Ok(text) => {
        let index = Self::parse(&text);
        tracing::debug!(path = %path.display(), entries = index.entries.len(), "loaded changelog");
        Ok(index)
      }
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        tracing::debug!(path = %path.display(), "no changelog document, using fallback text");
        Ok(Self::default())
      }
      Err(e) => Err(e).with_context(|| format!("Failed to read changelog {}", path.display())),
    }
  }

  fn insert(&mut self, entry: ChangeLogEntry) {
    let position = self.entries.len();
    for version in &entry.versions {
      self.by_prefix.entry(version.clone()).or_insert(position);
    }
    self.entries.push(entry);
  }

  /// Release notes for a `major.minor.patch` prefix
  pub fn get(&self, prefix: &str) -> Option<&str> {
    self
      .by_prefix
      .get(prefix)
      .map(|&position| self.entries[position].body.as_str())
  }

  /// Entries in document order
  pub fn entries(&self) -> &[ChangeLogEntry] {
    &self.entries
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Parse a heading line into its versions and date
fn parse_heading(line: &str) -> Option<(Vec<String>, NaiveDate)> {
  heading.parse(line.trim()).ok()
}

fn heading(input: &mut &str) -> ModalResult<(Vec<String>, NaiveDate)> {
  ("-", space0).parse_next(input)?;
  let versions: Vec<String> = separated(1.., version_tag, (one_of(['、', ',', '，']), space0)).parse_next(input)?;
  (space0, one_of(['（', '('])).parse_next(input)?;
  let date = terminated(release_date, one_of(['）', ')'])).parse_next(input)?;
  one_of(['：', ':']).parse_next(input)?;
  Ok((versions, date))
}

/// `v1.2.3` → `"1.2.3"`
fn version_tag(input: &mut &str) -> ModalResult<String> {
  preceded('v', (digit1, '.', digit1, '.', digit1).take())
    .map(|s: &str| s.to_string())
    .parse_next(input)
}

/// `2024-01-01`
fn release_date(input: &mut &str) -> ModalResult<NaiveDate> {
  (digit1, '-', digit1, '-', digit1)
    .take()
    .try_map(|s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
    .parse_next(input)
}

fn indent_of(line: &str) -> usize {
  line.len() - line.trim_start_matches([' ', '\t']).len()
}

fn is_block_line(line: &str, heading_indent: usize) -> bool {
  !line.trim().is_empty() && indent_of(line) > heading_indent && parse_heading(line).is_none()
}

/// Strip the block's common indentation and join the lines
fn reflow(lines: &[&str]) -> String {
  let common = lines.iter().map(|line| indent_of(line)).min().unwrap_or(0);
  lines
    .iter()
    .map(|line| line[common..].trim_end())
    .collect::<Vec<_>>()
    .join("\n")
}
