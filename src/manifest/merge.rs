//! Merging new records into the manifest
//!
//! A merge is validate-then-mutate: every incoming version is checked against
//! the existing list and against the rest of the batch before anything is
//! appended. After appending, every record (old and new) is re-enriched from
//! the changelog index and the whole list is re-sorted newest first.

use crate::core::config::FeedConfig;
use crate::core::error::{FeedResult, ManifestError};
use crate::manifest::changelog::ChangeLogIndex;
use crate::manifest::document::{Manifest, VersionRecord};
use crate::version::FourPartVersion;
use chrono::{DateTime, Utc};
use serde_json::Map;
use std::cmp::Reverse;
use std::collections::HashSet;

/// Renders version records from the configured publish settings
pub struct RecordBuilder<'a> {
  config: &'a FeedConfig,
}

impl<'a> RecordBuilder<'a> {
  pub fn new(config: &'a FeedConfig) -> Self {
    Self { config }
  }

  /// A record with the fallback changelog; enrichment fills in the real text
  pub fn build(
    &self,
    version: &FourPartVersion,
    file_name: &str,
    checksum: String,
    timestamp: DateTime<Utc>,
  ) -> VersionRecord {
    VersionRecord {
      checksum,
      changelog: self.config.fallback_changelog(&version.prefix()),
      target_abi: self.config.target_abi().for_version(version),
      source_url: self.config.source_url(file_name),
      timestamp,
      version: version.to_string(),
      extra: Map::new(),
    }
  }
}

/// What a merge changed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
  pub appended: Vec<String>,
  /// Records whose changelog text changed during enrichment
  pub enriched: usize,
  pub total: usize,
}

impl Manifest {
  /// Append `records`, then enrich and re-sort the whole list
  ///
  /// Fails with [`ManifestError::DuplicateVersion`] before touching the list
  /// when any incoming version is already listed or repeats within the batch.
  pub fn merge(&mut self, records: Vec<VersionRecord>, index: &ChangeLogIndex) -> FeedResult<MergeSummary> {
    let mut batch = HashSet::new();
    for record in &records {
      self.ensure_absent(&record.version)?;
      if !batch.insert(record.version.as_str()) {
        return Err(
          ManifestError::DuplicateVersion {
            version: record.version.clone(),
          }
          .into(),
        );
      }
    }

    let appended: Vec<String> = records.iter().map(|r| r.version.clone()).collect();
    self.versions.extend(records);
    let enriched = enrich(&mut self.versions, index);
    sort_newest_first(&mut self.versions);

    tracing::debug!(appended = appended.len(), enriched, total = self.versions.len(), "merged manifest");
    Ok(MergeSummary {
      appended,
      enriched,
      total: self.versions.len(),
    })
  }

  /// Re-enrich and re-sort without appending
  pub fn refresh(&mut self, index: &ChangeLogIndex) -> MergeSummary {
    let enriched = enrich(&mut self.versions, index);
    sort_newest_first(&mut self.versions);
    MergeSummary {
      appended: Vec::new(),
      enriched,
      total: self.versions.len(),
    }
  }
}

/// Overwrite `changelog` on every record whose prefix has an index entry
///
/// Returns how many records changed. Running it twice changes nothing the
/// second time.
pub fn enrich(records: &mut [VersionRecord], index: &ChangeLogIndex) -> usize {
  let mut changed = 0;
  for record in records.iter_mut() {
    if let Some(text) = index.get(&record.prefix())
      && record.changelog != text
    {
      record.changelog = text.to_string();
      changed += 1;
    }
  }
  changed
}

/// Stable sort by timestamp descending, ties by version descending
pub fn sort_newest_first(records: &mut [VersionRecord]) {
  records.sort_by_cached_key(|r| {
    (
      Reverse(r.timestamp),
      Reverse(r.version.parse::<FourPartVersion>().ok()),
      Reverse(r.version.clone()),
    )
  });
}
