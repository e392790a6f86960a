//! CLI commands for feedsmith
//!
//! ## Version Synthesis
//! - **version**: print the four-part version for a runtime target
//! - **build**: run the external build with that version injected
//!
//! ## Manifest Updates
//! - **catalog**: move fresh build artifacts into dist and append their records
//! - **publish**: record an operator-cut release already packaged in dist
//! - **refresh**: reapply changelog text and ordering without appending
//!
//! ## Inspection
//! - **changelog**: list the parsed changelog entries
//!
//! Every command except `version` takes `&ReleaseContext`.

pub mod build;
pub mod catalog;
pub mod changelog;
pub mod publish;
pub mod refresh;
pub mod version;

pub use build::run_build;
pub use catalog::run_catalog;
pub use changelog::run_changelog;
pub use publish::run_publish;
pub use refresh::run_refresh;
pub use version::run_version;

use crate::core::error::FeedResult;
use crate::core::plan::Operation;
use crate::manifest::{Manifest, MergeSummary, VersionRecord};
use serde::Serialize;
use std::collections::HashMap;

/// Records appended by a merge, in manifest order
fn appended_records(merged: &Manifest, summary: &MergeSummary) -> Vec<VersionRecord> {
  merged
    .versions
    .iter()
    .filter(|r| summary.appended.contains(&r.version))
    .cloned()
    .collect()
}

/// One `UpdateChangelog` per pre-existing record whose text changed
fn changelog_updates(before: &Manifest, after: &Manifest) -> Vec<Operation> {
  let previous: HashMap<&str, &str> = before
    .versions
    .iter()
    .map(|r| (r.version.as_str(), r.changelog.as_str()))
    .collect();

  after
    .versions
    .iter()
    .filter(|r| previous.get(r.version.as_str()).is_some_and(|&old| old != r.changelog))
    .map(|r| Operation::UpdateChangelog {
      version: r.version.clone(),
    })
    .collect()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> FeedResult<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}
