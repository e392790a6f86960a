//! `feedsmith version`: print the synthesized version for a target

use crate::core::error::FeedResult;
use crate::core::vcs::SystemGit;
use crate::version::{BaseVersion, BuildMode, FourPartVersion, RuntimeTarget, synthesize};
use std::path::Path;

/// Synthesize the version for `target`
///
/// The base comes from `base` when given, otherwise from the latest git tag
/// under `root` (falling back to `0.0.0`).
pub fn resolve_version(
  root: &Path,
  target: RuntimeTarget,
  publish: bool,
  run: u64,
  base: Option<&str>,
) -> FeedResult<FourPartVersion> {
  let tag = match base {
    Some(base) => Some(base.to_string()),
    None => SystemGit::new(root).latest_tag(),
  };
  tracing::debug!(tag = ?tag, %target, publish, run, "resolving base version");

  let base = BaseVersion::from_tag(tag.as_deref())?;
  Ok(synthesize(&base, target, BuildMode::from_flags(publish, run)))
}

/// Print the version alone on stdout so scripts can capture it
pub fn run_version(root: &Path, target: RuntimeTarget, publish: bool, run: u64, base: Option<String>) -> FeedResult<()> {
  let version = resolve_version(root, target, publish, run, base.as_deref())?;
  println!("{}", version);
  Ok(())
}
