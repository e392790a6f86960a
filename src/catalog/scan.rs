//! Build output discovery and relocation

use crate::catalog::checksum::ChecksumAlgorithm;
use crate::catalog::pattern::ArtifactPattern;
use crate::core::error::{FeedResult, ManifestError, ResultExt};
use crate::ui::progress::FileProgress;
use crate::version::{FourPartVersion, RuntimeTarget};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A freshly built archive found in a build output directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
  /// Target whose output directory held the file
  pub target: RuntimeTarget,
  pub source: PathBuf,
  pub file_name: String,
  pub version: FourPartVersion,
  /// Uppercase hex digest of the full file content
  pub checksum: String,
}

/// Finds, hashes, and relocates build artifacts
pub struct Cataloger {
  pattern: ArtifactPattern,
  algorithm: ChecksumAlgorithm,
  show_progress: bool,
}

impl Cataloger {
  pub fn new(pattern: ArtifactPattern, algorithm: ChecksumAlgorithm) -> Self {
    Self {
      pattern,
      algorithm,
      show_progress: false,
    }
  }

  /// Draw a progress bar while hashing more than one artifact
  pub fn with_progress(mut self, show: bool) -> Self {
    self.show_progress = show;
    self
  }

  /// Scan every output directory in order and hash each matching archive
  ///
  /// Missing directories are skipped: a cycle may build only some targets.
  /// Files that don't match the artifact pattern are ignored.
  pub fn discover(&self, dirs: &[(RuntimeTarget, PathBuf)]) -> FeedResult<Vec<Artifact>> {
    let mut found = Vec::new();
    for (target, dir) in dirs {
      found.extend(self.scan_dir(*target, dir)?);
    }

    let mut progress = (self.show_progress && found.len() > 1).then(|| FileProgress::new(found.len(), "Hashing"));

    let mut artifacts = Vec::with_capacity(found.len());
    for (target, source, file_name, version) in found {
      let checksum = self.algorithm.digest_file(&source)?;
      tracing::debug!(file = %file_name, %checksum, "hashed artifact");
      artifacts.push(Artifact {
        target,
        source,
        file_name,
        version,
        checksum,
      });
      if let Some(ref mut bar) = progress {
        bar.inc();
      }
    }

    Ok(artifacts)
  }

  fn scan_dir(
    &self,
    target: RuntimeTarget,
    dir: &Path,
  ) -> FeedResult<Vec<(RuntimeTarget, PathBuf, String, FourPartVersion)>> {
    if !dir.is_dir() {
      tracing::debug!(dir = %dir.display(), %target, "build output directory missing, skipping");
      return Ok(Vec::new());
    }

    let mut matches = Vec::new();
    let entries = fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
      let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
      if !entry.file_type()?.is_file() {
        continue;
      }
      let Ok(file_name) = entry.file_name().into_string() else {
        continue;
      };
      if let Some(version) = self.pattern.match_name(&file_name) {
        matches.push((target, entry.path(), file_name, version));
      }
    }

    // read_dir order is platform-defined
    matches.sort_by(|a, b| a.2.cmp(&b.2));
    tracing::debug!(dir = %dir.display(), count = matches.len(), "scanned build output");
    Ok(matches)
  }
}

/// Move every artifact into `dist`, returning the new locations
///
/// Files are moved, never copied: a retried run over the same build output
/// finds nothing left to catalog. All destinations are checked before the
/// first move so a conflict leaves every file where it was.
pub fn relocate(artifacts: &[Artifact], dist: &Path) -> FeedResult<Vec<PathBuf>> {
  fs::create_dir_all(dist).with_context(|| format!("Failed to create {}", dist.display()))?;

  let mut names = HashSet::new();
  for artifact in artifacts {
    let dest = dist.join(&artifact.file_name);
    if dest.exists() || !names.insert(artifact.file_name.as_str()) {
      return Err(ManifestError::ArtifactExists { path: dest }.into());
    }
  }

  let mut moved = Vec::with_capacity(artifacts.len());
  for artifact in artifacts {
    let dest = dist.join(&artifact.file_name);
    move_file(&artifact.source, &dest)
      .with_context(|| format!("Failed to move {} to {}", artifact.source.display(), dest.display()))?;
    tracing::debug!(from = %artifact.source.display(), to = %dest.display(), "relocated artifact");
    moved.push(dest);
  }

  Ok(moved)
}

/// Rename, or copy then delete when source and destination are on different filesystems
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
  match fs::rename(from, to) {
    Ok(()) => Ok(()),
    Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
      fs::copy(from, to)?;
      fs::remove_file(from)
    }
    Err(e) => Err(e),
  }
}
