//! Scoped version injection into project metadata
//!
//! The build tool reads its version from the project file, so the synthesized
//! version is written there for the duration of one build. [`MetadataGuard`]
//! owns the original bytes and puts them back when it goes out of scope,
//! whether the build succeeded, failed, or panicked. A termination signal
//! restores the file from a handler thread via
//! [`MetadataGuard::restore_on_signal`].

use crate::core::error::{FeedError, FeedResult, ResultExt};
use regex::{NoExpand, Regex};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Restores the metadata file to its original content on drop
#[derive(Debug)]
pub struct MetadataGuard {
  path: PathBuf,
  original: Vec<u8>,
  restored: bool,
}

impl MetadataGuard {
  /// Rewrite every version element in `path` to `version`
  ///
  /// Returns the guard and the number of elements rewritten.
  pub fn apply(path: &Path, elements: &[String], version: &str) -> FeedResult<(Self, usize)> {
    let original = fs::read(path).with_context(|| format!("Failed to read project metadata {}", path.display()))?;
    let text = std::str::from_utf8(&original)
      .map_err(|e| FeedError::message(format!("Project metadata {} is not UTF-8: {}", path.display(), e)))?;

    let (rewritten, count) = rewrite_versions(text, elements, version)?;
    if count == 0 {
      tracing::warn!(path = %path.display(), "no version elements found in project metadata");
    }

    // Guard exists before the write so a partial write is still rolled back
    let guard = Self {
      path: path.to_path_buf(),
      original,
      restored: false,
    };
    fs::write(path, rewritten).with_context(|| format!("Failed to write project metadata {}", path.display()))?;
    tracing::debug!(path = %path.display(), version, count, "injected build version");

    Ok((guard, count))
  }

  /// Restore the original content now and report failures
  pub fn restore(mut self) -> FeedResult<()> {
    self.restored = true;
    fs::write(&self.path, &self.original)
      .with_context(|| format!("Failed to restore project metadata {}", self.path.display()))
  }

  /// Install a process-wide termination handler that restores the original
  ///
  /// The process keeps running so the caller can wait for the build to exit.
  /// The returned flag is set once a signal arrived. Only one handler can be
  /// installed per process.
  pub fn restore_on_signal(&self) -> FeedResult<Arc<AtomicBool>> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupted);
    let path = self.path.clone();
    let original = self.original.clone();

    ctrlc::set_handler(move || {
      flag.store(true, Ordering::SeqCst);
      match fs::write(&path, &original) {
        Ok(()) => tracing::warn!(path = %path.display(), "termination signal received, restored project metadata"),
        Err(e) => tracing::error!(path = %path.display(), error = %e, "failed to restore project metadata"),
      }
    })
    .map_err(|e| FeedError::message(format!("Failed to install termination handler: {}", e)))?;

    Ok(interrupted)
  }
}

impl Drop for MetadataGuard {
  fn drop(&mut self) {
    if self.restored {
      return;
    }
    if let Err(e) = fs::write(&self.path, &self.original) {
      tracing::error!(path = %self.path.display(), error = %e, "failed to restore project metadata");
    }
  }
}

/// Replace the body of `<Element>1.2.3</Element>` for each element name
///
/// Only bodies made of digits and dots are touched.
pub fn rewrite_versions(text: &str, elements: &[String], version: &str) -> FeedResult<(String, usize)> {
  let mut output = text.to_string();
  let mut count = 0;

  for element in elements {
    let name = regex::escape(element);
    let pattern = Regex::new(&format!(r"<{name}>[\d.]+</{name}>"))?;
    count += pattern.find_iter(&output).count();
    let replacement = format!("<{element}>{version}</{element}>");
    output = pattern.replace_all(&output, NoExpand(&replacement)).into_owned();
  }

  Ok((output, count))
}
