//! System git backend
//!
//! Read-only queries against the repository the release is cut from.

use std::path::{Path, PathBuf};
use std::process::Command;

/// Git backend using the system `git` binary
pub struct SystemGit {
  /// Repository working directory
  pub(crate) repo_path: PathBuf,
}

impl SystemGit {
  pub fn new(path: &Path) -> Self {
    Self {
      repo_path: path.to_path_buf(),
    }
  }

  /// Most recent tag reachable from HEAD, without a leading `v`
  ///
  /// Returns `None` when git is unavailable, the directory is not a
  /// repository, or no tag exists yet.
  pub fn latest_tag(&self) -> Option<String> {
    let output = match self.git_cmd().args(["describe", "--tags", "--abbrev=0"]).output() {
      Ok(output) => output,
      Err(e) => {
        tracing::debug!(error = %e, "failed to execute git describe");
        return None;
      }
    };

    if !output.status.success() {
      tracing::debug!(
        stderr = %String::from_utf8_lossy(&output.stderr).trim(),
        "git describe found no tag"
      );
      return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let tag = stdout.trim();
    let tag = tag.strip_prefix('v').unwrap_or(tag);
    if tag.is_empty() { None } else { Some(tag.to_string()) }
  }

  pub(crate) fn git_cmd(&self) -> Command {
    let mut cmd = Command::new("git");

    // Set working directory
    cmd.arg("-C").arg(&self.repo_path);

    // Isolated environment (don't trust global config)
    cmd.env_clear();
    if let Ok(path) = std::env::var("PATH") {
      cmd.env("PATH", path);
    }
    if let Ok(home) = std::env::var("HOME") {
      cmd.env("HOME", home);
    }
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd
  }
}
