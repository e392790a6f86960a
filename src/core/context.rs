//! Release context - load once, pass everywhere
//!
//! ```text
//! main.rs:
//!   ReleaseContext::build(root) -> &ReleaseContext
//!   |
//!   v
//! commands/catalog.rs, publish.rs, etc:
//!   fn run_*(ctx: &ReleaseContext, ...)
//! ```

use crate::catalog::{ArtifactPattern, Cataloger};
use crate::core::config::FeedConfig;
use crate::core::error::FeedResult;
use crate::manifest::{ChangeLogIndex, Manifest};
use std::path::{Path, PathBuf};

/// Root directory plus the loaded feedsmith.toml
pub struct ReleaseContext {
  /// Directory every relative path resolves against
  pub root: PathBuf,
  pub config: FeedConfig,
}

impl ReleaseContext {
  /// Load and validate the configuration under `root`
  pub fn build(root: &Path) -> FeedResult<Self> {
    let config = FeedConfig::load(root)?;
    Ok(Self {
      root: root.to_path_buf(),
      config,
    })
  }

  pub fn load_manifest(&self) -> FeedResult<Manifest> {
    Manifest::load(&self.config.manifest_path())
  }

  /// Changelog index for this run; rebuilt every time, never cached
  pub fn load_changelog(&self) -> FeedResult<ChangeLogIndex> {
    ChangeLogIndex::load(&self.config.changelog_path())
  }

  pub fn artifact_pattern(&self) -> FeedResult<ArtifactPattern> {
    ArtifactPattern::new(&self.config.product.name)
  }

  pub fn cataloger(&self) -> FeedResult<Cataloger> {
    Ok(Cataloger::new(self.artifact_pattern()?, self.config.publish.checksum))
  }

  /// `path` relative to the root, for status output
  pub fn display_path(&self, path: &Path) -> String {
    path.strip_prefix(&self.root).unwrap_or(path).display().to_string()
  }
}
