use crate::catalog::{ChecksumAlgorithm, TargetAbi};
use crate::core::error::{ConfigError, FeedError, FeedResult, ResultExt};
use crate::version::RuntimeTarget;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Configuration for feedsmith
/// Searched in order: feedsmith.toml, .feedsmith.toml, .config/feedsmith.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
  pub product: ProductConfig,
  pub publish: PublishConfig,
  #[serde(default)]
  pub paths: PathsConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default = "default_targets")]
  pub targets: Vec<TargetConfig>,

  /// Directory every relative path resolves against (set on load)
  #[serde(skip)]
  pub root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
  /// Artifact prefix, e.g. `Jellyfin.Plugin.Douban`
  pub name: String,

  /// Source repository URL, used by the default changelog fallback
  #[serde(default)]
  pub repository: Option<String>,
}

/// Where artifacts are published and how records are rendered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishConfig {
  /// Base URL the distribution directory is served from
  pub source_base_url: String,

  /// Changelog text for versions without a changelog entry.
  /// `{version}` expands to `major.minor.patch`.
  #[serde(default)]
  pub changelog_fallback: Option<String>,

  /// Host runtime generation prefix of `targetAbi` (default: 10)
  #[serde(default = "default_abi_host")]
  pub abi_host: u64,

  /// Offset added to the version major to form the `targetAbi` minor (default: 7)
  #[serde(default = "default_abi_offset")]
  pub abi_offset: u64,

  #[serde(default)]
  pub checksum: ChecksumAlgorithm,
}

fn default_abi_host() -> u64 {
  10
}

fn default_abi_offset() -> u64 {
  7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
  #[serde(default = "default_manifest_path")]
  pub manifest: PathBuf,
  #[serde(default = "default_dist_path")]
  pub dist: PathBuf,
  /// Optional: a missing file yields an empty changelog index
  #[serde(default = "default_changelog_path")]
  pub changelog: PathBuf,
}

fn default_manifest_path() -> PathBuf {
  PathBuf::from("manifest.json")
}

fn default_dist_path() -> PathBuf {
  PathBuf::from("dist")
}

fn default_changelog_path() -> PathBuf {
  PathBuf::from("CHANGELOG.md")
}

impl Default for PathsConfig {
  fn default() -> Self {
    Self {
      manifest: default_manifest_path(),
      dist: default_dist_path(),
      changelog: default_changelog_path(),
    }
  }
}

/// External build invocation for `feedsmith build`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Project metadata file whose version elements are rewritten during the build
  #[serde(default)]
  pub metadata_file: Option<PathBuf>,

  /// Element names rewritten in the metadata file
  #[serde(default = "default_version_elements")]
  pub version_elements: Vec<String>,

  /// Program and arguments. Placeholders: `{version}`, `{target}`, `{metadata}`, `{output}`
  #[serde(default)]
  pub command: Vec<String>,
}

fn default_version_elements() -> Vec<String> {
  vec![
    "Version".to_string(),
    "AssemblyVersion".to_string(),
    "FileVersion".to_string(),
  ]
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      metadata_file: None,
      version_elements: default_version_elements(),
      command: Vec::new(),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
  pub target: RuntimeTarget,
  /// Build output directory (default: `build/<target>`)
  #[serde(default)]
  pub output_dir: Option<PathBuf>,
}

impl TargetConfig {
  pub fn new(target: RuntimeTarget) -> Self {
    Self {
      target,
      output_dir: None,
    }
  }

  /// Output directory relative to the root
  pub fn output_dir(&self) -> PathBuf {
    self
      .output_dir
      .clone()
      .unwrap_or_else(|| Path::new("build").join(self.target.id()))
  }
}

fn default_targets() -> Vec<TargetConfig> {
  RuntimeTarget::ALL.iter().copied().map(TargetConfig::new).collect()
}

impl FeedConfig {
  /// Find config file in search order: feedsmith.toml, .feedsmith.toml, .config/feedsmith.toml
  pub fn find_config_path(path: &Path) -> Option<PathBuf> {
    let candidates = vec![
      path.join("feedsmith.toml"),
      path.join(".feedsmith.toml"),
      path.join(".config").join("feedsmith.toml"),
    ];

    candidates.into_iter().find(|p| p.exists())
  }

  /// Load config from feedsmith.toml (searches multiple locations)
  pub fn load(root: &Path) -> FeedResult<Self> {
    let config_path = Self::find_config_path(root).ok_or_else(|| {
      FeedError::Config(ConfigError::NotFound {
        root: root.to_path_buf(),
      })
    })?;

    let content = fs::read_to_string(&config_path)
      .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
    let mut config = Self::from_toml(&content)
      .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;
    config.root = root.to_path_buf();

    config
      .validate()
      .with_context(|| format!("Invalid configuration in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), product = %config.product.name, "loaded config");
    Ok(config)
  }

  /// Parse config from TOML text without validation
  pub fn from_toml(content: &str) -> FeedResult<Self> {
    Ok(toml_edit::de::from_str(content)?)
  }

  /// Check the values the pipeline relies on
  pub fn validate(&self) -> FeedResult<()> {
    let name = self.product.name.trim();
    if name.is_empty() || name.contains(['/', '\\']) {
      return Err(invalid("product.name", "must be a non-empty file name prefix"));
    }

    if !is_http_url(&self.publish.source_base_url) {
      return Err(invalid("publish.source_base_url", "must be an http(s) URL"));
    }

    if let Some(ref repository) = self.product.repository
      && !is_http_url(repository)
    {
      return Err(invalid("product.repository", "must be an http(s) URL"));
    }

    if let Some(ref template) = self.publish.changelog_fallback
      && !template.contains("{version}")
    {
      return Err(invalid("publish.changelog_fallback", "must contain the `{version}` placeholder"));
    }

    if self.targets.is_empty() {
      return Err(invalid("targets", "at least one runtime target is required"));
    }

    let mut seen = HashSet::new();
    for target in &self.targets {
      if !seen.insert(target.target) {
        return Err(invalid(
          "targets",
          &format!("target '{}' is listed more than once", target.target),
        ));
      }
    }

    Ok(())
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.root.join(&self.paths.manifest)
  }

  pub fn dist_dir(&self) -> PathBuf {
    self.root.join(&self.paths.dist)
  }

  pub fn changelog_path(&self) -> PathBuf {
    self.root.join(&self.paths.changelog)
  }

  /// Build output directories in configured target order
  pub fn output_dirs(&self) -> Vec<(RuntimeTarget, PathBuf)> {
    self
      .targets
      .iter()
      .map(|t| (t.target, self.root.join(t.output_dir())))
      .collect()
  }

  pub fn target_abi(&self) -> TargetAbi {
    TargetAbi {
      host: self.publish.abi_host,
      offset: self.publish.abi_offset,
    }
  }

  /// Download URL for a distribution file
  pub fn source_url(&self, file_name: &str) -> String {
    format!("{}/{}", self.publish.source_base_url.trim_end_matches('/'), file_name)
  }

  /// Changelog text used when no changelog entry covers `prefix`
  pub fn fallback_changelog(&self, prefix: &str) -> String {
    if let Some(ref template) = self.publish.changelog_fallback {
      return template.replace("{version}", prefix);
    }
    match self.product.repository {
      Some(ref repository) => format!("See: {}/tree/v{}", repository.trim_end_matches('/'), prefix),
      None => format!("See: {}", self.publish.source_base_url),
    }
  }
}

fn invalid(field: &str, reason: &str) -> FeedError {
  FeedError::Config(ConfigError::InvalidField {
    field: field.to_string(),
    reason: reason.to_string(),
  })
}

fn is_http_url(value: &str) -> bool {
  value.starts_with("https://") || value.starts_with("http://")
}
