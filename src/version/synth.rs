//! Version synthesis from a runtime target and a build counter

use crate::core::error::{ConfigError, FeedError, FeedResult};
use crate::version::number::{FourPartVersion, parse_component};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Host runtime generation a build targets
///
/// Each generation pins the major version, so the manifest tells builds apart
/// without looking inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum RuntimeTarget {
  #[serde(rename = "net6.0")]
  #[value(name = "net6.0")]
  Net6,
  #[serde(rename = "net8.0")]
  #[value(name = "net8.0")]
  Net8,
}

impl RuntimeTarget {
  /// Newest generation first
  pub const ALL: [RuntimeTarget; 2] = [RuntimeTarget::Net8, RuntimeTarget::Net6];

  /// Framework identifier, also the default build output directory name
  pub fn id(&self) -> &'static str {
    match self {
      RuntimeTarget::Net6 => "net6.0",
      RuntimeTarget::Net8 => "net8.0",
    }
  }

  /// Major version pinned for this generation
  pub fn major(&self) -> u64 {
    match self {
      RuntimeTarget::Net6 => 1,
      RuntimeTarget::Net8 => 3,
    }
  }
}

impl fmt::Display for RuntimeTarget {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.id())
  }
}

impl FromStr for RuntimeTarget {
  type Err = FeedError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    RuntimeTarget::ALL
      .into_iter()
      .find(|t| t.id() == s)
      .ok_or_else(|| FeedError::Config(ConfigError::UnknownTarget { name: s.to_string() }))
  }
}

/// How the build counter folds into the version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildMode {
  /// Development/CI build: the run counter becomes the revision
  Ci { run: u64 },
  /// Formal release: the tag's revision, or `.0`
  Release,
}

impl BuildMode {
  pub fn from_flags(publish: bool, run: u64) -> Self {
    if publish { BuildMode::Release } else { BuildMode::Ci { run } }
  }
}

/// Base version read from the latest tag: `major.minor.patch[.revision]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BaseVersion {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
  pub revision: Option<u64>,
}

impl BaseVersion {
  /// Used when the repository has no tags yet
  pub const FALLBACK: &'static str = "0.0.0";

  /// Parse a tag such as `v1.2.3` or `1.2.3.4`
  ///
  /// The tag splits into exactly three parts; the third may carry one dotted
  /// revision (`3.4`). Anything else is a configuration error.
  pub fn parse(tag: &str) -> FeedResult<Self> {
    let trimmed = tag.trim();
    let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
    let malformed = || {
      FeedError::Config(ConfigError::MalformedVersion {
        version: tag.to_string(),
      })
    };

    let parts: Vec<&str> = trimmed.splitn(3, '.').collect();
    let [major, minor, patch] = parts.as_slice() else {
      return Err(malformed());
    };

    let (patch, revision) = match patch.split_once('.') {
      Some((patch, revision)) => (patch, Some(parse_component(revision).ok_or_else(malformed)?)),
      None => (*patch, None),
    };

    Ok(Self {
      major: parse_component(major).ok_or_else(malformed)?,
      minor: parse_component(minor).ok_or_else(malformed)?,
      patch: parse_component(patch).ok_or_else(malformed)?,
      revision,
    })
  }

  /// Parse the tag lookup result, falling back to `0.0.0` when there is none
  pub fn from_tag(tag: Option<&str>) -> FeedResult<Self> {
    match tag.map(str::trim).filter(|t| !t.is_empty()) {
      Some(tag) => Self::parse(tag),
      None => Self::parse(Self::FALLBACK),
    }
  }
}

/// Derive the canonical version for a build
///
/// The major comes from the target, never from the tag.
pub fn synthesize(base: &BaseVersion, target: RuntimeTarget, mode: BuildMode) -> FourPartVersion {
  let revision = match mode {
    BuildMode::Ci { run } => run,
    BuildMode::Release => base.revision.unwrap_or(0),
  };
  FourPartVersion::new(target.major(), base.minor, base.patch, revision)
}

/// Parse an operator-supplied release version (`x.y.z`) into its published form `x.y.z.0`
pub fn release_version(input: &str) -> FeedResult<FourPartVersion> {
  let malformed = || {
    FeedError::Config(ConfigError::MalformedVersion {
      version: input.to_string(),
    })
  };

  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(FeedError::with_help("Version is empty", "Pass the release version, e.g. `1.4.0`."));
  }

  let parsed = semver::Version::parse(trimmed).map_err(|_| malformed())?;
  if !parsed.pre.is_empty() || !parsed.build.is_empty() {
    return Err(malformed());
  }

  Ok(FourPartVersion::new(parsed.major, parsed.minor, parsed.patch, 0))
}
