//! Four-part plugin version numbers

use crate::core::error::{ConfigError, FeedError};
use std::fmt;
use std::str::FromStr;

/// `major.minor.patch.revision`, ordered numerically component by component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FourPartVersion {
  pub major: u64,
  pub minor: u64,
  pub patch: u64,
  pub revision: u64,
}

impl FourPartVersion {
  pub fn new(major: u64, minor: u64, patch: u64, revision: u64) -> Self {
    Self {
      major,
      minor,
      patch,
      revision,
    }
  }

  /// The `major.minor.patch` key changelog entries are filed under
  pub fn prefix(&self) -> String {
    format!("{}.{}.{}", self.major, self.minor, self.patch)
  }
}

impl fmt::Display for FourPartVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}.{}.{}", self.major, self.minor, self.patch, self.revision)
  }
}

impl FromStr for FourPartVersion {
  type Err = FeedError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let malformed = || {
      FeedError::Config(ConfigError::MalformedVersion {
        version: s.to_string(),
      })
    };

    let parts: Vec<u64> = s
      .split('.')
      .map(parse_component)
      .collect::<Option<Vec<_>>>()
      .ok_or_else(malformed)?;

    match parts.as_slice() {
      [major, minor, patch, revision] => Ok(Self::new(*major, *minor, *patch, *revision)),
      _ => Err(malformed()),
    }
  }
}

/// Parse one purely numeric dotted component (no sign, no whitespace)
pub(crate) fn parse_component(part: &str) -> Option<u64> {
  if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  part.parse().ok()
}
