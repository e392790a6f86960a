//! Artifact checksums
//!
//! Update clients compare the manifest `checksum` against the downloaded
//! archive. The feed has always carried MD5 (32 uppercase hex digits);
//! SHA-256 is available for feeds whose clients accept it.

use crate::core::error::{FeedResult, ResultExt};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumAlgorithm {
  #[default]
  Md5,
  Sha256,
}

impl ChecksumAlgorithm {
  /// Uppercase hex digest of `bytes`
  pub fn digest(&self, bytes: &[u8]) -> String {
    match self {
      ChecksumAlgorithm::Md5 => format!("{:X}", md5::compute(bytes)),
      ChecksumAlgorithm::Sha256 => {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:X}", hasher.finalize())
      }
    }
  }

  /// Hash the full content of a file
  pub fn digest_file(&self, path: &Path) -> FeedResult<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read artifact {}", path.display()))?;
    Ok(self.digest(&bytes))
  }
}
