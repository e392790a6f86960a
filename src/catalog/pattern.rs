use crate::core::error::FeedResult;
use crate::version::FourPartVersion;
use regex::Regex;

/// Matches `<product>.<major>.<minor>.<patch>.<revision>.zip`
#[derive(Debug, Clone)]
pub struct ArtifactPattern {
  product: String,
  regex: Regex,
}

impl ArtifactPattern {
  pub fn new(product: &str) -> FeedResult<Self> {
    let regex = Regex::new(&format!(
      r"^{}\.(\d+)\.(\d+)\.(\d+)\.(\d+)\.zip$",
      regex::escape(product)
    ))?;
    Ok(Self {
      product: product.to_string(),
      regex,
    })
  }

  /// Version encoded in `file_name`, if it is one of our artifacts
  pub fn match_name(&self, file_name: &str) -> Option<FourPartVersion> {
    let caps = self.regex.captures(file_name)?;
    let part = |i: usize| caps.get(i).and_then(|m| m.as_str().parse::<u64>().ok());
    Some(FourPartVersion::new(part(1)?, part(2)?, part(3)?, part(4)?))
  }

  /// Distribution file name for a version
  pub fn file_name(&self, version: &FourPartVersion) -> String {
    format!("{}.{}.zip", self.product, version)
  }
}
