use crate::version::FourPartVersion;

/// Host compatibility identifier carried in `targetAbi`
///
/// A pure function of the version major: `<host>.<major + offset>.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetAbi {
  pub host: u64,
  pub offset: u64,
}

impl Default for TargetAbi {
  fn default() -> Self {
    Self { host: 10, offset: 7 }
  }
}

impl TargetAbi {
  pub fn for_major(&self, major: u64) -> String {
    format!("{}.{}.0.0", self.host, major.saturating_add(self.offset))
  }

  pub fn for_version(&self, version: &FourPartVersion) -> String {
    self.for_major(version.major)
  }
}
