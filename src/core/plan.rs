//! Plans for reviewable manifest updates
//!
//! Every mutating command builds a `Plan` before touching the filesystem:
//!
//! - **Dry-run mode**: show what will happen without doing it
//! - **Auditability**: plans are JSON-serializable for CI logs
//! - **Idempotency**: same inputs give the same plan id
//!
//! ```text
//! Command (catalog, publish, refresh)
//!   ↓
//! Plan (what to do)
//!   ↓
//! relocate + Manifest::save (apply)
//! ```

use crate::core::error::FeedResult;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Plan identifier (SHA256 hash of the operations)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanId(String);

impl PlanId {
  pub fn from_contents(contents: &[u8]) -> Self {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    Self(format!("{:x}", hasher.finalize()))
  }

  /// First 12 characters
  pub fn short(&self) -> &str {
    &self.0[..12.min(self.0.len())]
  }
}

impl fmt::Display for PlanId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.short())
  }
}

/// A single filesystem or manifest change
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Operation {
  /// Move a build artifact into the distribution directory
  MoveArtifact { from: String, to: String },

  /// Append a version record
  AppendRecord {
    version: String,
    checksum: String,
    target_abi: String,
  },

  /// Replace a record's changelog text from the changelog index
  UpdateChangelog { version: String },

  /// Rewrite the manifest file
  RewriteManifest { path: String, versions: usize },
}

/// Which command produced the plan
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
  Catalog,
  Publish,
  Refresh,
}

impl fmt::Display for OperationType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OperationType::Catalog => write!(f, "catalog"),
      OperationType::Publish => write!(f, "publish"),
      OperationType::Refresh => write!(f, "refresh"),
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanMetadata {
  pub id: PlanId,
  pub operation_type: OperationType,
  /// Product name the manifest belongs to
  pub product: String,
}

/// An ordered list of operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
  pub metadata: PlanMetadata,
  pub operations: Vec<Operation>,
  pub summary: String,
}

impl Plan {
  pub fn new(operation_type: OperationType, product: impl Into<String>) -> Self {
    Self {
      metadata: PlanMetadata {
        id: PlanId::from_contents(&[]),
        operation_type,
        product: product.into(),
      },
      operations: Vec::new(),
      summary: String::new(),
    }
  }

  pub fn add_operation(&mut self, operation: Operation) {
    self.operations.push(operation);
    self.recompute_id();
  }

  pub fn add_operations(&mut self, operations: impl IntoIterator<Item = Operation>) {
    self.operations.extend(operations);
    self.recompute_id();
  }

  pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
    self.summary = summary.into();
    self
  }

  fn recompute_id(&mut self) {
    let json = serde_json::to_vec(&self.operations).unwrap_or_default();
    self.metadata.id = PlanId::from_contents(&json);
  }

  pub fn to_json(&self) -> FeedResult<String> {
    Ok(serde_json::to_string_pretty(self)?)
  }

  pub fn to_human_readable(&self) -> String {
    let mut output = String::new();

    output.push_str(&format!(
      "📋 Plan: {} ({})\n",
      self.metadata.operation_type, self.metadata.id
    ));
    output.push_str(&format!("   Product: {}\n", self.metadata.product));

    if !self.summary.is_empty() {
      output.push_str(&format!("\n{}\n", self.summary));
    }

    output.push_str(&format!("\n   Operations ({}):\n", self.operations.len()));
    for (i, op) in self.operations.iter().enumerate() {
      output.push_str(&format!("   {}. {}\n", i + 1, operation_to_string(op)));
    }

    output
  }
}

fn operation_to_string(op: &Operation) -> String {
  match op {
    Operation::MoveArtifact { from, to } => format!("Move {} → {}", from, to),
    Operation::AppendRecord {
      version,
      checksum,
      target_abi,
    } => format!("Append {} (checksum {}, targetAbi {})", version, checksum, target_abi),
    Operation::UpdateChangelog { version } => format!("Update changelog of {}", version),
    Operation::RewriteManifest { path, versions } => format!("Rewrite {} ({} versions)", path, versions),
  }
}
