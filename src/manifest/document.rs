//! The repository manifest document
//!
//! ```json
//! [
//!   {
//!     "guid": "...",
//!     "name": "...",
//!     "versions": [
//!       {
//!         "checksum": "900150983CD24FB0D6963F7D28E17F72",
//!         "changelog": "- Fix poster lookup",
//!         "targetAbi": "10.10.0.0",
//!         "sourceUrl": "https://example.org/dist/Product.3.1.0.0.zip",
//!         "timestamp": "2024-05-01T08:00:03Z",
//!         "version": "3.1.0.0"
//!       }
//!     ]
//!   }
//! ]
//! ```
//!
//! Only `versions` is interpreted. Every other key of the plugin object, and
//! every unknown key of a version record, is written back in its original
//! position. Records added by feedsmith use the field order shown above.

use crate::core::error::{FeedError, FeedResult, ManifestError, ResultExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// One published version of the plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionRecord {
  pub checksum: String,
  pub changelog: String,
  pub target_abi: String,
  pub source_url: String,
  #[serde(with = "crate::manifest::timestamp")]
  pub timestamp: DateTime<Utc>,
  pub version: String,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl VersionRecord {
  /// `major.minor.patch` of the record's version
  pub fn prefix(&self) -> String {
    self.version.split('.').take(3).collect::<Vec<_>>().join(".")
  }
}

const VERSIONS_KEY: &str = "versions";

/// In-memory manifest: the plugin object plus its version list
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
  plugin: Map<String, Value>,
  pub versions: Vec<VersionRecord>,
  /// Key order of each record as read, by version
  key_order: HashMap<String, Vec<String>>,
}

impl Manifest {
  /// Read and validate the manifest at `path`
  pub fn load(path: &Path) -> FeedResult<Self> {
    let content = match fs::read_to_string(path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        return Err(FeedError::with_help(
          format!("Manifest not found: {}", path.display()),
          "Create it once by hand: a JSON array holding the plugin object with an empty `versions` list.",
        ));
      }
      Err(e) => return Err(e).with_context(|| format!("Failed to read manifest {}", path.display())),
    };

    let document: Value =
      serde_json::from_str(&content).with_context(|| format!("Failed to parse manifest {}", path.display()))?;
    Self::from_value(document).map_err(|reason| {
      ManifestError::Malformed {
        path: path.to_path_buf(),
        reason,
      }
      .into()
    })
  }

  fn from_value(document: Value) -> Result<Self, String> {
    let Value::Array(mut entries) = document else {
      return Err("top level must be an array".to_string());
    };
    if entries.len() != 1 {
      return Err(format!("expected exactly one plugin object, found {}", entries.len()));
    }
    let Value::Object(plugin) = entries.remove(0) else {
      return Err("plugin entry must be an object".to_string());
    };

    let (versions, key_order) = match plugin.get(VERSIONS_KEY) {
      Some(value) => (
        Vec::<VersionRecord>::deserialize(value).map_err(|e| format!("invalid `versions`: {}", e))?,
        record_key_order(value),
      ),
      None => (Vec::new(), HashMap::new()),
    };

    Ok(Self {
      plugin,
      versions,
      key_order,
    })
  }

  /// Render the document: two-space indent, original key order, trailing newline
  pub fn to_json(&self) -> FeedResult<String> {
    let mut plugin = self.plugin.clone();
    let versions = self
      .versions
      .iter()
      .map(|record| -> FeedResult<Value> {
        Ok(match (serde_json::to_value(record)?, self.key_order.get(&record.version)) {
          (Value::Object(fields), Some(order)) => Value::Object(reorder(fields, order)),
          (value, _) => value,
        })
      })
      .collect::<FeedResult<Vec<_>>>()?;
    // insert() on an existing key keeps its position
    plugin.insert(VERSIONS_KEY.to_string(), Value::Array(versions));
    let mut rendered = serde_json::to_string_pretty(&Value::Array(vec![Value::Object(plugin)]))?;
    rendered.push('\n');
    Ok(rendered)
  }

  /// Rewrite the manifest atomically
  ///
  /// The document goes to a temporary file next to `path` and is renamed
  /// over it, so an interrupted run leaves either the old or the new manifest.
  pub fn save(&self, path: &Path) -> FeedResult<()> {
    let rendered = self.to_json()?;
    let dir = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
      .with_context(|| format!("Failed to create temporary manifest in {}", dir.display()))?;
    tmp.write_all(rendered.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp
      .persist(path)
      .with_context(|| format!("Failed to replace manifest {}", path.display()))?;

    tracing::debug!(path = %path.display(), versions = self.versions.len(), "wrote manifest");
    Ok(())
  }

  pub fn contains(&self, version: &str) -> bool {
    self.versions.iter().any(|r| r.version == version)
  }

  /// Duplicate-publish check: published versions are immutable
  pub fn ensure_absent(&self, version: &str) -> FeedResult<()> {
    if self.contains(version) {
      return Err(
        ManifestError::DuplicateVersion {
          version: version.to_string(),
        }
        .into(),
      );
    }
    Ok(())
  }
}

fn record_key_order(versions: &Value) -> HashMap<String, Vec<String>> {
  versions
    .as_array()
    .into_iter()
    .flatten()
    .filter_map(Value::as_object)
    .filter_map(|fields| {
      let version = fields.get("version")?.as_str()?;
      Some((version.to_string(), fields.keys().cloned().collect()))
    })
    .collect()
}

/// Put `fields` back in `order`; keys not in `order` follow in their own order
fn reorder(fields: Map<String, Value>, order: &[String]) -> Map<String, Value> {
  let mut ordered = Map::new();
  for key in order {
    if let Some(value) = fields.get(key) {
      ordered.insert(key.clone(), value.clone());
    }
  }
  for (key, value) in fields {
    if !ordered.contains_key(&key) {
      ordered.insert(key, value);
    }
  }
  ordered
}
