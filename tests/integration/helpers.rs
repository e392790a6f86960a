//! Test helpers for integration tests

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

pub const PRODUCT: &str = "Jellyfin.Plugin.Douban";

/// Plugin object with one published version
pub const MANIFEST: &str = r#"[
  {
    "guid": "e325e3fd-4fd8-4f5b-9a58-3b9c7bab2a11",
    "name": "Douban",
    "overview": "豆瓣元数据",
    "owner": "example",
    "category": "Metadata",
    "versions": [
      {
        "checksum": "0123456789ABCDEF0123456789ABCDEF",
        "changelog": "See: https://github.com/example/douban/tree/v1.0.0",
        "targetAbi": "10.8.0.0",
        "sourceUrl": "https://example.org/dist/Jellyfin.Plugin.Douban.1.0.0.3.zip",
        "timestamp": "2024-01-01T00:00:01Z",
        "version": "1.0.0.3"
      }
    ],
    "imageUrl": "https://example.org/logo.png"
  }
]
"#;

/// A release root with feedsmith.toml and manifest.json
pub struct TestWorkspace {
  _root: TempDir,
  pub path: PathBuf,
}

impl TestWorkspace {
  pub fn new() -> Result<Self> {
    let root = TempDir::new()?;
    let path = root.path().to_path_buf();

    std::fs::write(
      path.join("feedsmith.toml"),
      format!(
        r#"[product]
name = "{}"
repository = "https://github.com/example/douban"

[publish]
source_base_url = "https://example.org/dist"
"#,
        PRODUCT
      ),
    )?;
    std::fs::write(path.join("manifest.json"), MANIFEST)?;

    Ok(Self { _root: root, path })
  }

  /// Append raw TOML to feedsmith.toml
  pub fn append_config(&self, toml: &str) -> Result<()> {
    let mut config = self.read_file("feedsmith.toml")?;
    config.push('\n');
    config.push_str(toml);
    self.write_file("feedsmith.toml", &config)
  }

  /// Drop a build artifact into `build/<target>/`
  pub fn add_artifact(&self, target: &str, version: &str, content: &[u8]) -> Result<PathBuf> {
    let dir = self.path.join("build").join(target);
    std::fs::create_dir_all(&dir)?;
    let file = dir.join(format!("{}.{}.zip", PRODUCT, version));
    std::fs::write(&file, content)?;
    Ok(file)
  }

  /// Drop a packaged release into `dist/`
  pub fn add_release(&self, version: &str, content: &[u8]) -> Result<PathBuf> {
    let dir = self.path.join("dist");
    std::fs::create_dir_all(&dir)?;
    let file = dir.join(format!("{}.{}.zip", PRODUCT, version));
    std::fs::write(&file, content)?;
    Ok(file)
  }

  pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
    let full = self.path.join(path);
    if let Some(parent) = full.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(full, content)?;
    Ok(())
  }

  pub fn file_exists(&self, path: &str) -> bool {
    self.path.join(path).exists()
  }

  pub fn read_file(&self, path: &str) -> Result<String> {
    Ok(std::fs::read_to_string(self.path.join(path))?)
  }

  /// Parsed `versions` of the manifest
  pub fn versions(&self) -> Result<Vec<serde_json::Value>> {
    let doc: serde_json::Value = serde_json::from_str(&self.read_file("manifest.json")?)?;
    let versions = doc[0]["versions"].as_array().context("manifest has no versions array")?;
    Ok(versions.clone())
  }

  /// `version` fields of the manifest in listed order
  pub fn version_ids(&self) -> Result<Vec<String>> {
    Ok(
      self
        .versions()?
        .iter()
        .filter_map(|v| v["version"].as_str().map(String::from))
        .collect(),
    )
  }
}

/// Run git command in a directory
pub fn git(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = Command::new("git")
    .current_dir(cwd)
    .args(args)
    .output()
    .context("Failed to run git command")?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("Git command failed: git {}\n{}", args.join(" "), stderr);
  }

  Ok(output)
}

/// Run feedsmith and return its output whatever the exit status
pub fn feedsmith(cwd: &Path, args: &[&str]) -> Result<Output> {
  let bin = env!("CARGO_BIN_EXE_feedsmith");

  Command::new(bin)
    .current_dir(cwd)
    .args(args)
    .env_remove("RUST_LOG")
    .output()
    .context("Failed to run feedsmith")
}

/// Run feedsmith, failing unless it exits successfully
pub fn run_feedsmith(cwd: &Path, args: &[&str]) -> Result<Output> {
  let output = feedsmith(cwd, args)?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    anyhow::bail!(
      "feedsmith command failed: feedsmith {}\nstdout: {}\nstderr: {}",
      args.join(" "),
      stdout,
      stderr
    );
  }

  Ok(output)
}

pub fn stdout(output: &Output) -> String {
  String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
  String::from_utf8_lossy(&output.stderr).to_string()
}
