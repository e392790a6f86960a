//! Tests for the `publish` command

use crate::helpers::*;
use anyhow::Result;

#[test]
fn test_publish_records_release() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("CHANGELOG.md", "- v2.0.0（2024-06-01）：\n  - Settings page\n")?;
  workspace.add_release("2.0.0.0", b"release")?;

  let output = run_feedsmith(&workspace.path, &["publish", "2.0.0"])?;
  assert!(stdout(&output).contains("Published 2.0.0.0"));

  assert_eq!(workspace.version_ids()?, ["2.0.0.0", "1.0.0.3"]);
  let record = &workspace.versions()?[0];
  assert_eq!(record["checksum"], format!("{:X}", md5::compute(b"release")));
  assert_eq!(record["targetAbi"], "10.9.0.0");
  assert_eq!(record["changelog"], "- Settings page");
  assert_eq!(
    record["sourceUrl"],
    format!("https://example.org/dist/{}.2.0.0.0.zip", PRODUCT)
  );

  Ok(())
}

#[test]
fn test_publish_twice_is_validation_failure() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_release("2.0.0.0", b"release")?;

  run_feedsmith(&workspace.path, &["publish", "2.0.0"])?;
  let before = workspace.read_file("manifest.json")?;

  let output = feedsmith(&workspace.path, &["publish", "2.0.0"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("2.0.0.0 already exists"));
  assert_eq!(workspace.read_file("manifest.json")?, before);

  Ok(())
}

#[test]
fn test_malformed_versions_are_rejected() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  for version in ["1.2", "1.2.3-beta.1", "1.2.3+build5", "v1.2.3", "1.2.3.4"] {
    let output = feedsmith(&workspace.path, &["publish", version])?;
    assert_eq!(output.status.code(), Some(1), "{version}");
  }
  assert_eq!(workspace.read_file("manifest.json")?, MANIFEST);

  Ok(())
}

#[test]
fn test_missing_release_artifact() -> Result<()> {
  let workspace = TestWorkspace::new()?;

  let output = feedsmith(&workspace.path, &["publish", "2.1.0"])?;
  assert_eq!(output.status.code(), Some(1));
  let err = stderr(&output);
  assert!(err.contains("Release artifact not found"));
  assert!(err.contains("💡 Help"));

  Ok(())
}

#[test]
fn test_publish_dry_run_and_json() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_release("2.2.0.0", b"release")?;

  let output = run_feedsmith(&workspace.path, &["publish", "2.2.0", "--dry-run", "--json"])?;
  let records: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output))?;
  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["version"], "2.2.0.0");
  assert_eq!(workspace.read_file("manifest.json")?, MANIFEST);

  Ok(())
}
