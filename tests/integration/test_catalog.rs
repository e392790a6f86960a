//! Tests for the `catalog` command

use crate::helpers::*;
use anyhow::Result;

fn md5_hex(content: &[u8]) -> String {
  format!("{:X}", md5::compute(content))
}

#[test]
fn test_catalog_appends_moves_and_sorts() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_artifact("net6.0", "1.0.0.4", b"six")?;
  workspace.add_artifact("net8.0", "3.0.0.4", b"eight")?;

  run_feedsmith(&workspace.path, &["catalog"])?;

  assert_eq!(workspace.version_ids()?, ["3.0.0.4", "1.0.0.4", "1.0.0.3"]);

  let versions = workspace.versions()?;
  assert_eq!(versions[0]["checksum"], md5_hex(b"eight"));
  assert_eq!(versions[0]["targetAbi"], "10.10.0.0");
  assert_eq!(
    versions[0]["sourceUrl"],
    format!("https://example.org/dist/{}.3.0.0.4.zip", PRODUCT)
  );
  assert_eq!(versions[1]["checksum"], md5_hex(b"six"));
  assert_eq!(versions[1]["targetAbi"], "10.8.0.0");
  assert_eq!(
    versions[1]["changelog"],
    "See: https://github.com/example/douban/tree/v1.0.0"
  );

  // Moved, not copied
  assert!(workspace.file_exists(&format!("dist/{}.1.0.0.4.zip", PRODUCT)));
  assert!(workspace.file_exists(&format!("dist/{}.3.0.0.4.zip", PRODUCT)));
  assert!(!workspace.file_exists(&format!("build/net6.0/{}.1.0.0.4.zip", PRODUCT)));
  assert!(!workspace.file_exists(&format!("build/net8.0/{}.3.0.0.4.zip", PRODUCT)));

  Ok(())
}

#[test]
fn test_catalog_preserves_plugin_object() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_artifact("net6.0", "1.0.0.4", b"six")?;

  run_feedsmith(&workspace.path, &["catalog"])?;

  let content = workspace.read_file("manifest.json")?;
  let doc: serde_json::Value = serde_json::from_str(&content)?;
  let keys: Vec<_> = doc[0].as_object().unwrap().keys().cloned().collect();
  assert_eq!(
    keys,
    ["guid", "name", "overview", "owner", "category", "versions", "imageUrl"]
  );

  // Two-space indent, non-ASCII unescaped, trailing newline
  assert!(content.starts_with("[\n  {\n    \"guid\""));
  assert!(content.contains("豆瓣元数据"));
  assert!(content.ends_with("]\n"));

  Ok(())
}

#[test]
fn test_catalog_timestamps_order_runtimes() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_artifact("net6.0", "1.0.0.4", b"six")?;
  workspace.add_artifact("net8.0", "3.0.0.4", b"eight")?;

  run_feedsmith(&workspace.path, &["catalog"])?;

  let versions = workspace.versions()?;
  let newest = versions[0]["timestamp"].as_str().unwrap();
  let older = versions[1]["timestamp"].as_str().unwrap();
  assert!(newest.ends_with('Z') && !newest.contains('.'));

  let newest = chrono::DateTime::parse_from_rfc3339(newest)?;
  let older = chrono::DateTime::parse_from_rfc3339(older)?;
  assert_eq!((newest - older).num_seconds(), 2);

  Ok(())
}

#[test]
fn test_second_run_finds_nothing() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.add_artifact("net8.0", "3.0.0.5", b"eight")?;

  run_feedsmith(&workspace.path, &["catalog"])?;
  let after_first = workspace.read_file("manifest.json")?;

  let output = run_feedsmith(&workspace.path, &["catalog"])?;
  assert!(stdout(&output).contains("No build artifacts found"));
  assert_eq!(workspace.read_file("manifest.json")?, after_first);

  Ok(())
}

#[test]
fn test_duplicate_version_is_rejected_untouched() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let fresh = workspace.add_artifact("net6.0", "1.0.0.9", b"new")?;
  let stale = workspace.add_artifact("net6.0", "1.0.0.3", b"again")?;

  let output = feedsmith(&workspace.path, &["catalog"])?;
  assert_eq!(output.status.code(), Some(3));
  assert!(stderr(&output).contains("1.0.0.3 already exists"));

  assert_eq!(workspace.read_file("manifest.json")?, MANIFEST);
  assert!(fresh.exists());
  assert!(stale.exists());
  assert!(!workspace.file_exists("dist"));

  Ok(())
}

#[test]
fn test_dry_run_changes_nothing() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let artifact = workspace.add_artifact("net8.0", "3.0.0.6", b"eight")?;

  let output = run_feedsmith(&workspace.path, &["catalog", "--dry-run"])?;
  let out = stdout(&output);
  assert!(out.contains("📋 Plan: catalog"));
  assert!(out.contains("Append 3.0.0.6"));
  assert!(out.contains("Dry-run mode"));

  assert!(artifact.exists());
  assert_eq!(workspace.read_file("manifest.json")?, MANIFEST);

  Ok(())
}

#[test]
fn test_json_lists_appended_records() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("CHANGELOG.md", "- v3.0.0（2024-05-01）：\n  - Net 8 support\n")?;
  workspace.add_artifact("net8.0", "3.0.0.7", b"eight")?;

  let output = run_feedsmith(&workspace.path, &["catalog", "--json"])?;
  let records: Vec<serde_json::Value> = serde_json::from_str(&stdout(&output))?;

  assert_eq!(records.len(), 1);
  assert_eq!(records[0]["version"], "3.0.0.7");
  assert_eq!(records[0]["changelog"], "- Net 8 support");
  let keys: Vec<_> = records[0].as_object().unwrap().keys().cloned().collect();
  assert_eq!(
    keys,
    ["checksum", "changelog", "targetAbi", "sourceUrl", "timestamp", "version"]
  );

  Ok(())
}

#[test]
fn test_changelog_enriches_existing_records() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file(
    "CHANGELOG.md",
    "# Changelog\n\n- v1.0.0（2024-01-01）：\n  - Initial release\n  - Poster lookup\n",
  )?;
  workspace.add_artifact("net6.0", "1.0.0.4", b"six")?;

  run_feedsmith(&workspace.path, &["catalog"])?;

  for record in workspace.versions()? {
    assert_eq!(record["changelog"], "- Initial release\n- Poster lookup");
  }

  Ok(())
}

#[test]
fn test_custom_output_dirs_and_sha256() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.append_config(
    r#"[[targets]]
target = "net8.0"
output_dir = "out/eight"
"#,
  )?;
  let config = workspace.read_file("feedsmith.toml")?;
  workspace.write_file(
    "feedsmith.toml",
    &config.replace(
      "source_base_url = \"https://example.org/dist\"",
      "source_base_url = \"https://example.org/dist\"\nchecksum = \"sha256\"",
    ),
  )?;
  workspace.write_file(&format!("out/eight/{}.3.1.0.1.zip", PRODUCT), "eight")?;
  // Not a configured target: ignored
  workspace.add_artifact("net6.0", "1.1.0.1", b"six")?;

  run_feedsmith(&workspace.path, &["catalog"])?;

  let versions = workspace.versions()?;
  assert_eq!(workspace.version_ids()?, ["3.1.0.1", "1.0.0.3"]);
  assert_eq!(versions[0]["checksum"].as_str().unwrap().len(), 64);
  assert!(workspace.file_exists(&format!("build/net6.0/{}.1.1.0.1.zip", PRODUCT)));

  Ok(())
}

#[test]
fn test_missing_config_is_user_error() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  let output = feedsmith(temp.path(), &["catalog"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("feedsmith.toml"));
  Ok(())
}
