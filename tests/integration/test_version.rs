//! Tests for the `version` and `build` commands

use crate::helpers::*;
use anyhow::Result;

const CSPROJ: &str = r#"<Project Sdk="Microsoft.NET.Sdk">
  <PropertyGroup>
    <Version>1.0.0</Version>
    <AssemblyVersion>1.0.0.0</AssemblyVersion>
    <FileVersion>1.0.0.0</FileVersion>
  </PropertyGroup>
</Project>
"#;

#[test]
fn test_version_without_config() -> Result<()> {
  let temp = tempfile::TempDir::new()?;

  let output = run_feedsmith(temp.path(), &["version", "--target", "net8.0", "--run", "42", "--base", "v1.2.3"])?;
  assert_eq!(stdout(&output).trim(), "3.2.3.42");

  let output = run_feedsmith(temp.path(), &["version", "--target", "net6.0", "--publish", "--base", "1.2.3.4"])?;
  assert_eq!(stdout(&output).trim(), "1.2.3.4");

  Ok(())
}

#[test]
fn test_version_reads_latest_tag() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  let path = temp.path();
  git(path, &["init", "--initial-branch=main"])?;
  git(path, &["config", "user.name", "Test User"])?;
  git(path, &["config", "user.email", "test@example.com"])?;
  git(path, &["commit", "--allow-empty", "-m", "Initial commit"])?;
  git(path, &["tag", "v2.5.1"])?;

  let output = run_feedsmith(path, &["version", "--target", "net6.0", "--publish"])?;
  assert_eq!(stdout(&output).trim(), "1.5.1.0");

  let output = run_feedsmith(path, &["version", "--target", "net8.0", "--run", "9"])?;
  assert_eq!(stdout(&output).trim(), "3.5.1.9");

  Ok(())
}

#[test]
fn test_untagged_directory_uses_fallback() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  let output = run_feedsmith(temp.path(), &["version", "--target", "net8.0", "--run", "3"])?;
  assert_eq!(stdout(&output).trim(), "3.0.0.3");
  Ok(())
}

#[test]
fn test_malformed_base_is_config_error() -> Result<()> {
  let temp = tempfile::TempDir::new()?;
  let output = feedsmith(temp.path(), &["version", "--target", "net8.0", "--base", "1.2"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("Malformed version '1.2'"));
  Ok(())
}

#[cfg(unix)]
#[test]
fn test_build_injects_and_restores_metadata() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("Plugin.csproj", CSPROJ)?;
  workspace.append_config(
    r#"[build]
metadata_file = "Plugin.csproj"
command = ["sh", "-c", "mkdir -p {output} && cp {metadata} {output}/seen-{version}.csproj"]
"#,
  )?;

  run_feedsmith(&workspace.path, &["build", "--target", "net8.0", "--run", "7"])?;

  let seen = workspace.read_file("build/net8.0/seen-3.0.0.7.csproj")?;
  assert!(seen.contains("<Version>3.0.0.7</Version>"));
  assert!(seen.contains("<AssemblyVersion>3.0.0.7</AssemblyVersion>"));
  assert!(seen.contains("<FileVersion>3.0.0.7</FileVersion>"));
  assert_eq!(workspace.read_file("Plugin.csproj")?, CSPROJ);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_failed_build_still_restores_metadata() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("Plugin.csproj", CSPROJ)?;
  workspace.append_config(
    r#"[build]
metadata_file = "Plugin.csproj"
command = ["sh", "-c", "exit 4"]
"#,
  )?;

  let output = feedsmith(&workspace.path, &["build", "--target", "net6.0", "--run", "1"])?;
  assert_eq!(output.status.code(), Some(2));
  assert_eq!(workspace.read_file("Plugin.csproj")?, CSPROJ);

  Ok(())
}

#[cfg(unix)]
#[test]
fn test_terminated_build_restores_metadata() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  workspace.write_file("Plugin.csproj", CSPROJ)?;
  // The build sends SIGTERM to feedsmith, then keeps running
  workspace.append_config(
    r#"[build]
metadata_file = "Plugin.csproj"
command = ["sh", "-c", "kill -TERM $PPID; sleep 1"]
"#,
  )?;

  let output = feedsmith(&workspace.path, &["build", "--target", "net8.0", "--run", "7"])?;
  assert_eq!(output.status.code(), Some(2));
  assert!(stderr(&output).contains("interrupted by a termination signal"));
  assert_eq!(workspace.read_file("Plugin.csproj")?, CSPROJ);

  Ok(())
}

#[test]
fn test_build_without_command_is_user_error() -> Result<()> {
  let workspace = TestWorkspace::new()?;
  let output = feedsmith(&workspace.path, &["build", "--target", "net8.0"])?;
  assert_eq!(output.status.code(), Some(1));
  assert!(stderr(&output).contains("No build command configured"));
  Ok(())
}
