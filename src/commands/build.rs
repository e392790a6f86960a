//! `feedsmith build`: run the external build with the synthesized version injected

use crate::commands::version::resolve_version;
use crate::core::context::ReleaseContext;
use crate::core::error::{ConfigError, FeedError, FeedResult, ResultExt};
use crate::version::RuntimeTarget;
use crate::version::metadata::MetadataGuard;
use std::io;
use std::path::Path;
use std::process::Command;
use std::sync::atomic::Ordering;

/// Placeholder values for one build invocation
struct Substitutions<'a> {
  version: &'a str,
  target: &'a str,
  metadata: &'a str,
  output: &'a str,
}

impl Substitutions<'_> {
  fn apply(&self, arg: &str) -> String {
    arg
      .replace("{version}", self.version)
      .replace("{target}", self.target)
      .replace("{metadata}", self.metadata)
      .replace("{output}", self.output)
  }
}

pub fn run_build(ctx: &ReleaseContext, target: RuntimeTarget, publish: bool, run: u64) -> FeedResult<()> {
  let config = &ctx.config;
  let Some((program, args)) = config.build.command.split_first() else {
    return Err(FeedError::with_help(
      "No build command configured",
      "Set `command` under [build] in feedsmith.toml, e.g. [\"dotnet\", \"publish\", \"-f\", \"{target}\"].",
    ));
  };

  let target_config = config
    .targets
    .iter()
    .find(|t| t.target == target)
    .ok_or_else(|| ConfigError::UnknownTarget {
      name: target.to_string(),
    })?;
  let output_dir = ctx.root.join(target_config.output_dir());

  let version = resolve_version(&ctx.root, target, publish, run, None)?.to_string();
  println!("🔨 Building {} {} for {}", config.product.name, version, target);

  // Held until the build command exits
  let guard = match config.build.metadata_file {
    Some(ref file) => {
      let path = ctx.root.join(file);
      let (guard, count) = MetadataGuard::apply(&path, &config.build.version_elements, &version)?;
      println!("   Injected version into {} ({} elements)", ctx.display_path(&path), count);
      Some(guard)
    }
    None => None,
  };
  let interrupted = guard.as_ref().map(MetadataGuard::restore_on_signal).transpose()?;

  let metadata = config
    .build
    .metadata_file
    .as_deref()
    .map(|p| path_str(&ctx.root.join(p)))
    .unwrap_or_default();
  let output = path_str(&output_dir);
  let subs = Substitutions {
    version: &version,
    target: target.id(),
    metadata: &metadata,
    output: &output,
  };
  let args: Vec<String> = args.iter().map(|a| subs.apply(a)).collect();
  tracing::debug!(program = %program, args = ?args, "running build command");

  let status = Command::new(subs.apply(program))
    .args(&args)
    .current_dir(&ctx.root)
    .status()
    .with_context(|| format!("Failed to run build command '{}'", program));

  if let Some(guard) = guard {
    guard.restore()?;
  }

  if interrupted.is_some_and(|flag| flag.load(Ordering::SeqCst)) {
    return Err(FeedError::Io(io::Error::new(
      io::ErrorKind::Interrupted,
      format!("Build command '{}' interrupted by a termination signal", program),
    )));
  }

  let status = status?;
  if !status.success() {
    return Err(FeedError::Io(io::Error::other(format!(
      "Build command '{}' failed with {}",
      program, status
    ))));
  }

  println!("✅ Built {} for {}", version, target);
  Ok(())
}

fn path_str(path: &Path) -> String {
  path.display().to_string()
}
