//! `feedsmith publish <VERSION>`: record an operator-cut release

use crate::commands::{appended_records, changelog_updates, print_json};
use crate::core::context::ReleaseContext;
use crate::core::error::{FeedError, FeedResult};
use crate::core::plan::{Operation, OperationType, Plan};
use crate::manifest::{RecordBuilder, timestamp};
use crate::version::release_version;

pub fn run_publish(ctx: &ReleaseContext, version: &str, dry_run: bool, json: bool) -> FeedResult<()> {
  let config = &ctx.config;
  let version = release_version(version)?;

  let manifest = ctx.load_manifest()?;
  manifest.ensure_absent(&version.to_string())?;

  let file_name = ctx.artifact_pattern()?.file_name(&version);
  let artifact = config.dist_dir().join(&file_name);
  if !artifact.is_file() {
    return Err(FeedError::with_help(
      format!("Release artifact not found: {}", ctx.display_path(&artifact)),
      format!("Package the release as {} in the distribution directory first.", file_name),
    ));
  }
  let checksum = config.publish.checksum.digest_file(&artifact)?;

  let index = ctx.load_changelog()?;
  let record = RecordBuilder::new(config).build(&version, &file_name, checksum, timestamp::now());

  let mut merged = manifest.clone();
  let summary = merged.merge(vec![record], &index)?;
  let added = appended_records(&merged, &summary);

  let manifest_path = config.manifest_path();
  let mut plan = Plan::new(OperationType::Publish, &config.product.name);
  plan.add_operations(added.iter().map(|r| Operation::AppendRecord {
    version: r.version.clone(),
    checksum: r.checksum.clone(),
    target_abi: r.target_abi.clone(),
  }));
  plan.add_operations(changelog_updates(&manifest, &merged));
  plan.add_operation(Operation::RewriteManifest {
    path: ctx.display_path(&manifest_path),
    versions: summary.total,
  });

  let plan_json = plan.to_json()?;
  tracing::debug!(plan = %plan_json, "planned publish");

  if dry_run {
    if json {
      print_json(&added)?;
    } else {
      println!("{}", plan.to_human_readable());
      println!("🔍 Dry-run mode (no changes applied)");
    }
    return Ok(());
  }

  merged.save(&manifest_path)?;

  if json {
    print_json(&added)?;
  } else {
    println!("✅ Published {} ({})", version, ctx.display_path(&artifact));
  }
  Ok(())
}
