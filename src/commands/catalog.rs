//! `feedsmith catalog`: fold fresh build output into the manifest

use crate::catalog::relocate;
use crate::commands::{appended_records, changelog_updates, print_json};
use crate::core::context::ReleaseContext;
use crate::core::error::FeedResult;
use crate::core::plan::{Operation, OperationType, Plan};
use crate::manifest::{RecordBuilder, timestamp};
use std::io::{self, IsTerminal};

/// Discover → merge in memory → relocate → save
///
/// The merge runs before any file moves, so a duplicate version aborts the
/// run with the build output and the manifest untouched.
pub fn run_catalog(ctx: &ReleaseContext, dry_run: bool, json: bool) -> FeedResult<()> {
  let config = &ctx.config;

  let show_progress = !json && io::stderr().is_terminal();
  let artifacts = ctx
    .cataloger()?
    .with_progress(show_progress)
    .discover(&config.output_dirs())?;
  if artifacts.is_empty() {
    if json {
      println!("[]");
    } else {
      println!("⚠️  No build artifacts found");
      for (target, dir) in config.output_dirs() {
        println!("   {}: {}", target, ctx.display_path(&dir));
      }
    }
    return Ok(());
  }

  let manifest = ctx.load_manifest()?;
  let index = ctx.load_changelog()?;

  // One instant per run; each record is offset by its major
  let run_at = timestamp::now();
  let builder = RecordBuilder::new(config);
  let records = artifacts
    .iter()
    .map(|a| {
      builder.build(
        &a.version,
        &a.file_name,
        a.checksum.clone(),
        timestamp::stamp(run_at, a.version.major),
      )
    })
    .collect();

  let mut merged = manifest.clone();
  let summary = merged.merge(records, &index)?;

  let dist = config.dist_dir();
  let manifest_path = config.manifest_path();
  let mut plan = Plan::new(OperationType::Catalog, &config.product.name)
    .with_summary(format!("   {} artifact(s) → {}", artifacts.len(), ctx.display_path(&dist)));
  plan.add_operations(artifacts.iter().map(|a| Operation::MoveArtifact {
    from: ctx.display_path(&a.source),
    to: ctx.display_path(&dist.join(&a.file_name)),
  }));
  let added = appended_records(&merged, &summary);
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
  tracing::debug!(plan = %plan_json, "planned catalog");

  if dry_run {
    if json {
      print_json(&added)?;
    } else {
      println!("{}", plan.to_human_readable());
      println!("🔍 Dry-run mode (no changes applied)");
    }
    return Ok(());
  }

  relocate(&artifacts, &dist)?;
  merged.save(&manifest_path)?;
  tracing::info!(plan = %plan.metadata.id, appended = summary.appended.len(), "catalog applied");

  if json {
    print_json(&added)?;
  } else {
    for record in &added {
      println!("✅ Cataloged {} ({})", record.version, record.checksum);
    }
    println!(
      "📦 {} now lists {} version(s)",
      ctx.display_path(&manifest_path),
      summary.total
    );
  }

  Ok(())
}
