//! `feedsmith refresh`: reapply changelog text and ordering to the whole manifest

use crate::commands::changelog_updates;
use crate::core::context::ReleaseContext;
use crate::core::error::FeedResult;
use crate::core::plan::{Operation, OperationType, Plan};

pub fn run_refresh(ctx: &ReleaseContext, dry_run: bool) -> FeedResult<()> {
  let manifest_path = ctx.config.manifest_path();
  let manifest = ctx.load_manifest()?;
  let index = ctx.load_changelog()?;

  let mut refreshed = manifest.clone();
  let summary = refreshed.refresh(&index);

  if refreshed == manifest {
    println!("✅ Manifest already up to date ({} versions)", summary.total);
    return Ok(());
  }

  let mut plan = Plan::new(OperationType::Refresh, &ctx.config.product.name);
  plan.add_operations(changelog_updates(&manifest, &refreshed));
  plan.add_operation(Operation::RewriteManifest {
    path: ctx.display_path(&manifest_path),
    versions: summary.total,
  });

  if dry_run {
    println!("{}", plan.to_human_readable());
    println!("🔍 Dry-run mode (no changes applied)");
    return Ok(());
  }

  refreshed.save(&manifest_path)?;
  println!(
    "✅ Refreshed {} ({} changelog update(s))",
    ctx.display_path(&manifest_path),
    summary.enriched
  );
  Ok(())
}
