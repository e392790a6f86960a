//! `feedsmith changelog`: show how the changelog document was indexed

use crate::commands::print_json;
use crate::core::context::ReleaseContext;
use crate::core::error::FeedResult;

pub fn run_changelog(ctx: &ReleaseContext, json: bool) -> FeedResult<()> {
  let path = ctx.config.changelog_path();
  let index = ctx.load_changelog()?;

  if json {
    return print_json(index.entries());
  }

  if index.is_empty() {
    println!("⚠️  No changelog entries found in {}", ctx.display_path(&path));
    return Ok(());
  }

  println!("📝 {} entries in {}", index.entries().len(), ctx.display_path(&path));
  for entry in index.entries() {
    let versions: Vec<_> = entry.versions.iter().map(|v| format!("v{}", v)).collect();
    println!();
    println!("  {} ({})", versions.join(", "), entry.date);
    for line in entry.body.lines() {
      println!("    {}", line);
    }
  }
  Ok(())
}
