mod catalog;
mod commands;
mod core;
mod manifest;
mod ui;
mod version;

use clap::{Parser, Subcommand};
use core::error::{FeedError, FeedResult, print_error};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use version::RuntimeTarget;

/// Catalog multi-runtime plugin builds into a release manifest
#[derive(Parser)]
#[command(name = "feedsmith")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(styles = get_styles())]
struct Cli {
  /// Release root that feedsmith.toml and all configured paths live under
  #[arg(long, global = true, default_value = ".")]
  root: PathBuf,

  /// Debug logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  // ============================================================================
  // Version Synthesis
  // ============================================================================
  /// Print the synthesized four-part version for a runtime target
  Version {
    /// Runtime target the build is for
    #[arg(long, value_enum)]
    target: RuntimeTarget,
    /// Formal release: keep the tag's revision instead of the CI counter
    #[arg(long)]
    publish: bool,
    /// CI run counter used as the revision of development builds
    #[arg(long, default_value_t = 0)]
    run: u64,
    /// Base version to use instead of the latest git tag
    #[arg(long)]
    base: Option<String>,
  },

  /// Run the configured build command with the version injected into project metadata
  Build {
    /// Runtime target to build
    #[arg(long, value_enum)]
    target: RuntimeTarget,
    /// Formal release: keep the tag's revision instead of the CI counter
    #[arg(long)]
    publish: bool,
    /// CI run counter used as the revision of development builds
    #[arg(long, default_value_t = 0)]
    run: u64,
  },

  // ============================================================================
  // Manifest Updates
  // ============================================================================
  /// Move fresh build artifacts into the distribution directory and record them
  Catalog {
    /// Show the plan without moving files or writing the manifest
    #[arg(long)]
    dry_run: bool,
    /// Output the appended records in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Record a released version (x.y.z) packaged in the distribution directory
  Publish {
    /// Release version, e.g. 1.4.0
    #[arg(value_name = "VERSION")]
    release: String,
    /// Show the plan without writing the manifest
    #[arg(long)]
    dry_run: bool,
    /// Output the appended record in JSON format
    #[arg(long)]
    json: bool,
  },

  /// Re-apply changelog text and ordering to every listed version
  Refresh {
    /// Show the plan without writing the manifest
    #[arg(long)]
    dry_run: bool,
  },

  // ============================================================================
  // Inspection
  // ============================================================================
  /// List the entries parsed from the changelog document
  Changelog {
    /// Output entries in JSON format
    #[arg(long)]
    json: bool,
  },
}

fn get_styles() -> clap::builder::Styles {
  clap::builder::Styles::styled()
    .usage(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .header(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Yellow))),
    )
    .literal(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))))
    .invalid(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .error(
      anstyle::Style::new()
        .bold()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Red))),
    )
    .valid(
      anstyle::Style::new()
        .bold()
        .underline()
        .fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::Green))),
    )
    .placeholder(anstyle::Style::new().fg_color(Some(anstyle::Color::Ansi(anstyle::AnsiColor::White))))
}

fn init_tracing(verbose: bool) {
  let default = if verbose { "debug" } else { "warn" };
  // Diagnostics go to stderr; stdout carries versions and JSON
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr),
    )
    .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
    .init();
}

fn main() {
  let cli = Cli::parse();
  init_tracing(cli.verbose);

  let result = match cli.command {
    // Runs before any config exists
    Commands::Version {
      target,
      publish,
      run,
      base,
    } => commands::run_version(&cli.root, target, publish, run, base),
    command => run_with_context(&cli.root, command),
  };

  if let Err(err) = result {
    handle_error(err);
  }
}

fn run_with_context(root: &std::path::Path, command: Commands) -> FeedResult<()> {
  let ctx = core::context::ReleaseContext::build(root)?;

  match command {
    Commands::Version { .. } => Ok(()),
    Commands::Build { target, publish, run } => commands::run_build(&ctx, target, publish, run),
    Commands::Catalog { dry_run, json } => commands::run_catalog(&ctx, dry_run, json),
    Commands::Publish { release, dry_run, json } => commands::run_publish(&ctx, &release, dry_run, json),
    Commands::Refresh { dry_run } => commands::run_refresh(&ctx, dry_run),
    Commands::Changelog { json } => commands::run_changelog(&ctx, json),
  }
}

fn handle_error(err: FeedError) -> ! {
  print_error(&err);
  std::process::exit(err.exit_code().as_i32());
}
