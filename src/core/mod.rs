//! Core building blocks shared by every command
//!
//! - **config**: feedsmith.toml parsing and validation
//! - **context**: loaded configuration passed to commands
//! - **error**: error types with exit codes and contextual help
//! - **plan**: reviewable, serializable change plans for dry runs
//! - **vcs**: git tag lookup (SystemGit)

pub mod config;
pub mod context;
pub mod error;
pub mod plan;
pub mod vcs;
