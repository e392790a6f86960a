//! Manifest merging
//!
//! - **document**: load/save of the manifest JSON with key order preserved
//! - **changelog**: changelog text → release notes per `major.minor.patch`
//! - **merge**: duplicate rejection, enrichment, newest-first ordering
//! - **timestamp**: second-precision UTC timestamps

pub mod changelog;
pub mod document;
pub mod merge;
pub mod timestamp;

pub use changelog::ChangeLogIndex;
pub use document::{Manifest, VersionRecord};
pub use merge::{MergeSummary, RecordBuilder};
