//! Artifact cataloging
//!
//! Each runtime target writes its archives to its own build output directory.
//! The cataloger scans those directories for `<product>.<a>.<b>.<c>.<d>.zip`,
//! hashes each match, and moves it into the flat distribution directory the
//! manifest's `sourceUrl`s point at.

pub mod abi;
pub mod checksum;
pub mod pattern;
pub mod scan;

pub use abi::TargetAbi;
pub use checksum::ChecksumAlgorithm;
pub use pattern::ArtifactPattern;
pub use scan::{Cataloger, relocate};
