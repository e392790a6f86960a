//! Version synthesis
//!
//! Every build gets a four-part identifier `major.minor.patch.revision`:
//!
//! - **major** is pinned by the runtime target (`net6.0` → 1, `net8.0` → 3),
//!   so the manifest separates builds per host generation
//! - **minor.patch** come from the latest git tag (`0.0.0` without tags)
//! - **revision** is the CI run counter for development builds, or the tag's
//!   own revision (default `0`) for releases
//!
//! The synthesized version is injected into the project metadata for the
//! duration of the external build by [`metadata::MetadataGuard`].

pub mod metadata;
pub mod number;
pub mod synth;

pub use number::FourPartVersion;
pub use synth::{BaseVersion, BuildMode, RuntimeTarget, release_version, synthesize};
