//! Error types for feedsmith with contextual messages and exit codes
//!
//! Every error maps to an exit code class and may carry a help line that
//! points the release operator at the fix.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Exit codes for feedsmith
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
  /// User error (config, malformed versions, malformed manifest)
  User = 1,
  /// System error (I/O, external build command)
  System = 2,
  /// Validation failure (duplicate publish)
  Validation = 3,
}

impl ExitCode {
  /// Convert to i32 for process exit
  pub fn as_i32(self) -> i32 {
    self as i32
  }
}

/// Main error type for feedsmith
#[derive(Debug)]
pub enum FeedError {
  /// Configuration errors
  Config(ConfigError),

  /// Manifest content errors (duplicates, malformed documents)
  Manifest(ManifestError),

  /// I/O errors
  Io(io::Error),

  /// Generic error with message and optional context
  Message {
    message: String,
    context: Option<String>,
    help: Option<String>,
  },
}

impl FeedError {
  /// Create a simple error message
  pub fn message(msg: impl Into<String>) -> Self {
    FeedError::Message {
      message: msg.into(),
      context: None,
      help: None,
    }
  }

  /// Create an error with help text
  pub fn with_help(msg: impl Into<String>, help: impl Into<String>) -> Self {
    FeedError::Message {
      message: msg.into(),
      context: None,
      help: Some(help.into()),
    }
  }

  /// Add context to an existing error
  pub fn context(self, ctx: impl Into<String>) -> Self {
    let ctx_str = ctx.into();
    match self {
      FeedError::Message { message, context, help } => FeedError::Message {
        message,
        context: Some(context.map(|c| format!("{}\n{}", ctx_str, c)).unwrap_or(ctx_str)),
        help,
      },
      FeedError::Io(err) => FeedError::Io(io::Error::new(err.kind(), format!("{}: {}", ctx_str, err))),
      // Duplicates keep their variant for the validation exit code
      FeedError::Manifest(ManifestError::DuplicateVersion { .. }) => self,
      FeedError::Config(_) | FeedError::Manifest(_) => FeedError::Message {
        help: self.help_message(),
        message: self.to_string(),
        context: Some(ctx_str),
      },
    }
  }

  /// Get the appropriate exit code for this error
  pub fn exit_code(&self) -> ExitCode {
    match self {
      FeedError::Config(_) => ExitCode::User,
      FeedError::Manifest(ManifestError::DuplicateVersion { .. }) => ExitCode::Validation,
      FeedError::Manifest(_) => ExitCode::User,
      FeedError::Io(_) => ExitCode::System,
      FeedError::Message { .. } => ExitCode::User,
    }
  }

  /// Get contextual help message for this error
  pub fn help_message(&self) -> Option<String> {
    match self {
      FeedError::Config(e) => e.help_message(),
      FeedError::Manifest(e) => e.help_message(),
      FeedError::Message { help, .. } => help.clone(),
      _ => None,
    }
  }
}

impl fmt::Display for FeedError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FeedError::Config(e) => write!(f, "{}", e),
      FeedError::Manifest(e) => write!(f, "{}", e),
      FeedError::Io(e) => write!(f, "I/O error: {}", e),
      FeedError::Message { message, context, .. } => {
        write!(f, "{}", message)?;
        if let Some(ctx) = context {
          write!(f, "\n{}", ctx)?;
        }
        Ok(())
      }
    }
  }
}

impl std::error::Error for FeedError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      FeedError::Io(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for FeedError {
  fn from(err: io::Error) -> Self {
    FeedError::Io(err)
  }
}

impl From<ConfigError> for FeedError {
  fn from(err: ConfigError) -> Self {
    FeedError::Config(err)
  }
}

impl From<ManifestError> for FeedError {
  fn from(err: ManifestError) -> Self {
    FeedError::Manifest(err)
  }
}

impl From<toml_edit::de::Error> for FeedError {
  fn from(err: toml_edit::de::Error) -> Self {
    FeedError::message(format!("TOML deserialization error: {}", err))
  }
}

impl From<serde_json::Error> for FeedError {
  fn from(err: serde_json::Error) -> Self {
    FeedError::message(format!("JSON error: {}", err))
  }
}

impl From<semver::Error> for FeedError {
  fn from(err: semver::Error) -> Self {
    FeedError::message(format!("Version parse error: {}", err))
  }
}

impl From<regex::Error> for FeedError {
  fn from(err: regex::Error) -> Self {
    FeedError::message(format!("Pattern error: {}", err))
  }
}

impl From<tempfile::PersistError> for FeedError {
  fn from(err: tempfile::PersistError) -> Self {
    FeedError::Io(err.error)
  }
}

/// Configuration-related errors
#[derive(Debug)]
pub enum ConfigError {
  /// feedsmith.toml not found
  NotFound { root: PathBuf },

  /// A field holds a value feedsmith cannot work with
  InvalidField { field: String, reason: String },

  /// Version string is not `major.minor.patch`
  MalformedVersion { version: String },

  /// Runtime target is not configured
  UnknownTarget { name: String },
}

impl ConfigError {
  fn help_message(&self) -> Option<String> {
    match self {
      ConfigError::NotFound { .. } => {
        Some("Create a feedsmith.toml with at least a [product] name and a [publish] source_base_url.".to_string())
      }
      ConfigError::MalformedVersion { .. } => {
        Some("Versions must have exactly three dot-separated parts, e.g. `1.4.0`.".to_string())
      }
      ConfigError::UnknownTarget { .. } => Some("Supported targets are `net6.0` and `net8.0`.".to_string()),
      _ => None,
    }
  }
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ConfigError::NotFound { root } => {
        write!(
          f,
          "No feedsmith configuration found.\nExpected file: {}/feedsmith.toml",
          root.display()
        )
      }
      ConfigError::InvalidField { field, reason } => {
        write!(f, "Invalid config field '{}': {}", field, reason)
      }
      ConfigError::MalformedVersion { version } => {
        write!(f, "Malformed version '{}'", version)
      }
      ConfigError::UnknownTarget { name } => {
        write!(f, "Unknown runtime target '{}'", name)
      }
    }
  }
}

/// Manifest content errors
#[derive(Debug)]
pub enum ManifestError {
  /// The version is already listed in the manifest (or twice in one batch)
  DuplicateVersion { version: String },

  /// The manifest document does not have the expected shape
  Malformed { path: PathBuf, reason: String },

  /// The distribution directory already holds a file of that name
  ArtifactExists { path: PathBuf },
}

impl ManifestError {
  fn help_message(&self) -> Option<String> {
    match self {
      ManifestError::DuplicateVersion { .. } => {
        Some("Published versions are immutable. Bump the version or the CI run counter and rebuild.".to_string())
      }
      ManifestError::Malformed { .. } => {
        Some("The manifest must be a JSON array holding exactly one plugin object with a `versions` list.".to_string())
      }
      ManifestError::ArtifactExists { .. } => {
        Some("Remove the stale build output or the existing distribution file before cataloging again.".to_string())
      }
    }
  }
}

impl fmt::Display for ManifestError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ManifestError::DuplicateVersion { version } => {
        write!(f, "Version {} already exists in the manifest", version)
      }
      ManifestError::Malformed { path, reason } => {
        write!(f, "Malformed manifest {}: {}", path.display(), reason)
      }
      ManifestError::ArtifactExists { path } => {
        write!(f, "Artifact already present in distribution directory: {}", path.display())
      }
    }
  }
}

/// Result type alias for feedsmith
pub type FeedResult<T> = Result<T, FeedError>;

/// Helper trait to add context to Results
pub trait ResultExt<T> {
  /// Add context using a closure (lazy evaluation)
  fn with_context<F>(self, f: F) -> FeedResult<T>
  where
    F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
  E: Into<FeedError>,
{
  fn with_context<F>(self, f: F) -> FeedResult<T>
  where
    F: FnOnce() -> String,
  {
    self.map_err(|e| e.into().context(f()))
  }
}

/// Pretty-print an error to stderr with help text
pub fn print_error(error: &FeedError) {
  eprintln!("\n❌ {}\n", error);

  if let Some(help) = error.help_message() {
    eprintln!("💡 Help: {}\n", help);
  }
}
