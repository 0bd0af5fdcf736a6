//! Error taxonomy for the deployment steps.
//!
//! Every step returns a typed [`DeployError`] so the orchestrator can tell
//! failure kinds apart instead of pattern-matching exit numbers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result alias used across the deployment crates.
pub type DeployResult<T> = Result<T, DeployError>;

/// Exit status for failures that carry no child process code.
pub const EXIT_FAILURE: i32 = 1;

/// Exit status for invalid configuration.
pub const EXIT_CONFIG: i32 = 2;

#[derive(Debug, Error)]
pub enum DeployError {
    /// A configuration source file (or build context) is absent.
    #[error("missing source file: {}", path.display())]
    MissingSourceFile { path: PathBuf },

    /// The filesystem rejected a directory creation or file write.
    #[error("permission denied: {}: {reason}", path.display())]
    PermissionDenied { path: PathBuf, reason: String },

    /// The audit schema could not be applied, including the
    /// "already applied by something else" conflict.
    #[error("schema apply failure: {0}")]
    SchemaApplyFailure(String),

    #[error("dependency install failed with exit code {exit_code}")]
    DependencyInstallFailure { exit_code: i32 },

    #[error("failed to pull container image {image} (exit code {exit_code})")]
    ContainerPullFailure { image: String, exit_code: i32 },

    #[error("failed to build container image {tag} (exit code {exit_code})")]
    ContainerBuildFailure { tag: String, exit_code: i32 },

    #[error("tests failed with exit code {exit_code}")]
    TestFailure { exit_code: i32 },

    #[error("failed to spawn {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("storage error: {0}")]
    Storage(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("configuration error: {0}")]
    Config(String),
}

impl DeployError {
    /// Classify an I/O failure on `path`.
    ///
    /// `NotFound` becomes [`DeployError::MissingSourceFile`]; use this only
    /// for reads of source material. Writes go through [`Self::from_write_io`].
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::MissingSourceFile {
                path: path.to_path_buf(),
            },
            _ => Self::from_write_io(path, err),
        }
    }

    /// Classify an I/O failure while creating or writing `path`.
    pub fn from_write_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied | io::ErrorKind::ReadOnlyFilesystem => {
                Self::PermissionDenied {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                }
            }
            _ => Self::Storage(format!("{}: {}", path.display(), err)),
        }
    }

    /// Process exit status an operator sees for this failure.
    ///
    /// Failures that wrap a child process return the child's code unchanged.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DependencyInstallFailure { exit_code }
            | Self::ContainerPullFailure { exit_code, .. }
            | Self::ContainerBuildFailure { exit_code, .. }
            | Self::TestFailure { exit_code } => *exit_code,
            Self::Config(_) => EXIT_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}
