use std::path::{Path, PathBuf};

use leapp_deploy_shared::constants::{app, dirs, filenames};

// ============================================================================
// INSTALL LAYOUT (under the install prefix)
// ============================================================================

/// Paths derived from an InstallPrefix.
///
/// ```text
/// {prefix}/
/// ├── etc/leapp/
/// │   ├── leapp.conf
/// │   └── logger.conf
/// └── var/lib/leapp/
///     └── audit.db
/// ```
///
/// Immutable for the duration of a run.
#[derive(Clone, Debug)]
pub struct InstallLayout {
    prefix: PathBuf,
}

impl InstallLayout {
    pub fn new(prefix: impl Into<PathBuf>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &Path {
        &self.prefix
    }

    /// Configuration directory: {prefix}/etc/leapp
    pub fn config_dir(&self) -> PathBuf {
        self.prefix.join(dirs::ETC).join(app::NAME)
    }

    pub fn config_path(&self, name: &str) -> PathBuf {
        self.config_dir().join(name)
    }

    /// Persistent state directory: {prefix}/var/lib/leapp
    pub fn state_dir(&self) -> PathBuf {
        self.prefix.join(dirs::VAR_LIB).join(app::NAME)
    }

    /// Audit store file: {prefix}/var/lib/leapp/audit.db
    pub fn audit_store_path(&self) -> PathBuf {
        self.state_dir().join(filenames::AUDIT_STORE)
    }
}

// ============================================================================
// SOURCE LAYOUT (working tree)
// ============================================================================

/// Paths inside the working tree the tooling reads from.
#[derive(Clone, Debug)]
pub struct SourceLayout {
    root: PathBuf,
}

impl SourceLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shipped configuration: {source}/etc/leapp
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(dirs::ETC).join(app::NAME)
    }

    pub fn config_path(&self, name: &str) -> PathBuf {
        self.config_dir().join(name)
    }

    /// Container test build context: {source}/res/docker-tests
    pub fn container_build_context(&self) -> PathBuf {
        self.root.join(dirs::DOCKER_TESTS)
    }
}
