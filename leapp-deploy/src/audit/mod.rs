//! Audit store bootstrap: `{prefix}/var/lib/leapp/audit.db`.
//!
//! The layout script is applied at most once per store file. A
//! `schema_migrations` record stored alongside the data says whether (and
//! from which script) the store was initialized, so a rerun reports
//! "already applied" instead of tripping over existing tables.

pub mod schema;
pub mod store;

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use leapp_deploy_shared::errors::{DeployError, DeployResult};
use serde::Serialize;

use crate::deploy::layout::InstallLayout;
use crate::deploy::options::DeployOptions;
use crate::provision::fs;
pub use schema::{AUDIT_LAYOUT, Migration};
pub use store::{AuditStore, MigrationRecord, SchemaState};

/// Result of a bootstrap run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum BootstrapOutcome {
    /// The layout was applied by this run.
    Applied { version: i64 },
    /// A previous run already applied the layout; nothing was written.
    AlreadyApplied {
        version: i64,
        applied_at: DateTime<Utc>,
    },
}

#[derive(Clone, Debug, Serialize)]
pub struct StoreReport {
    pub path: PathBuf,
    pub outcome: BootstrapOutcome,
}

/// Creates the audit store and applies its layout exactly once.
#[derive(Clone, Debug)]
pub struct AuditStoreBootstrapper {
    state_dir: PathBuf,
    store_path: PathBuf,
    dir_mode: u32,
    file_mode: u32,
    migration: Migration,
}

impl AuditStoreBootstrapper {
    pub fn new(options: &DeployOptions) -> Self {
        let layout = InstallLayout::new(&options.prefix);
        Self {
            state_dir: layout.state_dir(),
            store_path: layout.audit_store_path(),
            dir_mode: options.state_dir_mode,
            file_mode: options.store_file_mode,
            migration: AUDIT_LAYOUT,
        }
    }

    /// Use a different layout script.
    pub fn with_migration(mut self, migration: Migration) -> Self {
        self.migration = migration;
        self
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    pub fn bootstrap(&self) -> DeployResult<StoreReport> {
        tracing::info!(
            store = %self.store_path.display(),
            migration = self.migration.name,
            version = self.migration.version,
            "Bootstrapping audit store"
        );

        fs::ensure_dir(&self.state_dir, self.dir_mode)?;

        let created = !self.store_path.exists();
        let outcome = match self.open_and_apply() {
            Ok(outcome) => outcome,
            Err(e) => {
                if created {
                    self.discard_new_store();
                }
                return Err(e);
            }
        };

        std::fs::set_permissions(
            &self.store_path,
            std::fs::Permissions::from_mode(self.file_mode),
        )
        .map_err(|e| DeployError::from_write_io(&self.store_path, e))?;

        match &outcome {
            BootstrapOutcome::Applied { version } => {
                tracing::info!(version, "Audit layout applied");
            }
            BootstrapOutcome::AlreadyApplied {
                version,
                applied_at,
            } => {
                tracing::info!(
                    version,
                    applied_at = %applied_at.to_rfc3339(),
                    "Audit layout already applied, skipping"
                );
            }
        }

        Ok(StoreReport {
            path: self.store_path.clone(),
            outcome,
        })
    }

    fn open_and_apply(&self) -> DeployResult<BootstrapOutcome> {
        let mut store = AuditStore::open(&self.store_path)?;

        match store.inspect(&self.migration)? {
            SchemaState::Applied(record) => Ok(BootstrapOutcome::AlreadyApplied {
                version: record.version,
                applied_at: record.applied_at,
            }),
            SchemaState::Diverged(record) => Err(DeployError::SchemaApplyFailure(format!(
                "{} records version {} from a different layout (checksum {}, expected {})",
                self.store_path.display(),
                record.version,
                record.checksum,
                self.migration.checksum()
            ))),
            SchemaState::Unmanaged { present } => Err(DeployError::SchemaApplyFailure(format!(
                "{} already contains {} without a migration record; refusing to reapply",
                self.store_path.display(),
                present.join(", ")
            ))),
            SchemaState::Fresh => {
                let record = store.apply(&self.migration)?;
                Ok(BootstrapOutcome::Applied {
                    version: record.version,
                })
            }
        }
    }

    // A store this run created must not survive a failed apply.
    fn discard_new_store(&self) {
        for suffix in ["", "-journal", "-wal", "-shm"] {
            let mut path = self.store_path.clone().into_os_string();
            path.push(suffix);
            let path = PathBuf::from(path);
            if path.exists()
                && let Err(e) = std::fs::remove_file(&path)
            {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove store file");
            }
        }
    }
}
