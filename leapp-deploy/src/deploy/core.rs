//! Step orchestration.

use std::path::PathBuf;

use leapp_deploy_shared::errors::{DeployError, DeployResult};
use serde::Serialize;

use crate::audit::{AUDIT_LAYOUT, AuditStore, AuditStoreBootstrapper, MigrationRecord, StoreReport};
use crate::deploy::layout::InstallLayout;
use crate::deploy::options::DeployOptions;
use crate::provision::{ConfigProvisioner, ProvisionReport, fs};
use crate::runner::{
    ContainerTestRunner, DependencyInstaller, LocalTestRunner, Requirements, TestReport,
};

/// What `install` did.
#[derive(Clone, Debug, Serialize)]
pub struct InstallReport {
    pub provisioned: ProvisionReport,
    pub store: StoreReport,
}

/// An installed configuration file as found on disk.
#[derive(Clone, Debug, Serialize)]
pub struct InstalledFile {
    pub path: PathBuf,
    /// `None` when the file is absent.
    pub mode: Option<u32>,
}

/// Audit store state as found on disk.
#[derive(Clone, Debug, Serialize)]
pub struct StoreStatus {
    pub path: PathBuf,
    pub exists: bool,
    pub migration: Option<MigrationRecord>,
    pub records: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct InstallStatus {
    pub prefix: PathBuf,
    pub config_files: Vec<InstalledFile>,
    pub store: StoreStatus,
}

impl InstallStatus {
    /// Every config file present and the layout recorded.
    pub fn is_complete(&self) -> bool {
        self.config_files.iter().all(|f| f.mode.is_some()) && self.store.migration.is_some()
    }
}

/// Runs the deployment operations against one validated configuration.
///
/// Steps run strictly in sequence. A failing step aborts the operation;
/// nothing already completed is rolled back.
#[derive(Clone, Debug)]
pub struct Deployer {
    options: DeployOptions,
}

impl Deployer {
    pub fn new(options: DeployOptions) -> DeployResult<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    pub fn options(&self) -> &DeployOptions {
        &self.options
    }

    /// ConfigProvisioner, then AuditStoreBootstrapper.
    pub fn install(&self) -> DeployResult<InstallReport> {
        tracing::info!(prefix = %self.options.prefix.display(), "Installing");

        let provisioned = ConfigProvisioner::new(&self.options).provision()?;
        let store = AuditStoreBootstrapper::new(&self.options).bootstrap()?;

        Ok(InstallReport { provisioned, store })
    }

    pub async fn provision_dependencies(&self) -> DeployResult<()> {
        DependencyInstaller::new(&self.options)
            .install(Requirements::Build)
            .await
    }

    pub async fn provision_test_dependencies(&self) -> DeployResult<()> {
        DependencyInstaller::new(&self.options)
            .install(Requirements::Test)
            .await
    }

    pub async fn run_tests(&self) -> DeployResult<TestReport> {
        LocalTestRunner::new(&self.options).run().await
    }

    pub async fn run_container_tests(&self) -> DeployResult<TestReport> {
        ContainerTestRunner::new(&self.options).run().await
    }

    /// Inspect what is installed under the prefix. Read-only.
    pub fn status(&self) -> DeployResult<InstallStatus> {
        let layout = InstallLayout::new(&self.options.prefix);

        let config_files = self
            .options
            .config_files
            .iter()
            .map(|name| {
                let path = layout.config_path(name);
                let mode = match fs::mode_of(&path) {
                    Ok(mode) => Some(mode),
                    Err(DeployError::MissingSourceFile { .. }) => None,
                    Err(e) => return Err(e),
                };
                Ok(InstalledFile { path, mode })
            })
            .collect::<DeployResult<Vec<_>>>()?;

        let store_path = layout.audit_store_path();
        let store = if store_path.exists() {
            let store = AuditStore::open_read_only(&store_path)?;
            let migration = store.migration(AUDIT_LAYOUT.version)?;
            let records = match migration {
                Some(_) => Some(store.record_count(&AUDIT_LAYOUT)?),
                None => None,
            };
            StoreStatus {
                path: store_path,
                exists: true,
                migration,
                records,
            }
        } else {
            StoreStatus {
                path: store_path,
                exists: false,
                migration: None,
                records: None,
            }
        };

        Ok(InstallStatus {
            prefix: self.options.prefix.clone(),
            config_files,
            store,
        })
    }
}
