//! Leapp deployment bootstrap.
//!
//! Provisions configuration into an install prefix, initializes the audit
//! store, and drives the local and containerized test paths.
//!
//! ```no_run
//! use leapp_deploy::{DeployOptions, Deployer};
//! use std::path::PathBuf;
//!
//! let deployer = Deployer::new(DeployOptions {
//!     prefix: PathBuf::from("/tmp/stage"),
//!     ..DeployOptions::default()
//! })?;
//! let report = deployer.install()?;
//! println!("{:?}", report.store.outcome);
//! # Ok::<(), leapp_deploy::DeployError>(())
//! ```

pub mod audit;
pub mod deploy;
pub mod provision;
pub mod runner;
mod util;

pub use audit::{AuditStore, AuditStoreBootstrapper, BootstrapOutcome, StoreReport};
pub use deploy::options::{
    CommandSpec, ContainerOptions, ContainerTestMode, DependencyOptions, DeployOptions,
    LocalTestOptions,
};
pub use deploy::{Deployer, InstallReport, InstallStatus};
pub use leapp_deploy_shared::{DeployError, DeployResult, constants};
pub use provision::{ConfigFile, ConfigProvisioner, ProvisionReport};
pub use runner::{
    ContainerTestRunner, DependencyInstaller, LocalTestRunner, Requirements, TestEnvironmentSpec,
    TestReport, TestStatus,
};
pub use util::init_logging;
