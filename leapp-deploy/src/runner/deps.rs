//! Build- and test-time dependency installation.

use std::path::PathBuf;

use leapp_deploy_shared::errors::{DeployError, DeployResult};

use super::process;
use crate::deploy::options::{CommandSpec, DeployOptions};

/// Which requirements list to install.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirements {
    Build,
    Test,
}

#[derive(Clone, Debug)]
pub struct DependencyInstaller {
    installer: String,
    requirements: String,
    test_requirements: String,
    source_dir: PathBuf,
}

impl DependencyInstaller {
    pub fn new(options: &DeployOptions) -> Self {
        Self {
            installer: options.dependencies.installer.clone(),
            requirements: options.dependencies.requirements.clone(),
            test_requirements: options.dependencies.test_requirements.clone(),
            source_dir: options.source_dir.clone(),
        }
    }

    /// `<installer> install -r <requirements file>`
    pub fn command(&self, which: Requirements) -> CommandSpec {
        let file = match which {
            Requirements::Build => &self.requirements,
            Requirements::Test => &self.test_requirements,
        };
        CommandSpec::new(self.installer.clone(), ["install", "-r", file.as_str()])
    }

    pub async fn install(&self, which: Requirements) -> DeployResult<()> {
        tracing::info!(requirements = ?which, "Installing dependencies");

        let code = process::run(&self.command(which), &self.source_dir).await?;
        if code != 0 {
            return Err(DeployError::DependencyInstallFailure { exit_code: code });
        }
        Ok(())
    }
}
