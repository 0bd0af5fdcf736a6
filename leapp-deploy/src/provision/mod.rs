//! Configuration provisioning into `{prefix}/etc/leapp`.

pub mod fs;

use std::path::PathBuf;

use leapp_deploy_shared::errors::{DeployError, DeployResult};
use serde::Serialize;

use crate::deploy::layout::{InstallLayout, SourceLayout};
use crate::deploy::options::DeployOptions;

/// One configuration file to install.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ConfigFile {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub mode: u32,
}

/// What a provisioning run wrote.
#[derive(Clone, Debug, Serialize)]
pub struct ProvisionReport {
    pub config_dir: PathBuf,
    pub files: Vec<ConfigFile>,
}

/// Copies the shipped configuration files into the install prefix.
///
/// Rerunning overwrites destinations with identical content and mode. There
/// is no locking: two concurrent runs against one prefix race on the
/// directory creation.
#[derive(Clone, Debug)]
pub struct ConfigProvisioner {
    install: InstallLayout,
    source: SourceLayout,
    names: Vec<String>,
    dir_mode: u32,
    file_mode: u32,
}

impl ConfigProvisioner {
    pub fn new(options: &DeployOptions) -> Self {
        Self {
            install: InstallLayout::new(&options.prefix),
            source: SourceLayout::new(&options.source_dir),
            names: options.config_files.clone(),
            dir_mode: options.config_dir_mode,
            file_mode: options.config_file_mode,
        }
    }

    /// The files this provisioner would install.
    pub fn plan(&self) -> Vec<ConfigFile> {
        self.names
            .iter()
            .map(|name| ConfigFile {
                source: self.source.config_path(name),
                dest: self.install.config_path(name),
                mode: self.file_mode,
            })
            .collect()
    }

    /// Install every configuration file.
    ///
    /// All sources are checked before the destination directory is created,
    /// so a missing source leaves the prefix untouched.
    pub fn provision(&self) -> DeployResult<ProvisionReport> {
        let files = self.plan();
        let config_dir = self.install.config_dir();

        for file in &files {
            let metadata = std::fs::metadata(&file.source)
                .map_err(|e| DeployError::from_io(&file.source, e))?;
            if !metadata.is_file() {
                return Err(DeployError::MissingSourceFile {
                    path: file.source.clone(),
                });
            }
        }

        tracing::info!(
            config_dir = %config_dir.display(),
            count = files.len(),
            "Provisioning configuration files"
        );

        fs::ensure_dir(&config_dir, self.dir_mode)?;

        for file in &files {
            let content =
                std::fs::read(&file.source).map_err(|e| DeployError::from_io(&file.source, e))?;
            fs::write_atomic(&file.dest, &content, file.mode)?;
            tracing::debug!(
                source = %file.source.display(),
                dest = %file.dest.display(),
                mode = %format!("{:04o}", file.mode),
                "Installed configuration file"
            );
        }

        Ok(ProvisionReport { config_dir, files })
    }
}
