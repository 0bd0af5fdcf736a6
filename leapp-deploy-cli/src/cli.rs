use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use leapp_deploy::constants::envs;
use leapp_deploy::{DeployOptions, Deployer};

use crate::commands::container_test::ContainerTestArgs;
use crate::commands::install::InstallArgs;
use crate::commands::status::StatusArgs;

#[derive(Parser, Debug)]
#[command(name = "leapp-deploy", author, version, about = "Leapp deployment bootstrap")]
#[command(args_override_self = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Install build-time dependencies
    ProvisionDependencies,

    /// Install configuration files and initialize the audit store
    Install(InstallArgs),

    /// Install test-time dependencies
    ProvisionTestDependencies,

    /// Run the style check and the coverage test pass
    RunTests,

    /// Build and run the containerized test image
    RunContainerTests(ContainerTestArgs),

    /// Show what is installed under the prefix
    Status(StatusArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GlobalFlags {
    /// Install prefix
    #[arg(long, global = true, env = envs::PREFIX)]
    pub prefix: Option<PathBuf>,

    /// Source tree holding etc/leapp, requirements and tests
    #[arg(long, global = true, env = envs::SOURCE_DIR)]
    pub source_dir: Option<PathBuf>,

    /// YAML file overriding built-in defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,
}

impl GlobalFlags {
    /// Defaults, then `--config`, then environment, then flags.
    pub fn options(&self) -> anyhow::Result<DeployOptions> {
        let mut options = match &self.config {
            Some(path) => DeployOptions::from_file(path)?,
            None => DeployOptions::default(),
        };
        if let Some(prefix) = &self.prefix {
            options.prefix = prefix.clone();
        }
        if let Some(source_dir) = &self.source_dir {
            options.source_dir = source_dir.clone();
        }
        Ok(options)
    }

    pub fn create_deployer(&self) -> anyhow::Result<Deployer> {
        Ok(Deployer::new(self.options()?)?)
    }
}
