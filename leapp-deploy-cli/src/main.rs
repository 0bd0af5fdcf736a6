//! `leapp-deploy`: deployment bootstrap for the Leapp upgrade framework.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use leapp_deploy::{DeployError, Requirements};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    leapp_deploy::init_logging(&cli.global.log_level);

    let result = match cli.command {
        Command::ProvisionDependencies => {
            commands::deps::execute(Requirements::Build, &cli.global).await
        }
        Command::Install(args) => commands::install::execute(args, &cli.global).await,
        Command::ProvisionTestDependencies => {
            commands::deps::execute(Requirements::Test, &cli.global).await
        }
        Command::RunTests => commands::test::execute(&cli.global).await,
        Command::RunContainerTests(args) => {
            commands::container_test::execute(args, &cli.global).await
        }
        Command::Status(args) => commands::status::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

/// Child exit codes pass through unchanged; anything unrepresentable is 1.
fn exit_status(err: &anyhow::Error) -> u8 {
    let code = err
        .downcast_ref::<DeployError>()
        .map(DeployError::exit_code)
        .unwrap_or(1);
    u8::try_from(code).ok().filter(|c| *c != 0).unwrap_or(1)
}
