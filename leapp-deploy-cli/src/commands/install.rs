use clap::Args;
use leapp_deploy::BootstrapOutcome;

use super::octal;

#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Print the install report as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: InstallArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let deployer = global.create_deployer()?;
    let report = deployer.install()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for file in &report.provisioned.files {
        println!("{} {}", octal(file.mode), file.dest.display());
    }
    match &report.store.outcome {
        BootstrapOutcome::Applied { version } => {
            println!("{}: layout v{} applied", report.store.path.display(), version);
        }
        BootstrapOutcome::AlreadyApplied {
            version,
            applied_at,
        } => {
            println!(
                "{}: layout v{} already applied at {}",
                report.store.path.display(),
                version,
                applied_at.to_rfc3339()
            );
        }
    }
    Ok(())
}
