use clap::Args;
use leapp_deploy::InstallStatus;

use super::octal;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print machine-readable JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(args: StatusArgs, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let deployer = global.create_deployer()?;
    let status = deployer.status()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        print_human(&status);
    }

    if !status.is_complete() {
        anyhow::bail!("installation under {} is incomplete", status.prefix.display());
    }
    Ok(())
}

fn print_human(status: &InstallStatus) {
    println!("prefix: {}", status.prefix.display());
    for file in &status.config_files {
        match file.mode {
            Some(mode) => println!("{} {}", octal(mode), file.path.display()),
            None => println!("missing {}", file.path.display()),
        }
    }

    let store = &status.store;
    match (&store.migration, store.records) {
        (Some(migration), Some(records)) => println!(
            "audit store: {} (layout v{}, {} records)",
            store.path.display(),
            migration.version,
            records
        ),
        _ if store.exists => println!("audit store: {} (no layout)", store.path.display()),
        _ => println!("audit store: {} (missing)", store.path.display()),
    }
}
