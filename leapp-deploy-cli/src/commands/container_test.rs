use clap::Args;
use leapp_deploy::constants::envs;
use leapp_deploy::{ContainerTestMode, Deployer, TestStatus};

#[derive(Args, Debug)]
pub struct ContainerTestArgs {
    /// Base image to pull before building the test image
    #[arg(long, env = envs::CONTAINER_IMAGE)]
    pub image: Option<String>,

    /// Container CLI to drive (docker, podman)
    #[arg(long, env = envs::CONTAINER_ENGINE)]
    pub engine: Option<String>,

    /// Skip the containerized pass and report success
    #[arg(long)]
    pub disabled: bool,
}

pub async fn execute(
    args: ContainerTestArgs,
    global: &crate::cli::GlobalFlags,
) -> anyhow::Result<()> {
    let mut options = global.options()?;
    if let Some(image) = args.image {
        options.container.image = image;
    }
    if let Some(engine) = args.engine {
        options.container.engine = engine;
    }
    if args.disabled {
        options.container.mode = ContainerTestMode::Disabled;
    }

    let report = Deployer::new(options)?.run_container_tests().await?;
    if report.status == TestStatus::Skipped {
        println!(
            "container tests skipped: {}",
            report.reason.as_deref().unwrap_or("disabled")
        );
    }
    Ok(())
}
