use leapp_deploy::Requirements;

/// Shared by `provision-dependencies` and `provision-test-dependencies`.
pub async fn execute(which: Requirements, global: &crate::cli::GlobalFlags) -> anyhow::Result<()> {
    let deployer = global.create_deployer()?;
    match which {
        Requirements::Build => deployer.provision_dependencies().await?,
        Requirements::Test => deployer.provision_test_dependencies().await?,
    }
    tracing::info!(requirements = ?which, "Dependencies installed");
    Ok(())
}
