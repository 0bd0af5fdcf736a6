use leapp_deploy::{
    CommandSpec, ContainerTestMode, DeployError, Deployer, LocalTestOptions, TestStatus,
};
use leapp_deploy_test_utils::{self as utils, SourceTree};

fn deployer(source: &SourceTree, edit: impl FnOnce(&mut leapp_deploy::DeployOptions)) -> Deployer {
    let prefix = utils::fresh_prefix();
    let mut options = utils::options_for(source, prefix.path());
    edit(&mut options);
    Deployer::new(options).unwrap()
}

#[tokio::test]
async fn test_dependency_install_propagates_exit_code() {
    let source = SourceTree::new();
    let installer = source.script("bin/pip", "[ \"$3\" = requirements.txt ] && exit 0\nexit 9");
    let deployer = deployer(&source, |o| {
        o.dependencies.installer = installer.display().to_string();
    });

    deployer.provision_dependencies().await.unwrap();

    let err = deployer.provision_test_dependencies().await.unwrap_err();
    assert!(matches!(err, DeployError::DependencyInstallFailure { exit_code: 9 }));
    assert_eq!(err.exit_code(), 9);
}

#[tokio::test]
async fn test_local_tests_run_in_source_dir() {
    let source = SourceTree::new();
    let deployer = deployer(&source, |o| {
        o.local_tests = LocalTestOptions {
            style_check: CommandSpec::new("sh", ["-c", "test -f requirements.txt"]),
            coverage_tests: CommandSpec::new("sh", ["-c", "test -d res/docker-tests"]),
        };
    });

    let report = deployer.run_tests().await.unwrap();
    assert_eq!(report.status, TestStatus::Passed);
}

#[tokio::test]
async fn test_local_test_failure_code_is_preserved() {
    let source = SourceTree::new();
    let deployer = deployer(&source, |o| {
        o.local_tests.style_check = CommandSpec::new("sh", ["-c", "exit 0"]);
        o.local_tests.coverage_tests = CommandSpec::new("sh", ["-c", "exit 4"]);
    });

    let err = deployer.run_tests().await.unwrap_err();
    assert_eq!(err.exit_code(), 4);
}

#[tokio::test]
async fn test_container_tests_mount_source_tree() {
    let source = SourceTree::new();
    let log = source.path().join("engine.log");
    let engine = source.script("bin/engine", &format!("echo \"$@\" >> \"{}\"", log.display()));
    let deployer = deployer(&source, |o| {
        o.container.engine = engine.display().to_string();
        o.container.image = "registry.example/fedora:40".into();
    });

    let report = deployer.run_container_tests().await.unwrap();
    assert_eq!(report.status, TestStatus::Passed);

    let log = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<_> = log.lines().collect();
    assert_eq!(lines[0], "pull registry.example/fedora:40");
    assert_eq!(
        lines[1],
        format!("build -t leapp-tests {}/res/docker-tests", source.path().display())
    );
    assert_eq!(
        lines[2],
        format!("run --rm -v {}:/payload:rw leapp-tests", source.path().display())
    );
}

#[tokio::test]
async fn test_disabled_container_tests_are_skipped() {
    let source = SourceTree::empty();
    let deployer = deployer(&source, |o| {
        o.container.engine = "leapp-deploy-no-such-engine".into();
        o.container.mode = ContainerTestMode::Disabled;
    });

    let report = deployer.run_container_tests().await.unwrap();
    assert_eq!(report.status, TestStatus::Skipped);
}
