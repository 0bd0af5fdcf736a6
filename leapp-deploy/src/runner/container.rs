//! Containerized test pass.
//!
//! Pulls the base image, builds the test image from the build context, then
//! runs it with the source tree bind-mounted read-write.

use std::path::PathBuf;

use leapp_deploy_shared::errors::{DeployError, DeployResult};

use super::TestReport;
use super::process;
use crate::deploy::layout::SourceLayout;
use crate::deploy::options::{CommandSpec, ContainerTestMode, DeployOptions};

/// Per-invocation description of the isolated test environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestEnvironmentSpec {
    /// Base image reference to pull.
    pub image: String,
    /// Tag for the built test image.
    pub tag: String,
    /// Directory holding the test Dockerfile.
    pub build_context: PathBuf,
    /// Host directory exposed inside the container.
    pub source_mount: PathBuf,
    /// Where `source_mount` appears inside the container.
    pub mount_path: String,
}

impl TestEnvironmentSpec {
    pub fn from_options(options: &DeployOptions) -> Self {
        let source = SourceLayout::new(&options.source_dir);
        Self {
            image: options.container.image.clone(),
            tag: options.container.test_tag.clone(),
            build_context: source.container_build_context(),
            source_mount: options.source_dir.clone(),
            mount_path: options.container.mount_path.clone(),
        }
    }

    /// `-v` argument: `<host>:<container>:rw`
    pub fn volume_arg(&self) -> String {
        format!("{}:{}:rw", self.source_mount.display(), self.mount_path)
    }
}

#[derive(Clone, Debug)]
pub struct ContainerTestRunner {
    engine: String,
    mode: ContainerTestMode,
    spec: TestEnvironmentSpec,
}

impl ContainerTestRunner {
    pub fn new(options: &DeployOptions) -> Self {
        Self {
            engine: options.container.engine.clone(),
            mode: options.container.mode,
            spec: TestEnvironmentSpec::from_options(options),
        }
    }

    pub fn spec(&self) -> &TestEnvironmentSpec {
        &self.spec
    }

    pub fn pull_command(&self) -> CommandSpec {
        CommandSpec::new(self.engine.clone(), ["pull".to_string(), self.spec.image.clone()])
    }

    pub fn build_command(&self) -> CommandSpec {
        CommandSpec::new(
            self.engine.clone(),
            [
                "build".to_string(),
                "-t".to_string(),
                self.spec.tag.clone(),
                self.spec.build_context.display().to_string(),
            ],
        )
    }

    pub fn run_command(&self) -> CommandSpec {
        CommandSpec::new(
            self.engine.clone(),
            [
                "run".to_string(),
                "--rm".to_string(),
                "-v".to_string(),
                self.spec.volume_arg(),
                self.spec.tag.clone(),
            ],
        )
    }

    pub async fn run(&self) -> DeployResult<TestReport> {
        if self.mode == ContainerTestMode::Disabled {
            tracing::warn!("Container tests are disabled, skipping");
            return Ok(TestReport::skipped("container tests disabled"));
        }

        if !self.spec.build_context.is_dir() {
            return Err(DeployError::MissingSourceFile {
                path: self.spec.build_context.clone(),
            });
        }

        tracing::info!(
            image = %self.spec.image,
            tag = %self.spec.tag,
            engine = %self.engine,
            "Running container tests"
        );

        let cwd = &self.spec.source_mount;

        let code = process::run(&self.pull_command(), cwd).await?;
        if code != 0 {
            return Err(DeployError::ContainerPullFailure {
                image: self.spec.image.clone(),
                exit_code: code,
            });
        }

        let code = process::run(&self.build_command(), cwd).await?;
        if code != 0 {
            return Err(DeployError::ContainerBuildFailure {
                tag: self.spec.tag.clone(),
                exit_code: code,
            });
        }

        let code = process::run(&self.run_command(), cwd).await?;
        if code != 0 {
            return Err(DeployError::TestFailure { exit_code: code });
        }

        Ok(TestReport::passed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deploy::options::ContainerOptions;
    use crate::runner::TestStatus;
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::TempDir;

    /// Fake engine: appends its argv to `calls` and fails on `fail_on`.
    fn fake_engine(dir: &Path, fail_on: &str, code: i32) -> PathBuf {
        let path = dir.join("fake-engine");
        let script = format!(
            "#!/bin/sh\necho \"$@\" >> \"{}/calls\"\n[ \"$1\" = \"{fail_on}\" ] && exit {code}\nexit 0\n",
            dir.display()
        );
        std::fs::write(&path, script).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn options(source: &Path, engine: &Path, mode: ContainerTestMode) -> DeployOptions {
        DeployOptions {
            source_dir: source.to_path_buf(),
            container: ContainerOptions {
                engine: engine.display().to_string(),
                mode,
                ..ContainerOptions::default()
            },
            ..DeployOptions::builtin()
        }
    }

    fn source_tree() -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("res/docker-tests")).unwrap();
        dir
    }

    fn calls(dir: &Path) -> Vec<String> {
        std::fs::read_to_string(dir.join("calls"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_command_shapes() {
        let runner = ContainerTestRunner::new(&options(
            Path::new("/work/leapp"),
            Path::new("docker"),
            ContainerTestMode::Run,
        ));

        assert_eq!(runner.pull_command().display(), "docker pull fedora:latest");
        assert_eq!(
            runner.build_command().display(),
            "docker build -t leapp-tests /work/leapp/res/docker-tests"
        );
        assert_eq!(
            runner.run_command().display(),
            "docker run --rm -v /work/leapp:/payload:rw leapp-tests"
        );
    }

    #[tokio::test]
    async fn test_full_sequence_passes() {
        let source = source_tree();
        let bin = TempDir::new().unwrap();
        let engine = fake_engine(bin.path(), "none", 0);

        let report = ContainerTestRunner::new(&options(source.path(), &engine, ContainerTestMode::Run))
            .run()
            .await
            .unwrap();

        assert_eq!(report.status, TestStatus::Passed);
        let calls = calls(bin.path());
        assert_eq!(calls.len(), 3);
        assert!(calls[0].starts_with("pull "));
        assert!(calls[1].starts_with("build "));
        assert!(calls[2].starts_with("run "));
    }

    #[tokio::test]
    async fn test_pull_failure_stops_sequence() {
        let source = source_tree();
        let bin = TempDir::new().unwrap();
        let engine = fake_engine(bin.path(), "pull", 125);

        let err = ContainerTestRunner::new(&options(source.path(), &engine, ContainerTestMode::Run))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::ContainerPullFailure { exit_code: 125, .. }
        ));
        assert_eq!(calls(bin.path()).len(), 1);
    }

    #[tokio::test]
    async fn test_build_failure() {
        let source = source_tree();
        let bin = TempDir::new().unwrap();
        let engine = fake_engine(bin.path(), "build", 3);

        let err = ContainerTestRunner::new(&options(source.path(), &engine, ContainerTestMode::Run))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            DeployError::ContainerBuildFailure { exit_code: 3, .. }
        ));
        assert_eq!(calls(bin.path()).len(), 2);
    }

    #[tokio::test]
    async fn test_run_failure_is_test_failure() {
        let source = source_tree();
        let bin = TempDir::new().unwrap();
        let engine = fake_engine(bin.path(), "run", 5);

        let err = ContainerTestRunner::new(&options(source.path(), &engine, ContainerTestMode::Run))
            .run()
            .await
            .unwrap_err();

        assert_eq!(err.exit_code(), 5);
        assert!(matches!(err, DeployError::TestFailure { .. }));
    }

    #[tokio::test]
    async fn test_missing_build_context() {
        let source = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let engine = fake_engine(bin.path(), "none", 0);

        let err = ContainerTestRunner::new(&options(source.path(), &engine, ContainerTestMode::Run))
            .run()
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::MissingSourceFile { .. }));
        assert!(calls(bin.path()).is_empty());
    }

    #[tokio::test]
    async fn test_disabled_mode_skips_engine() {
        let source = TempDir::new().unwrap();
        let bin = TempDir::new().unwrap();
        let engine = fake_engine(bin.path(), "pull", 1);

        let report =
            ContainerTestRunner::new(&options(source.path(), &engine, ContainerTestMode::Disabled))
                .run()
                .await
                .unwrap();

        assert_eq!(report.status, TestStatus::Skipped);
        assert!(report.is_success());
        assert!(calls(bin.path()).is_empty());
    }
}
