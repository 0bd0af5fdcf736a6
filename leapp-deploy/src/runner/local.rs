//! Local test pass: style check, then coverage-instrumented tests.

use std::path::PathBuf;

use leapp_deploy_shared::errors::{DeployError, DeployResult};

use super::process;
use super::TestReport;
use crate::deploy::options::{DeployOptions, LocalTestOptions};

#[derive(Clone, Debug)]
pub struct LocalTestRunner {
    tests: LocalTestOptions,
    working_dir: PathBuf,
}

impl LocalTestRunner {
    pub fn new(options: &DeployOptions) -> Self {
        Self {
            tests: options.local_tests.clone(),
            working_dir: options.source_dir.clone(),
        }
    }

    /// Run both passes. The first failing pass's exit code is returned
    /// unchanged as [`DeployError::TestFailure`].
    pub async fn run(&self) -> DeployResult<TestReport> {
        tracing::info!(working_dir = %self.working_dir.display(), "Running local tests");

        for (stage, spec) in [
            ("style check", &self.tests.style_check),
            ("coverage tests", &self.tests.coverage_tests),
        ] {
            let code = process::run(spec, &self.working_dir).await?;
            if code != 0 {
                tracing::error!(stage, exit_code = code, "Local test stage failed");
                return Err(DeployError::TestFailure { exit_code: code });
            }
        }

        Ok(TestReport::passed())
    }
}
