//! External collaborators: dependency installer and the two test paths.
//!
//! Each runner waits for its children to finish and turns a non-zero exit
//! into a typed error carrying the child's code.

pub mod container;
pub mod deps;
pub mod local;
pub mod process;

use serde::Serialize;

pub use container::{ContainerTestRunner, TestEnvironmentSpec};
pub use deps::{DependencyInstaller, Requirements};
pub use local::LocalTestRunner;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Passed,
    Skipped,
}

/// Outcome of a test path that did not fail.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TestReport {
    pub status: TestStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl TestReport {
    pub fn passed() -> Self {
        Self {
            status: TestStatus::Passed,
            reason: None,
        }
    }

    pub fn skipped(reason: impl Into<String>) -> Self {
        Self {
            status: TestStatus::Skipped,
            reason: Some(reason.into()),
        }
    }

    /// Skipped runs count as success for exit status purposes.
    pub fn is_success(&self) -> bool {
        matches!(self.status, TestStatus::Passed | TestStatus::Skipped)
    }
}
