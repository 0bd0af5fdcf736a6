#![allow(dead_code)]

use assert_cmd::Command;
use leapp_deploy::constants::envs;
use leapp_deploy_test_utils::{self as utils, SourceTree};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

pub struct TestContext {
    pub cmd: Command,
    pub source: SourceTree,
    pub prefix: TempDir,
}

impl TestContext {
    /// Another invocation against the same source tree and prefix.
    pub fn new_cmd(&self) -> Command {
        command(self.source.path(), self.prefix.path())
    }

    pub fn prefix_path(&self, rel: &str) -> PathBuf {
        self.prefix.path().join(rel)
    }

    /// Write a `--config` file into the source tree and return its path.
    pub fn config(&self, yaml: &str) -> PathBuf {
        self.source.write("deploy.yaml", yaml)
    }
}

fn command(source: &Path, prefix: &Path) -> Command {
    let bin_path = env!("CARGO_BIN_EXE_leapp-deploy");
    let mut cmd = Command::new(bin_path);
    cmd.timeout(Duration::from_secs(60));
    // The caller's environment must not leak into the run
    for key in [
        envs::PREFIX,
        envs::SOURCE_DIR,
        envs::CONTAINER_IMAGE,
        envs::CONTAINER_ENGINE,
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd.arg("--prefix").arg(prefix);
    cmd.arg("--source-dir").arg(source);
    cmd
}

/// Fresh source tree and empty prefix.
pub fn leapp_deploy() -> TestContext {
    let source = SourceTree::new();
    let prefix = utils::fresh_prefix();
    let cmd = command(source.path(), prefix.path());
    TestContext {
        cmd,
        source,
        prefix,
    }
}
