//! Fixtures shared by the library and CLI test suites.

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use leapp_deploy::DeployOptions;
use leapp_deploy::constants::{dirs, filenames};
use tempfile::TempDir;

pub const LEAPP_CONF: &str = "[repositories]\nrepo_path=/etc/leapp/repos.d/\n";
pub const LOGGER_CONF: &str = "[loggers]\nkeys=root\n\n[logger_root]\nlevel=DEBUG\n";
pub const DOCKERFILE: &str = "FROM fedora:latest\nWORKDIR /payload\nCMD [\"make\", \"test\"]\n";

/// A throwaway source checkout with the files installation reads.
pub struct SourceTree {
    dir: TempDir,
}

impl SourceTree {
    /// Config files, requirements lists, and the container build context.
    pub fn new() -> Self {
        let tree = Self::empty();
        tree.write(&format!("{}/leapp/leapp.conf", dirs::ETC), LEAPP_CONF);
        tree.write(&format!("{}/leapp/logger.conf", dirs::ETC), LOGGER_CONF);
        tree.write(filenames::REQUIREMENTS, "");
        tree.write(filenames::TEST_REQUIREMENTS, "");
        tree.write(&format!("{}/Dockerfile", dirs::DOCKER_TESTS), DOCKERFILE);
        tree
    }

    pub fn empty() -> Self {
        Self {
            dir: TempDir::new().expect("create source tree"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` at `rel`, creating parents.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(&path, content).expect("write fixture");
        path
    }

    pub fn remove(&self, rel: &str) {
        std::fs::remove_file(self.dir.path().join(rel)).expect("remove fixture");
    }

    /// Write an executable `/bin/sh` script at `rel`.
    pub fn script(&self, rel: &str, body: &str) -> PathBuf {
        let path = self.write(rel, &format!("#!/bin/sh\n{body}\n"));
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("chmod script");
        path
    }
}

impl Default for SourceTree {
    fn default() -> Self {
        Self::new()
    }
}

/// An empty install prefix.
pub fn fresh_prefix() -> TempDir {
    TempDir::new().expect("create prefix")
}

/// Built-in options pointed at `source` and `prefix`, environment ignored.
pub fn options_for(source: &SourceTree, prefix: &Path) -> DeployOptions {
    DeployOptions {
        prefix: prefix.to_path_buf(),
        source_dir: source.path().to_path_buf(),
        ..DeployOptions::builtin()
    }
}

/// Permission bits of `path`.
pub fn mode(path: &Path) -> u32 {
    std::fs::metadata(path)
        .expect("stat")
        .permissions()
        .mode()
        & 0o7777
}

/// Root ignores permission bits, so denial tests can't run as root.
pub fn running_as_root() -> bool {
    // SAFETY: geteuid has no preconditions.
    unsafe { libc::geteuid() == 0 }
}
