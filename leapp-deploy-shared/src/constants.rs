//! Constants shared between the library and the CLI.

/// Application identity.
pub mod app {
    /// Name used for the `etc/<app>` and `var/lib/<app>` subtrees.
    pub const NAME: &str = "leapp";
}

/// Relative directory names under an install prefix or a source tree.
pub mod dirs {
    /// Configuration root: `<prefix>/etc`
    pub const ETC: &str = "etc";

    /// Persistent state root: `<prefix>/var/lib`
    pub const VAR_LIB: &str = "var/lib";

    /// Container test build context inside the source tree.
    pub const DOCKER_TESTS: &str = "res/docker-tests";
}

/// File names.
pub mod filenames {
    /// Audit store file under `var/lib/<app>`.
    pub const AUDIT_STORE: &str = "audit.db";

    /// Default configuration files installed under `etc/<app>`.
    pub const CONFIG_FILES: &[&str] = &["leapp.conf", "logger.conf"];

    /// Build-time dependency list.
    pub const REQUIREMENTS: &str = "requirements.txt";

    /// Test-time dependency list.
    pub const TEST_REQUIREMENTS: &str = "requirements-tests.txt";
}

/// Permission bits applied during provisioning.
///
/// None of these grant any access to "other".
pub mod modes {
    /// `etc/<app>`: owner rwx, group r-x
    pub const CONFIG_DIR: u32 = 0o750;

    /// Installed configuration files: owner rw, group r
    pub const CONFIG_FILE: u32 = 0o640;

    /// `var/lib/<app>`
    pub const STATE_DIR: u32 = 0o750;

    /// Audit store file
    pub const STORE_FILE: u32 = 0o600;

    /// Bits that must never be granted.
    pub const WORLD_BITS: u32 = 0o007;
}

/// Environment overrides.
pub mod envs {
    pub const PREFIX: &str = "LEAPP_PREFIX";
    pub const SOURCE_DIR: &str = "LEAPP_SOURCE_DIR";
    pub const CONTAINER_IMAGE: &str = "LEAPP_CONTAINER_IMAGE";
    pub const CONTAINER_ENGINE: &str = "LEAPP_CONTAINER_ENGINE";
}

/// Container test defaults.
pub mod container {
    /// Base image pulled before building the test image.
    pub const DEFAULT_IMAGE: &str = "fedora:latest";

    /// Tag given to the locally built test image.
    pub const TEST_TAG: &str = "leapp-tests";

    /// Container CLI used for pull/build/run.
    pub const DEFAULT_ENGINE: &str = "docker";

    /// Where the source tree is bind-mounted inside the test container.
    pub const MOUNT_PATH: &str = "/payload";
}
