//! Configuration for a deployment run.
//!
//! One [`DeployOptions`] is built per invocation and passed by reference into
//! every step. Sources, lowest to highest precedence: built-in defaults, an
//! optional YAML file, `LEAPP_*` environment variables, CLI flags.

use std::path::{Path, PathBuf};

use leapp_deploy_shared::constants::{container, envs, filenames, modes};
use leapp_deploy_shared::errors::{DeployError, DeployResult};
use serde::{Deserialize, Serialize};

// ============================================================================
// External command description
// ============================================================================

/// A program plus its arguments, run with the source tree as working dir.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Shell-like rendering for logs.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

// ============================================================================
// Step options
// ============================================================================

/// Commands run by the local test pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalTestOptions {
    /// Style check, run first.
    pub style_check: CommandSpec,
    /// Coverage-instrumented test pass, run only after the style check passed.
    pub coverage_tests: CommandSpec,
}

impl Default for LocalTestOptions {
    fn default() -> Self {
        Self {
            style_check: CommandSpec::new("pylint", ["leapp"]),
            coverage_tests: CommandSpec::new(
                "py.test",
                [
                    "--flake8",
                    "--cov-report",
                    "term-missing",
                    "--cov=leapp",
                    "tests/scripts",
                ],
            ),
        }
    }
}

/// Dependency installer invocation (`<installer> install -r <file>`).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyOptions {
    pub installer: String,
    pub requirements: String,
    pub test_requirements: String,
}

impl Default for DependencyOptions {
    fn default() -> Self {
        Self {
            installer: "pip".to_string(),
            requirements: filenames::REQUIREMENTS.to_string(),
            test_requirements: filenames::TEST_REQUIREMENTS.to_string(),
        }
    }
}

/// Which container test variant ships.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerTestMode {
    /// Pull, build and run the test image.
    #[default]
    Run,
    /// Placeholder: report success without touching the container engine.
    Disabled,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ContainerOptions {
    /// Base image reference pulled before the build.
    pub image: String,
    /// Tag for the locally built test image.
    pub test_tag: String,
    /// Container CLI program (docker, podman).
    pub engine: String,
    /// Bind-mount target of the source tree inside the container.
    pub mount_path: String,
    pub mode: ContainerTestMode,
}

impl Default for ContainerOptions {
    fn default() -> Self {
        Self {
            image: container::DEFAULT_IMAGE.to_string(),
            test_tag: container::TEST_TAG.to_string(),
            engine: container::DEFAULT_ENGINE.to_string(),
            mount_path: container::MOUNT_PATH.to_string(),
            mode: ContainerTestMode::Run,
        }
    }
}

// ============================================================================
// Deploy options
// ============================================================================

/// Configuration for a deployment run.
///
/// Users can create it with defaults and modify fields as needed.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default = "DeployOptions::builtin")]
pub struct DeployOptions {
    /// InstallPrefix. Everything provisioned lands below it.
    pub prefix: PathBuf,
    /// Working tree holding `etc/leapp/*`, requirements and test sources.
    pub source_dir: PathBuf,
    /// Configuration file names copied from `<source_dir>/etc/leapp`.
    pub config_files: Vec<String>,
    pub config_dir_mode: u32,
    pub config_file_mode: u32,
    pub state_dir_mode: u32,
    pub store_file_mode: u32,
    pub container: ContainerOptions,
    pub local_tests: LocalTestOptions,
    pub dependencies: DependencyOptions,
}

impl Default for DeployOptions {
    /// Built-in defaults with `LEAPP_*` environment overrides applied.
    fn default() -> Self {
        let mut options = Self::builtin();
        options.apply_env();
        options
    }
}

impl DeployOptions {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            prefix: PathBuf::from("/"),
            source_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            config_files: filenames::CONFIG_FILES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            config_dir_mode: modes::CONFIG_DIR,
            config_file_mode: modes::CONFIG_FILE,
            state_dir_mode: modes::STATE_DIR,
            store_file_mode: modes::STORE_FILE,
            container: ContainerOptions::default(),
            local_tests: LocalTestOptions::default(),
            dependencies: DependencyOptions::default(),
        }
    }

    /// Load a YAML override file; unspecified keys keep built-in values.
    /// Environment overrides are applied on top.
    pub fn from_file(path: &Path) -> DeployResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DeployError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut options: Self = serde_yaml::from_str(&content).map_err(|e| {
            DeployError::Config(format!("invalid config {}: {}", path.display(), e))
        })?;
        options.apply_env();
        Ok(options)
    }

    /// Apply `LEAPP_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup (tests inject a map here).
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(prefix) = non_empty(envs::PREFIX) {
            self.prefix = PathBuf::from(prefix);
        }
        if let Some(source_dir) = non_empty(envs::SOURCE_DIR) {
            self.source_dir = PathBuf::from(source_dir);
        }
        if let Some(image) = non_empty(envs::CONTAINER_IMAGE) {
            self.container.image = image;
        }
        if let Some(engine) = non_empty(envs::CONTAINER_ENGINE) {
            self.container.engine = engine;
        }
    }

    /// Check preconditions once, before any step touches the filesystem.
    pub fn validate(&self) -> DeployResult<()> {
        if !self.prefix.is_absolute() {
            return Err(DeployError::Config(format!(
                "install prefix must be an absolute path, got: {}",
                self.prefix.display()
            )));
        }

        for (name, mode) in [
            ("config_dir_mode", self.config_dir_mode),
            ("config_file_mode", self.config_file_mode),
            ("state_dir_mode", self.state_dir_mode),
            ("store_file_mode", self.store_file_mode),
        ] {
            validate_mode(name, mode)?;
        }

        if self.config_files.is_empty() {
            return Err(DeployError::Config(
                "at least one configuration file must be listed".into(),
            ));
        }
        for name in &self.config_files {
            if !is_plain_file_name(name) {
                return Err(DeployError::Config(format!(
                    "configuration file name must be a plain file name, got: {name:?}"
                )));
            }
        }

        if self.container.image.trim().is_empty() {
            return Err(DeployError::Config("container image must not be empty".into()));
        }
        if self.container.engine.trim().is_empty() {
            return Err(DeployError::Config("container engine must not be empty".into()));
        }
        if !self.container.mount_path.starts_with('/') {
            return Err(DeployError::Config(format!(
                "container mount path must be absolute, got: {}",
                self.container.mount_path
            )));
        }

        Ok(())
    }
}

fn validate_mode(name: &str, mode: u32) -> DeployResult<()> {
    if mode > 0o777 {
        return Err(DeployError::Config(format!(
            "{name} {mode:o} has bits outside 0777"
        )));
    }
    if mode & modes::WORLD_BITS != 0 {
        return Err(DeployError::Config(format!(
            "{name} {mode:04o} grants world access"
        )));
    }
    Ok(())
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains('/') && !name.contains('\0')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn absolute_options() -> DeployOptions {
        DeployOptions {
            prefix: PathBuf::from("/tmp/prefix"),
            ..DeployOptions::builtin()
        }
    }

    #[test]
    fn test_builtin_defaults() {
        let options = DeployOptions::builtin();
        assert_eq!(options.prefix, PathBuf::from("/"));
        assert_eq!(options.config_files, vec!["leapp.conf", "logger.conf"]);
        assert_eq!(options.config_file_mode, 0o640);
        assert_eq!(options.container.image, "fedora:latest");
        assert_eq!(options.container.mode, ContainerTestMode::Run);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("LEAPP_PREFIX", "/opt/stage"),
            ("LEAPP_CONTAINER_IMAGE", "centos:7"),
            ("LEAPP_CONTAINER_ENGINE", ""),
        ]);
        let mut options = DeployOptions::builtin();
        options.apply_env_with(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(options.prefix, PathBuf::from("/opt/stage"));
        assert_eq!(options.container.image, "centos:7");
        // Empty values are ignored
        assert_eq!(options.container.engine, "docker");
    }

    #[test]
    fn test_relative_prefix_rejected() {
        let options = DeployOptions {
            prefix: PathBuf::from("stage"),
            ..DeployOptions::builtin()
        };
        let err = options.validate().unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn test_world_readable_mode_rejected() {
        let options = DeployOptions {
            config_file_mode: 0o644,
            ..absolute_options()
        };
        let err = options.validate().unwrap_err();
        assert!(err.to_string().contains("world"));
    }

    #[test]
    fn test_mode_out_of_range_rejected() {
        let options = DeployOptions {
            config_dir_mode: 0o4750,
            ..absolute_options()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_config_file_names_must_be_plain() {
        for bad in ["", "..", "../passwd", "sub/leapp.conf"] {
            let options = DeployOptions {
                config_files: vec![bad.to_string()],
                ..absolute_options()
            };
            assert!(options.validate().is_err(), "{bad:?} should be rejected");
        }

        let empty = DeployOptions {
            config_files: vec![],
            ..absolute_options()
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_from_file_partial_override() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("deploy.yaml");
        std::fs::write(
            &path,
            "prefix: /srv/leapp\nconfig_file_mode: 384\ncontainer:\n  mode: disabled\n",
        )
        .unwrap();

        let options = DeployOptions::from_file(&path).unwrap();
        assert_eq!(options.container.mode, ContainerTestMode::Disabled);
        assert_eq!(options.config_file_mode, 0o600);
        // Untouched keys keep defaults
        assert_eq!(options.container.test_tag, "leapp-tests");
        assert_eq!(options.config_files.len(), 2);
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("deploy.yaml");
        std::fs::write(&path, "prefix: [unterminated").unwrap();

        let err = DeployOptions::from_file(&path).unwrap_err();
        assert!(matches!(err, DeployError::Config(_)));
    }

    #[test]
    fn test_command_spec_display() {
        assert_eq!(CommandSpec::new("pylint", ["leapp"]).display(), "pylint leapp");
        assert_eq!(
            CommandSpec::new("true", Vec::<String>::new()).display(),
            "true"
        );
    }
}
