//! Override loading with tier-based precedence.
//!
//! Overrides are collected from up to three places and coalesced field by
//! field before resolution:
//! 1. Project file `$CWD/task-node/config.yaml`
//! 2. User file `~/.task-node/config.yaml`
//! 3. `TASK_NODE_*` environment variables (highest priority)
//!
//! `TASK_NODE_CONFIG_PATH` short-circuits discovery and names the override
//! file directly. Documented defaults are not a tier here: they live in
//! [`TaskConfig::resolve`], which applies them to whatever fields remain
//! absent after the overlay.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::resolver::TaskConfig;
use crate::config::types::TaskConfigOverrides;

/// Override tier priority (lowest to highest).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigTier {
    /// Project-level file ($CWD/task-node/)
    Project = 0,
    /// User-level file (~/.task-node/)
    User = 1,
    /// Environment variables
    Environment = 2,
}

impl std::fmt::Display for ConfigTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigTier::Project => write!(f, "project"),
            ConfigTier::User => write!(f, "user"),
            ConfigTier::Environment => write!(f, "environment"),
        }
    }
}

/// Directories searched for override files.
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project-level config directory
    pub project_dir: Option<PathBuf>,
    /// User-level config directory
    pub user_dir: Option<PathBuf>,
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::discover()
    }
}

impl ConfigPaths {
    /// Discover config directories from environment and defaults.
    pub fn discover() -> Self {
        // User dir: TASK_NODE_USER_DIR or ~/.task-node
        let user_dir = std::env::var("TASK_NODE_USER_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".task-node")));

        // Project dir: TASK_NODE_PROJECT_DIR or $CWD/task-node
        let project_dir = std::env::var("TASK_NODE_PROJECT_DIR")
            .ok()
            .map(PathBuf::from)
            .or_else(|| Some(PathBuf::from("task-node")));

        Self {
            project_dir,
            user_dir,
        }
    }

    /// Create paths with explicit directories.
    pub fn with_dirs(project_dir: Option<PathBuf>, user_dir: Option<PathBuf>) -> Self {
        Self {
            project_dir,
            user_dir,
        }
    }
}

/// Loads and overlays override tiers.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Directories the loader searched
    pub paths: ConfigPaths,
    /// Overlaid overrides from all tiers
    overrides: TaskConfigOverrides,
    /// Path of the file the overrides came from (if any)
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Load overrides from all tiers with proper precedence.
    pub fn load() -> Result<Self> {
        Self::load_with_paths(ConfigPaths::discover())
    }

    /// Load overrides from one explicit file. Environment variables still
    /// apply on top; the file must exist.
    pub fn load_from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let overrides = read_overrides_file(&path)?
            .with_context(|| format!("config file not found: {}", path.display()))?;
        Ok(Self {
            paths: ConfigPaths::with_dirs(None, None),
            overrides: overrides.overlay(env_overrides()),
            config_path: Some(path),
        })
    }

    /// Load overrides with explicit search paths.
    pub fn load_with_paths(paths: ConfigPaths) -> Result<Self> {
        // Explicit config path overrides discovery, but env vars still win.
        if let Ok(explicit_path) = std::env::var("TASK_NODE_CONFIG_PATH") {
            return Self::load_from_file(explicit_path);
        }

        let mut overrides = TaskConfigOverrides::default();
        let mut config_path = None;

        // Tier 1: project file
        if let Some(ref project_dir) = paths.project_dir {
            let file = project_dir.join("config.yaml");
            if let Some(loaded) = read_overrides_file(&file)? {
                debug!(path = %file.display(), tier = %ConfigTier::Project, "loaded overrides");
                overrides = overrides.overlay(loaded);
                config_path = Some(file);
            }
        }

        // Tier 2: user file
        if let Some(ref user_dir) = paths.user_dir {
            let file = user_dir.join("config.yaml");
            if let Some(loaded) = read_overrides_file(&file)? {
                debug!(path = %file.display(), tier = %ConfigTier::User, "loaded overrides");
                overrides = overrides.overlay(loaded);
                if config_path.is_none() {
                    config_path = Some(file);
                }
            }
        }

        // Tier 3: environment variables
        overrides = overrides.overlay(env_overrides());

        Ok(Self {
            paths,
            overrides,
            config_path,
        })
    }

    /// The overlaid overrides, ready for [`TaskConfig::resolve`].
    pub fn overrides(&self) -> &TaskConfigOverrides {
        &self.overrides
    }

    /// Consume the loader and return the overrides.
    pub fn into_overrides(self) -> TaskConfigOverrides {
        self.overrides
    }

    /// Resolve against the real process temp directory. This is the only
    /// place the ambient temp-dir value is read; the resolver itself takes
    /// it as a parameter.
    pub fn resolve(&self) -> Result<TaskConfig> {
        let config = TaskConfig::resolve(self.overrides.clone(), std::env::temp_dir())?;
        Ok(config)
    }

    /// Path of the override file that was used, if any.
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }
}

/// Read and decode an override file. `Ok(None)` when the file does not
/// exist; a present but unreadable or malformed file is an error.
fn read_overrides_file(path: &Path) -> Result<Option<TaskConfigOverrides>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let overrides = serde_yaml::from_str(&content)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(Some(overrides))
}

/// Build an override record from `TASK_NODE_*` environment variables.
fn env_overrides() -> TaskConfigOverrides {
    let var = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());

    TaskConfigOverrides {
        base_dir: var("TASK_NODE_BASE_DIR"),
        base_task_dir: var("TASK_NODE_BASE_TASK_DIR"),
        hadoop_working_path: var("TASK_NODE_HADOOP_WORKING_PATH"),
        default_row_flush_boundary: var("TASK_NODE_DEFAULT_ROW_FLUSH_BOUNDARY"),
        default_hadoop_coordinates: None,
        restore_tasks_on_restart: env_flag("TASK_NODE_RESTORE_TASKS_ON_RESTART"),
        graceful_shutdown_timeout: var("TASK_NODE_GRACEFUL_SHUTDOWN_TIMEOUT"),
        directory_lock_timeout: var("TASK_NODE_DIRECTORY_LOCK_TIMEOUT"),
        shuffle_data_locations: None,
        ignore_timestamp_spec_for_druid_input_source: env_flag(
            "TASK_NODE_IGNORE_TIMESTAMP_SPEC_FOR_DRUID_INPUT_SOURCE",
        ),
    }
}

fn env_flag(name: &str) -> bool {
    matches!(
        std::env::var(name).as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_paths_discover() {
        let paths = ConfigPaths::discover();
        assert!(paths.project_dir.is_some());
        // user_dir may or may not exist depending on environment
    }

    #[test]
    fn test_load_with_no_files() {
        let temp = TempDir::new().unwrap();
        let paths = ConfigPaths::with_dirs(
            Some(temp.path().join("project")),
            Some(temp.path().join("user")),
        );

        let loader = ConfigLoader::load_with_paths(paths).unwrap();
        assert_eq!(*loader.overrides(), TaskConfigOverrides::default());
        assert!(loader.config_path().is_none());
    }

    #[test]
    fn test_project_file_loaded() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("task-node");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(
            project_dir.join("config.yaml"),
            "baseDir: /var/druid\ndirectoryLockTimeout: PT2M\n",
        )
        .unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(temp.path().join("user")));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();

        assert_eq!(loader.overrides().base_dir.as_deref(), Some("/var/druid"));
        assert_eq!(
            loader.overrides().directory_lock_timeout.as_deref(),
            Some("PT2M")
        );
        assert!(loader.config_path().is_some());
    }

    #[test]
    fn test_user_file_overrides_project() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("task-node");
        let user_dir = temp.path().join("user");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::create_dir_all(&user_dir).unwrap();

        std::fs::write(
            project_dir.join("config.yaml"),
            "baseDir: /var/project\nhadoopWorkingPath: /hdfs/project\n",
        )
        .unwrap();
        std::fs::write(user_dir.join("config.yaml"), "baseDir: /var/user\n").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(user_dir));
        let loader = ConfigLoader::load_with_paths(paths).unwrap();

        // baseDir from user, hadoopWorkingPath still from project
        assert_eq!(loader.overrides().base_dir.as_deref(), Some("/var/user"));
        assert_eq!(
            loader.overrides().hadoop_working_path.as_deref(),
            Some("/hdfs/project")
        );
    }

    #[test]
    fn test_broken_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let project_dir = temp.path().join("task-node");
        std::fs::create_dir_all(&project_dir).unwrap();
        std::fs::write(project_dir.join("config.yaml"), "baseDir: [not: a: string\n").unwrap();

        let paths = ConfigPaths::with_dirs(Some(project_dir), Some(temp.path().join("user")));
        assert!(ConfigLoader::load_with_paths(paths).is_err());
    }
}
