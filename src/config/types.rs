//! Configuration override types and documented defaults.
//!
//! [`TaskConfigOverrides`] is the decoded form of the node's configuration
//! document: every field is independently optional, and an absent field
//! means "use the documented default" at resolution time. Field names on
//! the wire are camelCase.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

use crate::period::Period;

/// Default working path for distributed ingestion jobs. Usually on HDFS or
/// similar, so it is not rooted at the local temp directory.
pub const DEFAULT_HADOOP_WORKING_PATH: &str = "/tmp/druid-indexing";

/// Default number of rows buffered before a downstream flush is triggered.
pub const DEFAULT_ROW_FLUSH_BOUNDARY: u32 = 75_000;

/// Default client-library coordinate for distributed ingestion jobs.
pub const DEFAULT_HADOOP_COORDINATES: &[&str] = &["org.apache.hadoop:hadoop-client:2.8.5"];

/// Default maximum wait for in-flight tasks during shutdown (PT5M).
pub const DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT: Period = Period::from_minutes(5);

/// Default maximum wait when acquiring a task directory lock (PT10M).
pub const DEFAULT_DIRECTORY_LOCK_TIMEOUT: Period = Period::from_minutes(10);

/// Subpath under the base directory holding per-task directories.
pub const BASE_TASK_DIR_SUBPATH: &str = "persistent/task";

/// Subpath under the base directory for intermediate shuffle output.
pub const SHUFFLE_DATA_SUBPATH: &str = "intermediary-segments";

/// A storage location for staging intermediate shuffle data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageLocationConfig {
    /// Directory the location writes under.
    pub path: PathBuf,

    /// Capacity cap in bytes. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,

    /// Minimum free-space percentage to keep on the volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_space_percent: Option<f64>,
}

impl StorageLocationConfig {
    /// Location at `path` with no size or free-space constraints.
    pub fn unconstrained(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_size: None,
            free_space_percent: None,
        }
    }
}

/// Optional override values for the node configuration, as decoded from the
/// configuration document. Resolution into an effective configuration
/// happens in [`TaskConfig::resolve`](crate::config::TaskConfig::resolve).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TaskConfigOverrides {
    /// Base directory for all locally staged data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<String>,

    /// Root of the per-task directory tree. Defaults to
    /// `<baseDir>/persistent/task`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_task_dir: Option<String>,

    /// Working path for distributed ingestion jobs. Independent of
    /// `baseDir`; see [`DEFAULT_HADOOP_WORKING_PATH`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hadoop_working_path: Option<String>,

    /// Row count that triggers a flush downstream. Accepts an integer or an
    /// integer string; validated as positive at resolution time.
    #[serde(
        default,
        deserialize_with = "deserialize_opt_scalar",
        skip_serializing_if = "Option::is_none"
    )]
    pub default_row_flush_boundary: Option<String>,

    /// Artifact coordinates of the client library to load for distributed
    /// ingestion jobs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_hadoop_coordinates: Option<Vec<String>>,

    /// Whether to restore persisted tasks after a node restart. Required by
    /// the wire contract; carried verbatim, never default-substituted.
    #[serde(default)]
    pub restore_tasks_on_restart: bool,

    /// ISO-8601 period string, e.g. "PT5M".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graceful_shutdown_timeout: Option<String>,

    /// ISO-8601 period string, e.g. "PT10M".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory_lock_timeout: Option<String>,

    /// Storage locations for intermediate shuffle output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_data_locations: Option<Vec<StorageLocationConfig>>,

    /// Required by the wire contract; carried verbatim like
    /// `restoreTasksOnRestart`.
    #[serde(default)]
    pub ignore_timestamp_spec_for_druid_input_source: bool,
}

impl TaskConfigOverrides {
    /// Overlay `higher` on top of `self`, field by field. A field present in
    /// `higher` wins; sequences are replaced entirely, never concatenated.
    /// The two required booleans OR across tiers: once any tier enables one
    /// it stays enabled.
    pub fn overlay(self, higher: TaskConfigOverrides) -> TaskConfigOverrides {
        TaskConfigOverrides {
            base_dir: higher.base_dir.or(self.base_dir),
            base_task_dir: higher.base_task_dir.or(self.base_task_dir),
            hadoop_working_path: higher.hadoop_working_path.or(self.hadoop_working_path),
            default_row_flush_boundary: higher
                .default_row_flush_boundary
                .or(self.default_row_flush_boundary),
            default_hadoop_coordinates: higher
                .default_hadoop_coordinates
                .or(self.default_hadoop_coordinates),
            restore_tasks_on_restart: higher.restore_tasks_on_restart
                || self.restore_tasks_on_restart,
            graceful_shutdown_timeout: higher
                .graceful_shutdown_timeout
                .or(self.graceful_shutdown_timeout),
            directory_lock_timeout: higher.directory_lock_timeout.or(self.directory_lock_timeout),
            shuffle_data_locations: higher.shuffle_data_locations.or(self.shuffle_data_locations),
            ignore_timestamp_spec_for_druid_input_source: higher
                .ignore_timestamp_spec_for_druid_input_source
                || self.ignore_timestamp_spec_for_druid_input_source,
        }
    }
}

/// Accepts an integer or a string and keeps its string form, so that
/// semantic validation (positivity, range) happens in one place at
/// resolution time with a proper field-level error.
fn deserialize_opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let value: Option<Value> = Deserialize::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(other) => Err(D::Error::custom(format!(
            "expected an integer or string, got {other}"
        ))),
    }
}
