//! Effective node configuration and task directory layout.
//!
//! [`TaskConfig`] is built exactly once at process startup from the decoded
//! overrides, then held as read-only state for the process lifetime. It
//! performs no I/O: nothing here creates directories, takes locks, or
//! checks that paths are writable. Workers read it concurrently without
//! synchronization.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::types::{
    StorageLocationConfig, TaskConfigOverrides, BASE_TASK_DIR_SUBPATH,
    DEFAULT_DIRECTORY_LOCK_TIMEOUT, DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT,
    DEFAULT_HADOOP_COORDINATES, DEFAULT_HADOOP_WORKING_PATH, DEFAULT_ROW_FLUSH_BOUNDARY,
    SHUFFLE_DATA_SUBPATH,
};
use crate::error::{ConfigParseError, ConfigResult};
use crate::period::Period;

/// Resolved, immutable node configuration.
///
/// Constructed by [`TaskConfig::resolve`]; every field is either the
/// supplied override or its documented default. Accessors borrow; the four
/// task-path operations derive fresh paths from `base_task_dir` and an
/// opaque task identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskConfig {
    base_dir: PathBuf,
    base_task_dir: PathBuf,
    hadoop_working_path: String,
    default_row_flush_boundary: u32,
    default_hadoop_coordinates: Vec<String>,
    restore_tasks_on_restart: bool,
    graceful_shutdown_timeout: Period,
    directory_lock_timeout: Period,
    shuffle_data_locations: Vec<StorageLocationConfig>,
    ignore_timestamp_spec_for_druid_input_source: bool,
}

impl TaskConfig {
    /// Resolve overrides into an effective configuration.
    ///
    /// `tmp_dir` is the process-wide temporary directory, passed in
    /// explicitly so that construction stays deterministic and testable; it
    /// becomes `base_dir` when no override is supplied. `base_dir` is
    /// resolved first because the defaults for `base_task_dir` and the
    /// shuffle location are rooted at it.
    ///
    /// Fails only when a supplied duration or flush-boundary value does not
    /// parse; absent fields always resolve cleanly.
    pub fn resolve(
        overrides: TaskConfigOverrides,
        tmp_dir: impl Into<PathBuf>,
    ) -> ConfigResult<TaskConfig> {
        let base_dir = overrides
            .base_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| tmp_dir.into());

        let base_task_dir = overrides
            .base_task_dir
            .map(PathBuf::from)
            .unwrap_or_else(|| base_dir.join(BASE_TASK_DIR_SUBPATH));

        // Usually on HDFS or similar, so the default is not rooted at the
        // local base_dir.
        let hadoop_working_path = overrides
            .hadoop_working_path
            .unwrap_or_else(|| DEFAULT_HADOOP_WORKING_PATH.to_string());

        let default_row_flush_boundary = match overrides.default_row_flush_boundary {
            Some(raw) => parse_flush_boundary(&raw)?,
            None => DEFAULT_ROW_FLUSH_BOUNDARY,
        };

        let default_hadoop_coordinates = overrides.default_hadoop_coordinates.unwrap_or_else(|| {
            DEFAULT_HADOOP_COORDINATES
                .iter()
                .map(|s| s.to_string())
                .collect()
        });

        let graceful_shutdown_timeout = parse_period_override(
            "gracefulShutdownTimeout",
            overrides.graceful_shutdown_timeout,
            DEFAULT_GRACEFUL_SHUTDOWN_TIMEOUT,
        )?;

        let directory_lock_timeout = parse_period_override(
            "directoryLockTimeout",
            overrides.directory_lock_timeout,
            DEFAULT_DIRECTORY_LOCK_TIMEOUT,
        )?;

        let shuffle_data_locations = overrides.shuffle_data_locations.unwrap_or_else(|| {
            vec![StorageLocationConfig::unconstrained(
                base_dir.join(SHUFFLE_DATA_SUBPATH),
            )]
        });

        Ok(TaskConfig {
            base_dir,
            base_task_dir,
            hadoop_working_path,
            default_row_flush_boundary,
            default_hadoop_coordinates,
            restore_tasks_on_restart: overrides.restore_tasks_on_restart,
            graceful_shutdown_timeout,
            directory_lock_timeout,
            shuffle_data_locations,
            ignore_timestamp_spec_for_druid_input_source: overrides
                .ignore_timestamp_spec_for_druid_input_source,
        })
    }

    // Task directory layout. All four are pure derivations from
    // base_task_dir and the task identifier; work/temp/lock are always
    // children of task_dir.

    /// Directory holding everything for one task.
    pub fn task_dir(&self, task_id: &str) -> PathBuf {
        self.base_task_dir.join(task_id)
    }

    /// Where a task stages its working files.
    pub fn task_work_dir(&self, task_id: &str) -> PathBuf {
        self.task_dir(task_id).join("work")
    }

    /// Where a task keeps temporary files.
    pub fn task_temp_dir(&self, task_id: &str) -> PathBuf {
        self.task_dir(task_id).join("temp")
    }

    /// Lock file guarding exclusive access to the task directory.
    pub fn task_lock_file(&self, task_id: &str) -> PathBuf {
        self.task_dir(task_id).join("lock")
    }

    // Accessors

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn base_task_dir(&self) -> &Path {
        &self.base_task_dir
    }

    pub fn hadoop_working_path(&self) -> &str {
        &self.hadoop_working_path
    }

    pub fn default_row_flush_boundary(&self) -> u32 {
        self.default_row_flush_boundary
    }

    pub fn default_hadoop_coordinates(&self) -> &[String] {
        &self.default_hadoop_coordinates
    }

    pub fn restore_tasks_on_restart(&self) -> bool {
        self.restore_tasks_on_restart
    }

    /// Maximum wait for in-flight tasks before forcible termination during
    /// shutdown. Policy data for the shutdown path, not behavior here.
    pub fn graceful_shutdown_timeout(&self) -> Period {
        self.graceful_shutdown_timeout
    }

    /// Maximum wait when acquiring an exclusive task directory lock.
    pub fn directory_lock_timeout(&self) -> Period {
        self.directory_lock_timeout
    }

    pub fn shuffle_data_locations(&self) -> &[StorageLocationConfig] {
        &self.shuffle_data_locations
    }

    pub fn ignore_timestamp_spec_for_druid_input_source(&self) -> bool {
        self.ignore_timestamp_spec_for_druid_input_source
    }
}

fn parse_flush_boundary(raw: &str) -> ConfigResult<u32> {
    let parsed: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ConfigParseError::bad_integer("defaultRowFlushBoundary", raw))?;
    if parsed <= 0 {
        return Err(ConfigParseError::bad_integer("defaultRowFlushBoundary", raw));
    }
    u32::try_from(parsed)
        .map_err(|_| ConfigParseError::bad_integer("defaultRowFlushBoundary", raw))
}

fn parse_period_override(
    field: &'static str,
    raw: Option<String>,
    default: Period,
) -> ConfigResult<Period> {
    match raw {
        Some(raw) => raw
            .parse()
            .map_err(|e| ConfigParseError::new(field, raw, format!("not an ISO-8601 period: {e}"))),
        None => Ok(default),
    }
}
