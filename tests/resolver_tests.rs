//! Integration tests for override loading and configuration resolution.
//!
//! Drives the ConfigLoader through real temp directories, then checks the
//! resolved configuration and derived task paths end to end.

use std::path::Path;
use task_node_config::config::{
    ConfigLoader, ConfigPaths, StorageLocationConfig, TaskConfig, TaskConfigOverrides,
};
use task_node_config::period::Period;
use tempfile::TempDir;

/// Helper to create a ConfigLoader over specific temp directories.
fn load_with_dirs(
    project_dir: Option<std::path::PathBuf>,
    user_dir: Option<std::path::PathBuf>,
) -> ConfigLoader {
    let paths = ConfigPaths::with_dirs(project_dir, user_dir);
    ConfigLoader::load_with_paths(paths).expect("failed to load overrides")
}

/// Override file exercising every configurable field.
fn full_overrides_yaml() -> &'static str {
    r#"
baseDir: /data/node
baseTaskDir: /ssd/tasks
hadoopWorkingPath: hdfs://namenode/ingest
defaultRowFlushBoundary: 10000
defaultHadoopCoordinates:
  - org.apache.hadoop:hadoop-client:3.3.6
restoreTasksOnRestart: true
gracefulShutdownTimeout: PT30S
directoryLockTimeout: PT1M
shuffleDataLocations:
  - path: /mnt/shuffle
    maxSize: 5000000000
    freeSpacePercent: 10.0
ignoreTimestampSpecForDruidInputSource: true
"#
}

#[test]
fn defaults_only_resolution() {
    let temp = TempDir::new().unwrap();
    let loader = load_with_dirs(
        Some(temp.path().join("project")),
        Some(temp.path().join("user")),
    );

    let config = TaskConfig::resolve(loader.into_overrides(), "/tmp").unwrap();

    assert_eq!(config.hadoop_working_path(), "/tmp/druid-indexing");
    assert_eq!(config.default_row_flush_boundary(), 75_000);
    assert_eq!(
        config.default_hadoop_coordinates(),
        ["org.apache.hadoop:hadoop-client:2.8.5"]
    );
    assert_eq!(config.graceful_shutdown_timeout(), Period::from_minutes(5));
    assert_eq!(config.directory_lock_timeout(), Period::from_minutes(10));
}

#[test]
fn worked_example_var_druid() {
    let config = TaskConfig::resolve(
        TaskConfigOverrides {
            base_dir: Some("/var/druid".to_string()),
            ..Default::default()
        },
        "/tmp",
    )
    .unwrap();

    assert_eq!(
        config.base_task_dir(),
        Path::new("/var/druid/persistent/task")
    );
    assert_eq!(
        config.task_dir("task123"),
        Path::new("/var/druid/persistent/task/task123")
    );
    assert_eq!(
        config.task_lock_file("task123"),
        Path::new("/var/druid/persistent/task/task123/lock")
    );
}

#[test]
fn full_override_file_resolves_end_to_end() {
    let temp = TempDir::new().unwrap();
    let project_dir = temp.path().join("task-node");
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(project_dir.join("config.yaml"), full_overrides_yaml()).unwrap();

    let loader = load_with_dirs(Some(project_dir), Some(temp.path().join("user")));
    let config = TaskConfig::resolve(loader.into_overrides(), "/tmp").unwrap();

    assert_eq!(config.base_dir(), Path::new("/data/node"));
    assert_eq!(config.base_task_dir(), Path::new("/ssd/tasks"));
    assert_eq!(config.hadoop_working_path(), "hdfs://namenode/ingest");
    assert_eq!(config.default_row_flush_boundary(), 10_000);
    assert_eq!(
        config.default_hadoop_coordinates(),
        ["org.apache.hadoop:hadoop-client:3.3.6"]
    );
    assert!(config.restore_tasks_on_restart());
    assert_eq!(config.graceful_shutdown_timeout(), Period::from_secs(30));
    assert_eq!(config.directory_lock_timeout(), Period::from_minutes(1));
    assert_eq!(
        config.shuffle_data_locations(),
        [StorageLocationConfig {
            path: "/mnt/shuffle".into(),
            max_size: Some(5_000_000_000),
            free_space_percent: Some(10.0),
        }]
    );
    assert!(config.ignore_timestamp_spec_for_druid_input_source());

    // Derived layout follows the overridden base task dir
    assert_eq!(
        config.task_work_dir("ingest_0"),
        Path::new("/ssd/tasks/ingest_0/work")
    );
    assert_eq!(
        config.task_temp_dir("ingest_0"),
        Path::new("/ssd/tasks/ingest_0/temp")
    );
}

#[test]
fn malformed_duration_in_file_fails_resolution() {
    let temp = TempDir::new().unwrap();
    let project_dir = temp.path().join("task-node");
    std::fs::create_dir_all(&project_dir).unwrap();
    std::fs::write(
        project_dir.join("config.yaml"),
        "gracefulShutdownTimeout: soon\n",
    )
    .unwrap();

    let loader = load_with_dirs(Some(project_dir), Some(temp.path().join("user")));
    let err = TaskConfig::resolve(loader.into_overrides(), "/tmp").unwrap_err();
    assert_eq!(err.field, "gracefulShutdownTimeout");
}

#[test]
fn fields_resolve_independently() {
    // Overriding hadoopWorkingPath must not disturb the base_dir-derived
    // defaults, and vice versa.
    let config = TaskConfig::resolve(
        TaskConfigOverrides {
            hadoop_working_path: Some("hdfs://elsewhere/work".to_string()),
            ..Default::default()
        },
        "/tmp",
    )
    .unwrap();
    assert_eq!(config.base_task_dir(), Path::new("/tmp/persistent/task"));
    assert_eq!(
        config.shuffle_data_locations(),
        [StorageLocationConfig::unconstrained(
            "/tmp/intermediary-segments"
        )]
    );

    let config = TaskConfig::resolve(
        TaskConfigOverrides {
            base_dir: Some("/var/druid".to_string()),
            base_task_dir: Some("/ssd/tasks".to_string()),
            shuffle_data_locations: Some(vec![StorageLocationConfig::unconstrained("/mnt/s")]),
            ..Default::default()
        },
        "/tmp",
    )
    .unwrap();
    assert_eq!(config.hadoop_working_path(), "/tmp/druid-indexing");
}

#[test]
fn explicit_file_loader() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("node.yaml");
    std::fs::write(&file, "baseDir: /data/explicit\n").unwrap();

    let loader = ConfigLoader::load_from_file(&file).expect("explicit file should load");
    assert_eq!(loader.config_path(), Some(file.as_path()));
    assert_eq!(
        loader.overrides().base_dir.as_deref(),
        Some("/data/explicit")
    );

    let missing = temp.path().join("nope.yaml");
    assert!(ConfigLoader::load_from_file(&missing).is_err());
}

#[test]
fn resolved_config_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TaskConfig>();
}
