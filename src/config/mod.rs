//! Node configuration resolution.
//!
//! Overrides are collected from files and environment variables by
//! [`ConfigLoader`], coalesced field by field, and resolved against
//! documented defaults into an immutable [`TaskConfig`]. Two defaults are composed
//! rather than literal: `baseTaskDir` and the single default shuffle
//! location are rooted at the resolved `baseDir`.
//!
//! ## Environment Variables
//! - `TASK_NODE_CONFIG_PATH` - Explicit override file (skips discovery)
//! - `TASK_NODE_PROJECT_DIR` - Project config dir (default: `./task-node`)
//! - `TASK_NODE_USER_DIR` - User config dir (default: `~/.task-node`)
//! - `TASK_NODE_BASE_DIR`, `TASK_NODE_BASE_TASK_DIR`,
//!   `TASK_NODE_HADOOP_WORKING_PATH`, `TASK_NODE_DEFAULT_ROW_FLUSH_BOUNDARY`,
//!   `TASK_NODE_GRACEFUL_SHUTDOWN_TIMEOUT`, `TASK_NODE_DIRECTORY_LOCK_TIMEOUT`,
//!   `TASK_NODE_RESTORE_TASKS_ON_RESTART`,
//!   `TASK_NODE_IGNORE_TIMESTAMP_SPEC_FOR_DRUID_INPUT_SOURCE` - Per-field
//!   overrides (highest priority)

mod loader;
mod resolver;
mod types;

pub use loader::{ConfigLoader, ConfigPaths, ConfigTier};
pub use resolver::TaskConfig;
pub use types::*;
