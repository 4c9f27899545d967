//! Task node configuration inspector.
//!
//! Resolves the node configuration exactly as a worker process would at
//! startup and prints the effective values or a task's directory layout.

use anyhow::Result;
use clap::Parser;
use task_node_config::cli::{Cli, Command, OutputFormat};
use task_node_config::config::ConfigLoader;
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.parse::<Level>().unwrap_or(Level::WARN);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let loader = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path.as_str())?,
        None => ConfigLoader::load()?,
    };
    match loader.config_path() {
        Some(path) => debug!(path = %path.display(), "using override file"),
        None => debug!("no override file found, using defaults"),
    }
    let config = loader.resolve()?;

    match cli.command {
        Command::Show { format } => {
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&config)?,
                OutputFormat::Yaml => serde_yaml::to_string(&config)?,
            };
            println!("{rendered}");
        }
        Command::TaskDirs { task_id } => {
            println!("task:  {}", config.task_dir(&task_id).display());
            println!("work:  {}", config.task_work_dir(&task_id).display());
            println!("temp:  {}", config.task_temp_dir(&task_id).display());
            println!("lock:  {}", config.task_lock_file(&task_id).display());
        }
    }

    Ok(())
}
