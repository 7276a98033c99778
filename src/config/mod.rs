use anyhow::{Context, anyhow};
use serde::Deserialize;

mod daemon_config;
mod logs_config;
mod server_config;
mod storage_config;

pub use daemon_config::DaemonConfig;
pub use logs_config::LogsConfig;
pub use server_config::ServerConfig;
pub use storage_config::StorageConfig;

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub daemon: DaemonConfig,
    pub storage: StorageConfig,
    pub logs: LogsConfig,
}

pub(crate) fn root_dir() -> std::path::PathBuf {
    std::env::current_dir().unwrap_or_else(|_| std::path::PathBuf::from("."))
}

fn parse_config_path() -> std::path::PathBuf {
    let mut args = std::env::args();
    args.next();
    while let Some(arg) = args.next() {
        if arg == "-c" || arg == "--config" {
            if let Some(path) = args.next() {
                return std::path::Path::new(&path).to_path_buf();
            } else {
                panic!("Error: Please specify path string for -c argument.")
            }
        }
    }
    panic!("Error: Please specify configuration file argument. Usage: -c <config_file>")
}

pub(crate) fn load() -> anyhow::Result<Config> {
    let path = parse_config_path();
    if !path.is_file() {
        return Err(anyhow!(
            "Error: Configuration file not found or invalid.\n\
        Please make sure that the configuration file exists and is a valid TOML file.\n\
        Expected file path: {:?}",
            path
        ));
    }
    let content = std::fs::read_to_string(path).with_context(|| {
        "Error: Failed to read configuration file.\n\
        Please check the file path and file permissions, and make sure the file is valid accessible"
    })?;
    toml::from_str(&content).with_context(|| {
        "Error: Failed to parse configuration file.\n\
        Please check the file syntax is valid TOML syntax"
    })
}
