use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;
use std::{fs, io};

use serde::Deserialize;

#[derive(Deserialize, Copy, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageEngine {
    Sqlite,
    Postgres,
}

#[derive(Deserialize, Clone)]
pub struct Storage {
    pub engine: StorageEngine,
    pub sqlite_path: Option<PathBuf>,
    pub database_url: Option<String>,
    pub acquire_timeout_secs: Option<u64>,
}

impl Storage {
    pub fn sqlite_path(&self) -> PathBuf {
        self.sqlite_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("database.db"))
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs.unwrap_or(5))
    }
}

#[derive(Deserialize, Clone)]
pub struct Mirrors {
    pub csv_file: PathBuf,
    pub txt_file: PathBuf,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub storage: Storage,
    pub mirrors: Mirrors,
    pub log: Option<Log>,
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!(
                    "Error opening configuration file {}: {}",
                    cfg_path.display(),
                    e
                ),
            ))
        }
    };

    match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => Ok(cfg),
        Err(e) => Err(io::Error::new(
            ErrorKind::InvalidData,
            format!("Error parsing configuration file: {}", e),
        )),
    }
}
