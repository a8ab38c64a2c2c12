use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::PathBuf};

pub const SETTINGS_PATH_ENV: &str = "TIME2LEARN_SETTINGS";
pub const DB_PATH_ENV: &str = "TIME2LEARN_DB_PATH";
pub const BIND_ADDR_ENV: &str = "TIME2LEARN_BIND_ADDR";
pub const DEBUG_ENV: &str = "TIME2LEARN_DEBUG";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub database_path: PathBuf,
    pub bind_addr: SocketAddr,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("time2learn.sqlite3"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            debug: false,
        }
    }
}

fn flag_enabled(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}

impl Settings {
    /// Defaults, then the JSON file named by `TIME2LEARN_SETTINGS`, then
    /// individual environment overrides.
    pub fn load() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    fn resolve<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match lookup(SETTINGS_PATH_ENV) {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };

        if let Some(path) = lookup(DB_PATH_ENV) {
            settings.database_path = PathBuf::from(path);
        }
        if let Some(addr) = lookup(BIND_ADDR_ENV) {
            settings.bind_addr = addr
                .parse()
                .with_context(|| format!("{BIND_ADDR_ENV} is not a socket address: {addr}"))?;
        }
        if let Some(debug) = lookup(DEBUG_ENV) {
            settings.debug = flag_enabled(&debug);
        }

        Ok(settings)
    }

    pub fn from_file(path: PathBuf) -> Result<Self> {
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings in {}", path.display()))
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}
