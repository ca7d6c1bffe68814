use std::{fs, io};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Deserialize;

fn default_archive_url_format() -> String {
    "/archive/:year/:month".to_string()
}

#[derive(Deserialize, Debug)]
pub struct Archives {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_archive_url_format")]
    pub url_format: String,
}

impl Default for Archives {
    fn default() -> Archives {
        Archives {
            enabled: false,
            url_format: default_archive_url_format(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Feed {
    pub title: String,
    pub site_url: String,
    pub description: String,
}

fn default_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

#[derive(Deserialize, Debug)]
pub struct Server {
    #[serde(default = "default_address")]
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Server {
    fn default() -> Server {
        Server {
            address: default_address(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    #[serde(default)]
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone, Debug)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Default, Debug)]
pub struct Config {
    #[serde(default)]
    pub archives: Archives,
    pub feed: Option<Feed>,
    pub server: Option<Server>,
    pub log: Option<Log>,
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => {
            return Err(io::Error::new(
                e.kind(),
                format!("Error opening configuration file {}: {}", cfg_path.display(), e),
            ));
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
