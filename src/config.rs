use serde::Deserialize;
use std::path::PathBuf;

use crate::handler::rewrite::RewriteTable;
use crate::http::MimeTable;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Listen host; empty string means the wildcard (all interfaces,
    /// IPv4 and IPv6)
    pub host: String,
    pub start_port: u16,
    pub max_port_attempts: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PathsConfig {
    pub document_root: PathBuf,
    /// Directory holding the WASM runtime bundle; relative paths are
    /// anchored at the document root
    pub asset_dir: PathBuf,
    pub index_files: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub access_log: bool,
}

impl Config {
    /// Load configuration from compiled-in defaults, overridden by an
    /// optional `serve` config file in the working directory.
    pub fn load() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("serve").required(false))
            .set_default("server.host", "")?
            .set_default("server.start_port", 8000)?
            .set_default("server.max_port_attempts", 10)?
            .set_default("paths.document_root", ".")?
            .set_default("paths.asset_dir", "wasm-lib")?
            .set_default("paths.index_files", vec!["index.html", "index.htm"])?
            .set_default("logging.access_log", true)?
            .build()?;

        settings.try_deserialize()
    }

    /// Absolute location of the asset directory.
    pub fn asset_dir(&self) -> PathBuf {
        if self.paths.asset_dir.is_absolute() {
            self.paths.asset_dir.clone()
        } else {
            self.paths.document_root.join(&self.paths.asset_dir)
        }
    }
}

/// Shared request-handling state: the configuration plus the lookup tables,
/// all built once at startup and immutable afterwards.
pub struct AppState {
    pub config: Config,
    pub mime: MimeTable,
    pub rewrites: RewriteTable,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        let rewrites = RewriteTable::new(&config.asset_dir());
        Self {
            config: config.clone(),
            mime: MimeTable::new(),
            rewrites,
        }
    }
}
