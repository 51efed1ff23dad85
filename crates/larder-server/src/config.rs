use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::HeaderValue;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    /// One JSON object per event, for log shippers.
    Json,
}

/// Server settings, read once at startup from `LARDER_*` environment
/// variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub data_file: PathBuf,
    pub uploads_dir: PathBuf,
    /// Allowed browser origin. `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    pub max_upload_bytes: usize,
    pub log_format: LogFormat,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3001)),
            data_file: PathBuf::from("data/recipes.json"),
            uploads_dir: PathBuf::from("uploads"),
            cors_origin: Some(HeaderValue::from_static("http://localhost:5173")),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset keys keep their defaults;
    /// set but invalid values are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let mut config = Self::default();

        if let Some(bind) = lookup("LARDER_BIND") {
            config.bind = bind
                .parse()
                .map_err(|e| eyre::eyre!("LARDER_BIND {bind:?} is not a socket address: {e}"))?;
        }
        if let Some(path) = lookup("LARDER_DATA_FILE") {
            config.data_file = PathBuf::from(path);
        }
        if let Some(path) = lookup("LARDER_UPLOADS_DIR") {
            config.uploads_dir = PathBuf::from(path);
        }
        if let Some(origin) = lookup("LARDER_CORS_ORIGIN") {
            config.cors_origin = match origin.trim() {
                "*" => None,
                exact => Some(HeaderValue::from_str(exact).map_err(|e| {
                    eyre::eyre!("LARDER_CORS_ORIGIN {origin:?} is not a valid header value: {e}")
                })?),
            };
        }
        if let Some(limit) = lookup("LARDER_MAX_UPLOAD_BYTES") {
            config.max_upload_bytes = limit.parse().map_err(|e| {
                eyre::eyre!("LARDER_MAX_UPLOAD_BYTES {limit:?} is not a byte count: {e}")
            })?;
        }
        if let Some(format) = lookup("LARDER_LOG_FORMAT") {
            config.log_format = match format.trim().to_ascii_lowercase().as_str() {
                "json" => LogFormat::Json,
                "pretty" | "text" | "" => LogFormat::Pretty,
                other => return Err(eyre::eyre!("unknown LARDER_LOG_FORMAT {other:?}")),
            };
        }

        Ok(config)
    }
}
