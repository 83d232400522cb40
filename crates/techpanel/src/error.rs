use std::path::PathBuf;

/// Problems reading the configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Errors surfaced by the panel outside of the request outcome types.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The backend answered, but not with 200. Carries the formatted outcome.
    #[error("request failed: {0}")]
    Request(String),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("logging setup failed: {0}")]
    Logging(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
