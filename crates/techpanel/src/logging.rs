//! File logging.
//!
//! The terminal belongs to the UI, so events go to a log file instead of
//! stdout. The filter comes from the config (or `TECHPANEL_LOG`).

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::PanelError;

/// Install the global subscriber writing to `path`, creating parent
/// directories as needed.
pub fn init_file_logging(path: &Path, filter: &str) -> Result<(), PanelError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let env_filter = EnvFilter::try_new(filter).map_err(|e| PanelError::Logging(e.to_string()))?;
    let fmt_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| PanelError::Logging(e.to_string()))?;

    tracing::info!(path = %path.display(), "logging initialized");
    Ok(())
}
