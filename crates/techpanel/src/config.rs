//! Panel configuration.
//!
//! Loaded from TOML, every section optional:
//!
//! ```toml
//! [backend]
//! base_url = "https://tech.example.org"
//! timeout_secs = 10
//! init_data = "query_id=..."
//!
//! [admin]
//! token = "..."
//!
//! [swipe]
//! threshold = 100
//! restraint = 100
//! allowed_time_ms = 300
//!
//! [drafts]
//! path = "/home/me/.local/state/techpanel/drafts.json"
//! ```
//!
//! `TECHPANEL_TOKEN` overrides the admin token and `TECHPANEL_LOG` the log
//! filter.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use techpanel_widgets::{CellScale, SwipeConfig};

use crate::error::ConfigError;

const MAX_CELL_UNITS: i32 = 64;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    pub backend: BackendConfig,
    pub admin: AdminConfig,
    pub ui: UiConfig,
    pub swipe: SwipeSection,
    pub drafts: DraftsConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Session credentials sent with history, submit and delete requests.
    pub init_data: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 10,
            init_data: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Prefills the token field of the admin screen.
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub fps: u32,
    pub mouse: bool,
    pub textarea_max_rows: u16,
    /// Pointer units per terminal column.
    pub cell_width: i32,
    /// Pointer units per terminal row.
    pub cell_height: i32,
    /// Dropdowns that announce selection changes.
    pub notify_selects: Vec<String>,
    pub console_max_entries: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            fps: 30,
            mouse: true,
            textarea_max_rows: 6,
            cell_width: 8,
            cell_height: 16,
            notify_selects: vec!["subject".to_string(), "replace-format".to_string()],
            console_max_entries: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwipeSection {
    pub threshold: i32,
    pub restraint: i32,
    pub allowed_time_ms: u64,
}

impl Default for SwipeSection {
    fn default() -> Self {
        let defaults = SwipeConfig::default();
        Self {
            threshold: defaults.threshold,
            restraint: defaults.restraint,
            allowed_time_ms: defaults.allowed_time.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftsConfig {
    /// Unsaved forms survive restarts when set.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directives.
    pub filter: String,
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "techpanel=info,techpanel_core=info,techpanel_widgets=info".to_string(),
            file: None,
        }
    }
}

impl PanelConfig {
    /// `<config dir>/techpanel/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("techpanel").join("config.toml"))
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// An explicit path must exist. A missing file at the default location
    /// yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::NotFound(path));
            }
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `TECHPANEL_*` overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(token) = lookup("TECHPANEL_TOKEN").filter(|t| !t.is_empty()) {
            self.admin.token = Some(token);
        }
        if let Some(filter) = lookup("TECHPANEL_LOG").filter(|f| !f.is_empty()) {
            self.log.filter = filter;
        }
    }

    pub fn swipe_config(&self) -> SwipeConfig {
        SwipeConfig {
            threshold: self.swipe.threshold,
            restraint: self.swipe.restraint,
            allowed_time: Duration::from_millis(self.swipe.allowed_time_ms),
        }
    }

    /// Cell size in pointer units, kept within 1..=64.
    pub fn cell_scale(&self) -> CellScale {
        CellScale {
            width: self.ui.cell_width.clamp(1, MAX_CELL_UNITS),
            height: self.ui.cell_height.clamp(1, MAX_CELL_UNITS),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.backend.timeout_secs.max(1))
    }

    /// Configured log file, else `<state or cache dir>/techpanel/techpanel.log`.
    pub fn log_file(&self) -> PathBuf {
        if let Some(file) = &self.log.file {
            return file.clone();
        }
        dirs::state_dir()
            .or_else(dirs::cache_dir)
            .unwrap_or_else(std::env::temp_dir)
            .join("techpanel")
            .join("techpanel.log")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config = PanelConfig::from_toml_str("").unwrap();
        assert_eq!(config, PanelConfig::default());
        assert_eq!(config.swipe_config(), SwipeConfig::default());
        assert_eq!(config.ui.notify_selects, vec!["subject", "replace-format"]);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = PanelConfig::from_toml_str(
            r#"
            [backend]
            base_url = "https://tech.example.org"

            [swipe]
            threshold = 60
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.base_url, "https://tech.example.org");
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.swipe.threshold, 60);
        assert_eq!(config.swipe.restraint, 100);
        assert_eq!(config.swipe_config().allowed_time, Duration::from_millis(300));
    }

    #[test]
    fn cell_scale_is_clamped() {
        let config = PanelConfig::from_toml_str("[ui]\ncell_width = 2147483647\ncell_height = -3").unwrap();
        assert_eq!(config.cell_scale(), CellScale { width: 64, height: 1 });
        let p = config.cell_scale().point(u16::MAX, u16::MAX);
        assert_eq!((p.x, p.y), (i32::from(u16::MAX) * 64, i32::from(u16::MAX)));
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let err = PanelConfig::from_toml_str("[backend\nbase_url=").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = PanelConfig::load(Some(&missing)).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(p) if p == missing));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[admin]\ntoken = \"abc\"\n[ui]\ncell_width = 10").unwrap();
        let config = PanelConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.admin.token.as_deref(), Some("abc"));
        assert_eq!(config.cell_scale(), CellScale { width: 10, height: 16 });
    }

    #[test]
    fn env_overrides_token_and_filter() {
        let mut config = PanelConfig::default();
        config.apply_overrides(|key| match key {
            "TECHPANEL_TOKEN" => Some("from-env".to_string()),
            "TECHPANEL_LOG" => Some("debug".to_string()),
            _ => None,
        });
        assert_eq!(config.admin.token.as_deref(), Some("from-env"));
        assert_eq!(config.log.filter, "debug");
    }

    #[test]
    fn empty_env_values_are_ignored() {
        let mut config = PanelConfig::default();
        config.apply_overrides(|_| Some(String::new()));
        assert_eq!(config.admin.token, None);
        assert_eq!(config.log.filter, LogConfig::default().filter);
    }
}
