//! TOML-based configuration for the wrap daemon.
//!
//! Reads and writes [`AppConfig`] to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\CursorWrap\config.toml`
//! - Linux:    `~/.config/cursorwrap/config.toml`
//! - macOS:    `~/Library/Application Support/CursorWrap/config.toml`
//!
//! ```toml
//! [general]
//! log_level = "info"
//! enabled = true
//!
//! [wrap]
//! disable_wrap_during_drag = true
//! wrap_mode = 0            # 0 = both, 1 = vertical only, 2 = horizontal only
//! sticky_edge_enabled = false
//! sticky_edge_delay_ms = 300
//!
//! [[monitors]]             # optional; replaces OS enumeration when present
//! left = 0
//! top = 0
//! right = 1920
//! bottom = 1080
//! primary = true
//! ```
//!
//! # Serde default values
//!
//! Every field has a serde default, so a missing file, a missing section or
//! a missing key all fall back to the defaults.  The `[wrap]` section is
//! [`WrapSettings`] itself; `wrap_mode` is validated as an integer there.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wrap_core::{MonitorRect, WrapSettings};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A `[[monitors]]` entry has no area.
    #[error("monitor entry {index} is empty: right/bottom must exceed left/top")]
    InvalidMonitor { index: usize },
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub wrap: WrapSettings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub monitors: Vec<MonitorEntry>,
}

/// Process-level settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Whether wrapping is active.  Re-read while running.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// How often the monitor layout is re-enumerated.
    #[serde(default = "default_poll_interval_ms")]
    pub display_poll_interval_ms: u64,
    /// How often this file is re-read for settings changes.
    #[serde(default = "default_poll_interval_ms")]
    pub settings_poll_interval_ms: u64,
}

/// A monitor rectangle pinned in the config file.  `right`/`bottom` are
/// exclusive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonitorEntry {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
    #[serde(default)]
    pub primary: bool,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_poll_interval_ms() -> u64 {
    2000
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            enabled: default_true(),
            display_poll_interval_ms: default_poll_interval_ms(),
            settings_poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl AppConfig {
    /// The configured static layout, with ordinal ids in file order, or
    /// `None` when the file does not pin one.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidMonitor`] for an entry with no area.
    pub fn static_monitors(&self) -> Result<Option<Vec<MonitorRect>>, ConfigError> {
        if self.monitors.is_empty() {
            return Ok(None);
        }
        self.monitors
            .iter()
            .enumerate()
            .map(|(index, m)| {
                if m.right <= m.left || m.bottom <= m.top {
                    return Err(ConfigError::InvalidMonitor { index });
                }
                let rect = MonitorRect::new(index as u32, m.left, m.top, m.right, m.bottom);
                Ok(if m.primary { rect.primary() } else { rect })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the config file path: `explicit` when given, otherwise
/// `config.toml` in [`config_dir`].
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] if no explicit path is given
/// and the base directory cannot be determined.
pub fn config_file_path(explicit: Option<&Path>) -> Result<PathBuf, ConfigError> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => Ok(config_dir()?.join("config.toml")),
    }
}

/// Loads `AppConfig` from `path`, returning `AppConfig::default()` if the
/// file does not yet exist.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(source) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Persists `config` to `path`, creating the directory if needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config directory, including the `CursorWrap`
/// subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        // %APPDATA% e.g. C:\Users\<user>\AppData\Roaming
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("CursorWrap"))
    }

    #[cfg(target_os = "linux")]
    {
        // XDG_CONFIG_HOME or ~/.config
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("cursorwrap"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME")
            .map(|h| {
                PathBuf::from(h)
                    .join("Library")
                    .join("Application Support")
                    .join("CursorWrap")
            })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wrap_core::WrapMode;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("cursor_wrap_{}_{}", name, std::process::id()))
    }

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_matches_documented_values() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.general.log_level, "info");
        assert!(cfg.general.enabled);
        assert_eq!(cfg.general.display_poll_interval_ms, 2000);
        assert!(cfg.wrap.disable_wrap_during_drag);
        assert_eq!(cfg.wrap.wrap_mode, WrapMode::Both);
        assert_eq!(cfg.wrap.sticky_edge_delay_ms, 300);
        assert!(cfg.monitors.is_empty());
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_wrap_section_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[wrap]
wrap_mode = 2
sticky_edge_enabled = true
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.wrap.wrap_mode, WrapMode::HorizontalOnly);
        assert!(cfg.wrap.sticky_edge_enabled);
        // Unspecified fields keep their defaults
        assert!(cfg.wrap.disable_wrap_during_drag);
        assert_eq!(cfg.general.settings_poll_interval_ms, 2000);
    }

    #[test]
    fn test_deserialize_out_of_range_wrap_mode_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str("[wrap]\nwrap_mode = 7\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── Static monitors ───────────────────────────────────────────────────────

    #[test]
    fn test_static_monitors_absent_when_none_configured() {
        assert_eq!(AppConfig::default().static_monitors().expect("monitors"), None);
    }

    #[test]
    fn test_static_monitors_assigns_ids_in_file_order() {
        // Arrange
        let toml_str = r#"
[[monitors]]
left = 1920
top = 0
right = 3840
bottom = 1080

[[monitors]]
left = 0
top = 0
right = 1920
bottom = 1080
primary = true
"#;
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize");

        // Act
        let monitors = cfg.static_monitors().expect("valid").expect("configured");

        // Assert
        assert_eq!(monitors[0], MonitorRect::new(0, 1920, 0, 3840, 1080));
        assert_eq!(monitors[1], MonitorRect::new(1, 0, 0, 1920, 1080).primary());
    }

    #[test]
    fn test_static_monitors_rejects_empty_rectangle() {
        let cfg = AppConfig {
            monitors: vec![MonitorEntry {
                left: 100,
                top: 0,
                right: 100,
                bottom: 1080,
                primary: false,
            }],
            ..AppConfig::default()
        };

        assert!(matches!(
            cfg.static_monitors(),
            Err(ConfigError::InvalidMonitor { index: 0 })
        ));
    }

    // ── File access ───────────────────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let cfg = load_config(&path).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir("round_trip");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.general.log_level = "debug".to_string();
        cfg.wrap.wrap_mode = WrapMode::VerticalOnly;

        // Act
        save_config(&path, &cfg).expect("save");
        let loaded = load_config(&path).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_reports_parse_error_for_malformed_file() {
        let dir = temp_dir("malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "[general\nlog_level = ").unwrap();

        let result = load_config(&path);

        assert!(matches!(result, Err(ConfigError::Parse(_))));
        std::fs::remove_dir_all(&dir).ok();
    }

    // ── Path resolution ───────────────────────────────────────────────────────

    #[test]
    fn test_config_file_path_prefers_explicit_path() {
        let explicit = Path::new("/etc/cursorwrap.toml");
        assert_eq!(config_file_path(Some(explicit)).expect("path"), explicit);
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        // NoPlatformConfigDir is acceptable in a stripped CI environment.
        if let Ok(path) = config_file_path(None) {
            assert!(path.ends_with("config.toml"), "got {path:?}");
        }
    }
}
