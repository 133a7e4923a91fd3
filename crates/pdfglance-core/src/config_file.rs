use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub display: Option<DisplayConfig>,
    pub clipboard: Option<ClipboardConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    /// Lines of first-page text shown in the preview pane.
    pub preview_lines: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClipboardConfig {
    /// How long the "copied" indicator stays up, in milliseconds.
    pub feedback_ms: Option<u64>,
    /// Fallback when the system clipboard fails: "osc52" or "none".
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// An `EnvFilter` directive, e.g. "info" or "pdfglance_core=debug".
    pub level: Option<String>,
    pub log_dir: Option<String>,
}

/// Platform config directory path: `<config_dir>/pdfglance/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdfglance").join("config.toml"))
}

/// Load config by cascading CWD `.pdfglance.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".pdfglance.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparsable config");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_display = base.display.unwrap_or_default();
    let base_clipboard = base.clipboard.unwrap_or_default();
    let base_logging = base.logging.unwrap_or_default();
    let display = overlay.display.unwrap_or_default();
    let clipboard = overlay.clipboard.unwrap_or_default();
    let logging = overlay.logging.unwrap_or_default();

    ConfigFile {
        display: Some(DisplayConfig {
            theme: display.theme.or(base_display.theme),
            preview_lines: display.preview_lines.or(base_display.preview_lines),
        }),
        clipboard: Some(ClipboardConfig {
            feedback_ms: clipboard.feedback_ms.or(base_clipboard.feedback_ms),
            fallback: clipboard.fallback.or(base_clipboard.fallback),
        }),
        logging: Some(LoggingConfig {
            level: logging.level.or(base_logging.level),
            log_dir: logging.log_dir.or(base_logging.log_dir),
        }),
    }
}

/// Settings resolved from the config file and defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub theme: String,
    pub preview_lines: usize,
    pub copy_feedback_ms: u64,
    pub osc52_fallback: bool,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: "hacker".to_string(),
            preview_lines: 12,
            copy_feedback_ms: 2000,
            osc52_fallback: true,
            log_level: "info".to_string(),
            log_dir: dirs::cache_dir().map(|d| d.join("pdfglance").join("logs")),
        }
    }
}

impl Settings {
    pub fn from_config(config: &ConfigFile) -> Self {
        let mut settings = Self::default();
        if let Some(display) = &config.display {
            if let Some(theme) = &display.theme {
                settings.theme = theme.clone();
            }
            if let Some(lines) = display.preview_lines {
                settings.preview_lines = lines;
            }
        }
        if let Some(clipboard) = &config.clipboard {
            if let Some(ms) = clipboard.feedback_ms {
                settings.copy_feedback_ms = ms;
            }
            if let Some(fallback) = &clipboard.fallback {
                match fallback.to_ascii_lowercase().as_str() {
                    "osc52" => settings.osc52_fallback = true,
                    "none" => settings.osc52_fallback = false,
                    _ => tracing::warn!(
                        fallback = fallback.as_str(),
                        "unknown clipboard fallback, keeping osc52"
                    ),
                }
            }
        }
        if let Some(logging) = &config.logging {
            if let Some(level) = &logging.level {
                settings.log_level = level.clone();
            }
            if let Some(dir) = &logging.log_dir {
                settings.log_dir = Some(PathBuf::from(dir));
            }
        }
        settings
    }
}
