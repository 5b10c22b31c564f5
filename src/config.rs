use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Pane arrangement of the compare view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Horizontal,
    Vertical,
}

/// Parse layout string from settings to Layout enum
pub fn parse_layout(s: &str) -> Layout {
    match s.to_lowercase().as_str() {
        "vertical" => Layout::Vertical,
        _ => Layout::Horizontal,
    }
}

/// Convert Layout enum to string for settings
pub fn layout_to_string(layout: Layout) -> String {
    match layout {
        Layout::Horizontal => "horizontal".to_string(),
        Layout::Vertical => "vertical".to_string(),
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub enabled: bool,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 5000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// "horizontal" (side by side) or "vertical" (stacked)
    pub layout: String,
    pub sync_scroll: bool,
    /// "light" or "dark"
    pub theme: String,
    /// Default directory offered by the load-original dialog
    pub original_dir: Option<String>,
    /// Default directory offered by the load-translated dialog
    pub translated_dir: Option<String>,
    /// Where save-current and save-all write; defaults to the working dir
    pub output_dir: Option<String>,
    pub server: ServerSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: "horizontal".to_string(),
            sync_scroll: true,
            theme: "light".to_string(),
            original_dir: None,
            translated_dir: None,
            output_dir: None,
            server: ServerSettings::default(),
        }
    }
}

/// ~/.romdiff
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".romdiff"))
}

pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.json"))
}

pub fn log_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("romdiff.log"))
}

impl Settings {
    /// Load settings from disk; a missing or malformed file falls back to
    /// defaults.
    pub fn load() -> Self {
        let Some(path) = config_path() else {
            return Self::default();
        };
        match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> io::Result<()> {
        let Some(dir) = config_dir() else {
            return Ok(());
        };
        fs::create_dir_all(&dir)?;
        let text = serde_json::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(dir.join("config.json"), text)
    }

    pub fn layout(&self) -> Layout {
        parse_layout(&self.layout)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .as_deref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.layout(), Layout::Horizontal);
        assert!(settings.sync_scroll);
        assert_eq!(settings.theme, "light");
        assert!(!settings.server.enabled);
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn test_parse_layout() {
        assert_eq!(parse_layout("vertical"), Layout::Vertical);
        assert_eq!(parse_layout("Horizontal"), Layout::Horizontal);
        assert_eq!(parse_layout("junk"), Layout::Horizontal);
    }

    #[test]
    fn test_layout_roundtrip() {
        for layout in [Layout::Horizontal, Layout::Vertical] {
            assert_eq!(parse_layout(&layout_to_string(layout)), layout);
        }
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let settings: Settings =
            serde_json::from_str(r#"{"theme": "dark"}"#).unwrap_or_default();
        assert_eq!(settings.theme, "dark");
        assert!(settings.sync_scroll);
        assert_eq!(settings.server.port, 5000);
    }

    #[test]
    fn test_malformed_config_falls_back() {
        let settings: Settings = serde_json::from_str("not json").unwrap_or_default();
        assert_eq!(settings.theme, "light");
    }
}
