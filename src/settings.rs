use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CURSORLESS_DIR_NAME: &str = ".cursorless";
pub const HATS_FILE_NAME: &str = "vscode-hats.json";
pub const COLORS_FILE_NAME: &str = "colors.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
}

impl Default for ThemeMode {
    fn default() -> Self {
        ThemeMode::Dark
    }
}

impl ThemeMode {
    /// Key of this theme inside the colors file.
    pub fn key(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Location of the hats snapshot written by the external producer.
    /// Defaults to `~/.cursorless/vscode-hats.json` when missing.
    #[serde(default)]
    pub hats_path: Option<String>,
    /// Location of the optional colors override file.
    /// Defaults to `~/.cursorless/colors.json` when missing.
    #[serde(default)]
    pub colors_path: Option<String>,
    #[serde(default)]
    pub theme: ThemeMode,
    /// Diameter of each hat in pixels.
    #[serde(default = "default_marker_diameter")]
    pub marker_diameter: u32,
    /// Gap between the caret origin and the left edge of the hat, then the
    /// vertical shift applied to its center.
    #[serde(default = "default_marker_offset")]
    pub marker_offset: (i32, i32),
    /// Documents whose canonical path contains any of these fragments are
    /// never painted.
    #[serde(default = "default_ignored_path_fragments")]
    pub ignored_path_fragments: Vec<String>,
    /// When enabled the logger is initialised at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<String>,
}

fn default_marker_diameter() -> u32 {
    4
}

fn default_marker_offset() -> (i32, i32) {
    (4, 0)
}

fn default_ignored_path_fragments() -> Vec<String> {
    vec!["node_modules/".to_string()]
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            hats_path: None,
            colors_path: None,
            theme: ThemeMode::default(),
            marker_diameter: default_marker_diameter(),
            marker_offset: default_marker_offset(),
            ignored_path_fragments: default_ignored_path_fragments(),
            debug_logging: false,
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or empty file yields the defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err).with_context(|| format!("read settings file {path}")),
        };
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(&content).with_context(|| format!("deserialize settings file {path}"))
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(path, json).with_context(|| format!("write settings file {path}"))
    }

    pub fn hats_path(&self) -> PathBuf {
        match &self.hats_path {
            Some(path) => PathBuf::from(path),
            None => cursorless_dir().join(HATS_FILE_NAME),
        }
    }

    pub fn colors_path(&self) -> PathBuf {
        match &self.colors_path {
            Some(path) => PathBuf::from(path),
            None => cursorless_dir().join(COLORS_FILE_NAME),
        }
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.log_file.as_ref().map(PathBuf::from)
    }

    /// Initialise logging from `debug_logging` and `log_file`.
    pub fn init_logging(&self) {
        crate::logging::init(self.debug_logging, self.log_file());
    }
}

fn cursorless_dir() -> PathBuf {
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CURSORLESS_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme":"light"}"#).unwrap();
        assert_eq!(settings.theme, ThemeMode::Light);
        assert_eq!(settings.marker_diameter, 4);
        assert_eq!(settings.marker_offset, (4, 0));
        assert_eq!(settings.ignored_path_fragments, vec!["node_modules/"]);
        assert!(!settings.debug_logging);
    }

    #[test]
    fn default_hats_path_lives_in_cursorless_dir() {
        let path = Settings::default().hats_path();
        assert!(path.ends_with(".cursorless/vscode-hats.json"));
    }

    #[test]
    fn explicit_paths_are_used_verbatim() {
        let settings = Settings {
            hats_path: Some("/tmp/hats.json".into()),
            colors_path: Some("/tmp/colors.json".into()),
            ..Settings::default()
        };
        assert_eq!(settings.hats_path(), PathBuf::from("/tmp/hats.json"));
        assert_eq!(settings.colors_path(), PathBuf::from("/tmp/colors.json"));
    }

    #[test]
    fn log_file_is_optional() {
        assert_eq!(Settings::default().log_file(), None);
        let settings: Settings =
            serde_json::from_str(r#"{"debug_logging":true,"log_file":"/tmp/hats.log"}"#).unwrap();
        assert!(settings.debug_logging);
        assert_eq!(settings.log_file(), Some(PathBuf::from("/tmp/hats.log")));
    }
}
