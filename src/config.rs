//! Daemon configuration, loaded from `~/.config/appwatch/config.json`.

use appwatch_link::{Environments, XdgPaths, env_locale};
use serde::Deserialize;

use std::fs;
use std::path::{Path, PathBuf};

/// User overrides. Every field is optional; missing ones come from the
/// environment.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data directories to search, strongest first. Replaces the XDG list.
    pub data_dirs: Option<Vec<PathBuf>>,
    /// Locale string such as "de_DE.UTF-8".
    pub locale: Option<String>,
    /// Active desktop names. Replaces `XDG_CURRENT_DESKTOP`.
    pub environments: Option<Vec<String>>,
    /// How long one dispatch waits for filesystem events.
    pub poll_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dirs: None,
            locale: None,
            environments: None,
            poll_interval_ms: 500,
        }
    }
}

impl Config {
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_default()
            .join("appwatch")
            .join("config.json")
    }

    /// Load from config file, or return default if not found
    pub fn load(path: &Path) -> Self {
        fs::read_to_string(path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn xdg_paths(&self) -> XdgPaths {
        let env_paths = XdgPaths::from_env();
        match &self.data_dirs {
            Some(data_dirs) => XdgPaths::new(data_dirs.clone(), env_paths.exec_dirs().to_vec()),
            None => env_paths,
        }
    }

    pub fn locale(&self) -> String {
        self.locale
            .clone()
            .or_else(env_locale)
            .unwrap_or_else(|| "C".to_string())
    }

    pub fn environments(&self) -> Environments {
        match &self.environments {
            Some(names) => Environments::from_names(names),
            None => Environments::from_env(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.json"));
        assert_eq!(config.poll_interval_ms, 500);
        assert!(config.data_dirs.is_none());
    }

    #[test]
    fn test_load_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(
            &path,
            r#"{ "data_dirs": ["/opt/share", "/usr/share"], "environments": ["XFCE"], "locale": "fr_FR" }"#,
        )
        .unwrap();

        let config = Config::load(&path);
        assert_eq!(config.poll_interval_ms, 500);
        assert_eq!(config.locale(), "fr_FR");
        assert_eq!(config.environments(), Environments::XFCE);
        assert_eq!(
            config.xdg_paths().data_dirs(),
            [PathBuf::from("/opt/share"), PathBuf::from("/usr/share")]
        );
    }

    #[test]
    fn test_load_invalid_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(Config::load(&path).poll_interval_ms, 500);
    }
}
