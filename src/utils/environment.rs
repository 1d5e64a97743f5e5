use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::api::DEFAULT_BASE_URL;

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "trello-radar";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Overrides the settings file location
pub const CONFIG_ENV: &str = "TRELLO_RADAR_CONFIG";
/// Overrides the Trello API host (used against local test servers)
pub const API_URL_ENV: &str = "TRELLO_RADAR_API_URL";

/// Application directory, e.g. `~/.config/trello-radar`
pub fn get_app_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Failed to get platform config directory")?;
    Ok(base.join(APP_DIR_NAME))
}

/// Settings file path: explicit flag, then environment, then platform default
pub fn resolve_settings_path(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = env::var_os(CONFIG_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(get_app_dir()?.join(SETTINGS_FILE_NAME))
}

/// Log files live next to the settings file
pub fn log_dir_for(settings_path: &Path) -> PathBuf {
    settings_path.parent().map(|p| p.join("logs")).unwrap_or_else(|| PathBuf::from("logs"))
}

pub fn api_base_url() -> String {
    env::var(API_URL_ENV)
        .ok()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
}

/// Replace the home directory prefix with `~` for display
pub fn format_path_with_tilde(path: &Path) -> String {
    if let Some(home) = dirs::home_dir()
        && let Ok(rest) = path.strip_prefix(&home)
    {
        return if rest.as_os_str().is_empty() {
            "~".to_string()
        } else {
            format!("~/{}", rest.display())
        };
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_settings_path(Some(Path::new("/tmp/custom.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.toml"));
    }

    #[test]
    fn test_default_path_ends_with_app_dir() {
        // Only meaningful when the environment override is absent
        if env::var_os(CONFIG_ENV).is_some() {
            return;
        }
        let path = resolve_settings_path(None).unwrap();
        assert!(path.ends_with("trello-radar/settings.toml"));
    }

    #[test]
    fn test_log_dir_next_to_settings() {
        assert_eq!(
            log_dir_for(Path::new("/home/u/.config/trello-radar/settings.toml")),
            PathBuf::from("/home/u/.config/trello-radar/logs")
        );
    }

    #[test]
    fn test_format_path_outside_home() {
        assert_eq!(format_path_with_tilde(Path::new("/definitely/not/home")), "/definitely/not/home");
    }

    #[test]
    fn test_format_path_inside_home() {
        if let Some(home) = dirs::home_dir() {
            let path = home.join("notes").join("settings.toml");
            assert_eq!(format_path_with_tilde(&path), "~/notes/settings.toml");
        }
    }
}
