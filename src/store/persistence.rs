//! Settings persistence: load/save with atomic writes

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::settings::{
    AuthSection, PersistedState, SearchHistory, SearchSection, SettingsFile, SortPreference,
    SortSection,
};
use crate::models::Credentials;

/// Load persisted state from `path`.
///
/// A missing file (and its parent directory) is created empty. Missing
/// sections fall back to defaults: history `["@me"]`, sort board > list, no
/// credentials, no window geometry.
pub fn load_state(path: &Path) -> Result<PersistedState> {
    if !path.exists() {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }
        fs::write(path, "").context("Failed to create settings file")?;
        info!(path = %path.display(), "Created empty settings file");
    }

    let contents = fs::read_to_string(path).context("Failed to read settings file")?;
    let file: SettingsFile = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse settings file {}", path.display()))?;

    let state = from_file(file);
    debug!(
        has_credentials = state.credentials.is_some(),
        history = state.history.len(),
        sort = state.sort.token(),
        "Loaded settings"
    );
    Ok(state)
}

/// Write all known state back to `path`, replacing the file atomically
pub fn save_state(path: &Path, state: &PersistedState) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).context("Failed to create settings directory")?;
    }

    let contents =
        toml::to_string_pretty(&to_file(state)).context("Failed to serialize settings")?;

    let mut temp_name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    temp_name.push(".tmp");
    let temp_path = path.with_file_name(temp_name);

    fs::write(&temp_path, contents).context("Failed to write settings temp file")?;
    fs::rename(&temp_path, path).context("Failed to rename settings temp file")?;

    debug!(path = %path.display(), "Saved settings");
    Ok(())
}

fn from_file(file: SettingsFile) -> PersistedState {
    let credentials = file.auth.and_then(|auth| {
        let api_key = auth.api_key.unwrap_or_default();
        if api_key.is_empty() {
            None
        } else {
            Some(Credentials { api_key, token: auth.token.unwrap_or_default() })
        }
    });

    let history = file
        .search
        .and_then(|s| s.search_strings)
        .map(|joined| SearchHistory::from_joined(&joined))
        .unwrap_or_default();

    let sort = match file.sort.and_then(|s| s.order) {
        Some(token) => SortPreference::from_token(&token).unwrap_or_else(|| {
            warn!(token = %token, "Unknown sort order in settings, using default");
            SortPreference::default()
        }),
        None => SortPreference::default(),
    };

    PersistedState { credentials, history, sort, geometry: file.window }
}

fn to_file(state: &PersistedState) -> SettingsFile {
    SettingsFile {
        auth: state.credentials.as_ref().map(|c| AuthSection {
            api_key: Some(c.api_key.clone()),
            token: Some(c.token.clone()),
        }),
        search: Some(SearchSection { search_strings: Some(state.history.joined()) }),
        sort: Some(SortSection { order: Some(state.sort.token().to_string()) }),
        window: state.geometry,
    }
}
