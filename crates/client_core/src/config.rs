use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use url::Url;

use crate::error::SettingsError;

pub const DEFAULT_SETTINGS_FILE: &str = "ragmail.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    pub base_url: String,
    pub log_filter: String,
    pub export_dir: Option<PathBuf>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".into(),
            log_filter: "info".into(),
            export_dir: None,
        }
    }
}

impl ClientSettings {
    pub fn base_url(&self) -> Result<Url, SettingsError> {
        let invalid = |reason: String| SettingsError::InvalidBaseUrl {
            value: self.base_url.clone(),
            reason,
        };
        let url = Url::parse(self.base_url.trim()).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https".into()));
        }
        Ok(url)
    }
}

/// Defaults, then the settings file, then environment overrides, then a
/// command-line `base_url`. The URL is validated once every layer is applied.
///
/// An explicit `path` must exist; the default `ragmail.toml` is optional.
pub fn load_settings(
    path: Option<&Path>,
    base_url_flag: Option<&str>,
) -> Result<ClientSettings, SettingsError> {
    let (path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_SETTINGS_FILE), false),
    };

    let mut settings = match fs::read_to_string(&path) {
        Ok(raw) => toml::from_str::<ClientSettings>(&raw)
            .map_err(|source| SettingsError::Parse {
                path: path.clone(),
                source,
            })?,
        Err(err) if err.kind() == io::ErrorKind::NotFound && !required => {
            ClientSettings::default()
        }
        Err(source) => return Err(SettingsError::Read { path, source }),
    };

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    if let Some(base_url) = base_url_flag {
        settings.base_url = base_url.to_string();
    }
    settings.base_url()?;
    Ok(settings)
}

pub fn apply_env_overrides(
    settings: &mut ClientSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    let first = |keys: [&str; 2]| keys.into_iter().find_map(|key| lookup(key));

    if let Some(v) = first(["APP__BASE_URL", "RAGMAIL_BASE_URL"]) {
        settings.base_url = v;
    }
    if let Some(v) = first(["APP__LOG_FILTER", "RAGMAIL_LOG"]) {
        settings.log_filter = v;
    }
    if let Some(v) = first(["APP__EXPORT_DIR", "RAGMAIL_EXPORT_DIR"]) {
        settings.export_dir = Some(PathBuf::from(v));
    }
}
