use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::{LazyLock, RwLock};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "gazeta";

/// Client-side knobs of the page controller. The server decides what the
/// page looks like; this only covers where to reach it and how patient
/// the fetches are.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_server_url")]
    pub server_url: String,

    #[serde(default = "default_page_count")]
    pub page_count: u32,

    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_server_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_page_count() -> u32 {
    4
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_log_file() -> String {
    "gazeta.log".to_string()
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            server_url: default_server_url(),
            page_count: default_page_count(),
            fetch_timeout_secs: default_fetch_timeout_secs(),
            log_file: default_log_file(),
        }
    }
}

static SETTINGS: LazyLock<RwLock<ClientSettings>> =
    LazyLock::new(|| RwLock::new(ClientSettings::default()));

fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

/// Load settings from the config dir, creating the file with defaults on
/// first run. A missing or malformed file never fails startup.
pub fn load_settings() {
    let Some(path) = config_path() else {
        warn!("Could not determine config directory, using default settings");
        return;
    };

    if path.exists() {
        load_settings_from_path(&path);
    } else {
        info!("Settings file not found, creating with defaults at {path:?}");
        if let Ok(settings) = SETTINGS.read() {
            save_settings_to_file(&settings, &path);
        }
    }
}

fn load_settings_from_path(path: &PathBuf) {
    match fs::read_to_string(path) {
        Ok(content) => match serde_yaml::from_str::<ClientSettings>(&content) {
            Ok(mut settings) => {
                debug!("Loaded settings from {path:?}");

                if settings.version < CURRENT_VERSION {
                    migrate_settings(&mut settings);
                    save_settings_to_file(&settings, path);
                }

                if let Ok(mut global) = SETTINGS.write() {
                    *global = settings;
                }
            }
            Err(e) => {
                error!("Failed to parse settings file {path:?}: {e}");
            }
        },
        Err(e) => {
            error!("Failed to read settings file {path:?}: {e}");
        }
    }
}

fn migrate_settings(settings: &mut ClientSettings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    // Future migrations go here.

    settings.version = CURRENT_VERSION;
}

pub fn save_settings() {
    let Some(path) = config_path() else {
        warn!("Could not determine config directory, cannot save settings");
        return;
    };

    if let Ok(settings) = SETTINGS.read() {
        save_settings_to_file(&settings, &path);
    }
}

fn save_settings_to_file(settings: &ClientSettings, path: &PathBuf) {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory {parent:?}: {e}");
                return;
            }
        }
    }

    let content = match serde_yaml::to_string(settings) {
        Ok(content) => content,
        Err(e) => {
            error!("Failed to serialize settings: {e}");
            return;
        }
    };

    match fs::write(path, content) {
        Ok(()) => debug!("Saved settings to {path:?}"),
        Err(e) => error!("Failed to save settings to {path:?}: {e}"),
    }
}

/// Snapshot of the current settings.
pub fn current() -> ClientSettings {
    SETTINGS
        .read()
        .map(|s| s.clone())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_server() {
        let settings = ClientSettings::default();
        assert_eq!(settings.server_url, "http://127.0.0.1:5000");
        assert_eq!(settings.page_count, 4);
        assert_eq!(settings.fetch_timeout_secs, 10);
        assert_eq!(settings.version, CURRENT_VERSION);
    }

    #[test]
    fn partial_yaml_fills_in_defaults() {
        let settings: ClientSettings =
            serde_yaml::from_str("server_url: \"http://news.example:8080\"\n").unwrap();
        assert_eq!(settings.server_url, "http://news.example:8080");
        assert_eq!(settings.page_count, 4);
        assert_eq!(settings.fetch_timeout_secs, 10);
    }

    #[test]
    fn settings_round_trip_through_yaml() {
        let mut settings = ClientSettings::default();
        settings.page_count = 12;

        let yaml = serde_yaml::to_string(&settings).unwrap();
        let parsed: ClientSettings = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.page_count, 12);
    }
}
