//! Operator settings for the curator console.
//!
//! Read from `settings.toml` in the platform data directory (next to the
//! storage file) or from an explicit path:
//!
//! ```toml
//! [storage]
//! key = "shipinn_heritage_vault_v1"
//! path = "/srv/inn/storage.json"
//!
//! [admin]
//! master_key = "shipinn1849"
//!
//! [assistant]
//! model = "gemini-3-flash-preview"
//! temperature = 0.7
//! api_key_env = "API_KEY"
//! ```
//!
//! Every section and field is optional.  Fields annotated with
//! `#[serde(default = "some_fn")]` take the value of `some_fn()` when absent,
//! so the console works before any settings file exists.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::storage::key_value::DEFAULT_STORAGE_KEY;
use super::storage::platform_data_dir;
use crate::application::admin_gate::DEFAULT_MASTER_KEY;

/// File name of the settings file inside the platform data directory.
pub const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Error type for settings file operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The platform data directory could not be determined.
    #[error("could not determine platform settings directory")]
    NoPlatformDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CuratorSettings {
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub admin: AdminSettings,
    #[serde(default)]
    pub assistant: AssistantSettings,
}

/// Where the site config is persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    /// Key of the site config entry inside the storage file.
    #[serde(default = "default_storage_key")]
    pub key: String,
    /// Storage file.  Absent means `<platform data dir>/storage.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Editing surface settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminSettings {
    #[serde(default = "default_master_key")]
    pub master_key: String,
}

/// Remote assistant settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantSettings {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Base URL of the generative language API.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Environment variable holding the API key.  The key itself is never
    /// stored in this file.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}
fn default_master_key() -> String {
    DEFAULT_MASTER_KEY.to_string()
}
fn default_model() -> String {
    "gemini-3-flash-preview".to_string()
}
fn default_temperature() -> f32 {
    0.7
}
fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}
fn default_api_key_env() -> String {
    "API_KEY".to_string()
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
            path: None,
        }
    }
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            master_key: default_master_key(),
        }
    }
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
        }
    }
}

// ── Settings repository ───────────────────────────────────────────────────────

/// Resolves `<platform data dir>/settings.toml`.
///
/// # Errors
///
/// Returns [`SettingsError::NoPlatformDir`] if the base directory cannot be
/// determined.
pub fn settings_file_path() -> Result<PathBuf, SettingsError> {
    platform_data_dir()
        .map(|dir| dir.join(SETTINGS_FILE_NAME))
        .ok_or(SettingsError::NoPlatformDir)
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not found",
/// and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: &Path) -> Result<CuratorSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(CuratorSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
