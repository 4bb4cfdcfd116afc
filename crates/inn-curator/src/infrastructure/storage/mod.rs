//! Key-value persistence for the site config.
//!
//! The site config lives as one JSON string under a namespaced key, the same
//! way a browser keeps it in local storage.  [`key_value::JsonFileStore`] is
//! the on-disk stand-in for that storage.
//!
//! The default file location and the settings file share one platform data
//! directory, see [`platform_data_dir`].

use std::path::PathBuf;

use thiserror::Error;

pub mod key_value;

/// Error type for key-value storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The platform data directory could not be determined.
    #[error("could not determine platform storage directory")]
    NoPlatformDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing storage at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backing file exists but is not a JSON object of strings.
    #[error("storage file {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Name of the per-user directory holding the storage and settings files.
const APP_DIR_NAME: &str = "innheritage";

/// Resolves the platform directory for this application's files.
///
/// - Windows:  `%APPDATA%\innheritage`
/// - Linux:    `$XDG_CONFIG_HOME/innheritage` or `~/.config/innheritage`
/// - macOS:    `~/Library/Application Support/innheritage`
pub fn platform_data_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join(APP_DIR_NAME))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join(APP_DIR_NAME))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join(APP_DIR_NAME)
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}
