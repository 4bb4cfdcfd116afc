//! Inn Curator: operator console for the heritage inn website.
//!
//! Drives the same config store, admin gate, and concierge bridge the site
//! uses, against the persisted storage file.
//!
//! # Usage
//!
//! ```text
//! inn-curator [OPTIONS] <COMMAND>
//!
//! Commands:
//!   show  [--json]                 Print the current site content
//!   get   <PATH>                   Print one value, e.g. `hero.title` or `gallery.3`
//!   set   <PATH> <VALUE> --key K   Change one value
//!   patch <JSON> --key K           Merge a partial JSON document
//!   reset --key K                  Restore the built-in content
//!   video [--origin URL]           Print the atmosphere video embed URL
//!   ask   <MESSAGE>...             Ask the concierge, one session for all messages
//!
//! Options:
//!   --settings <PATH>   Settings TOML  [env: INN_SETTINGS]
//!   --storage  <PATH>   Storage file   [env: INN_STORAGE]
//!   --ephemeral         Keep changes in memory only
//! ```
//!
//! The editor key can also be supplied through `INN_ADMIN_KEY`.  The
//! concierge reads its API key from the variable named in the settings file
//! (`API_KEY` by default) and answers offline without it.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use inn_core::{resolve_embed_url, ConfigPath, ContentField, FeatureImage, HeroField, ImageList};
use inn_curator::application::{
    admin_gate::AdminGate,
    concierge::{ConciergeBridge, ConciergeChat},
    config_store::{ConfigPersistence, ConfigStore},
};
use inn_curator::infrastructure::{
    editor_bridge::{self, CommandResult, EditorState},
    gemini::GeminiBackend,
    settings::{load_settings, settings_file_path, CuratorSettings},
    storage::key_value::{JsonFileStore, KeyValueStore, MemoryStore, NamespacedEntry},
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Operator console for the heritage inn website.
#[derive(Debug, Parser)]
#[command(
    name = "inn-curator",
    about = "Edit the heritage inn site content and talk to its concierge",
    version
)]
struct Cli {
    /// Settings file.  Defaults to `settings.toml` in the platform data dir.
    #[arg(long, env = "INN_SETTINGS")]
    settings: Option<PathBuf>,

    /// Storage file.  Overrides `[storage] path` from the settings file.
    #[arg(long, env = "INN_STORAGE")]
    storage: Option<PathBuf>,

    /// Keep every change in memory; nothing is read from or written to disk.
    #[arg(long)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the current site content.
    Show {
        /// Print the persisted JSON layout instead of one line per field.
        #[arg(long)]
        json: bool,
    },

    /// Print one value.
    Get {
        /// Editor path such as `hero.bg`, `content.aboutTitle`, or `rooms[2]`.
        path: String,
    },

    /// Change one value.
    Set {
        path: String,
        value: String,
        /// Editing surface key.
        #[arg(long, env = "INN_ADMIN_KEY", hide_env_values = true)]
        key: String,
    },

    /// Merge a partial JSON document, e.g. `{"hero":{"title":"Anchor"}}`.
    Patch {
        json: String,
        #[arg(long, env = "INN_ADMIN_KEY", hide_env_values = true)]
        key: String,
    },

    /// Restore the built-in content and remove the stored entry.
    Reset {
        #[arg(long, env = "INN_ADMIN_KEY", hide_env_values = true)]
        key: String,
    },

    /// Print the embed URL the atmosphere player would load.
    Video {
        /// Origin of the page embedding the player.
        #[arg(long, default_value = "http://localhost")]
        origin: String,
    },

    /// Ask the concierge.  All messages share one conversation.
    Ask {
        #[arg(required = true)]
        messages: Vec<String>,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = resolve_settings(cli.settings.as_deref())?;

    let backing: Arc<dyn KeyValueStore + Send + Sync> = if cli.ephemeral {
        info!("ephemeral session: changes are kept in memory only");
        Arc::new(MemoryStore::new())
    } else {
        let file = match cli.storage.or_else(|| settings.storage.path.clone()) {
            Some(path) => JsonFileStore::new(path),
            None => JsonFileStore::at_default_location()
                .context("no --storage given and no platform data dir")?,
        };
        info!("using storage file {}", file.path().display());
        Arc::new(file)
    };

    let store = ConfigStore::initialize(NamespacedEntry::new(backing, settings.storage.key.clone()));
    let state = EditorState::new(store, AdminGate::new(settings.admin.master_key.clone()));

    match cli.command {
        Command::Show { json } => {
            let config = into_result(editor_bridge::get_config(state).await)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                for path in all_paths() {
                    println!("{path} = {}", config.value_at(path).unwrap_or_default());
                }
            }
        }
        Command::Get { path } => {
            let field = into_result(editor_bridge::get_field(state, &path).await)?;
            println!("{}", field.value);
        }
        Command::Set { path, value, key } => {
            unlock(&state, &key).await?;
            into_result(editor_bridge::update_field(state, &path, value).await)
                .with_context(|| format!("failed to set {path}"))?;
            println!("updated {path}");
        }
        Command::Patch { json, key } => {
            unlock(&state, &key).await?;
            into_result(editor_bridge::update_patch(state, &json).await)
                .context("failed to apply patch")?;
            println!("patch applied");
        }
        Command::Reset { key } => {
            unlock(&state, &key).await?;
            into_result(editor_bridge::reset_config(state).await)
                .context("failed to reset site content")?;
            println!("site content reset to defaults");
        }
        Command::Video { origin } => {
            let config = into_result(editor_bridge::get_config(state).await)?;
            match resolve_embed_url(&config.video_url, &origin) {
                Some(url) => println!("{url}"),
                None => println!("no atmosphere video configured"),
            }
        }
        Command::Ask { messages } => {
            let backend = GeminiBackend::from_env(&settings.assistant)
                .context("failed to set up the concierge backend")?;
            let mut chat = ConciergeChat::new(ConciergeBridge::new(backend));
            if let Some(greeting) = chat.transcript().first() {
                println!("concierge: {}", greeting.text);
            }
            for message in &messages {
                if let Some(reply) = chat.send(message).await {
                    println!("you: {message}");
                    println!("concierge: {}", reply.text);
                }
            }
        }
    }

    Ok(())
}

/// Loads the explicit settings file, or the platform default one.
fn resolve_settings(explicit: Option<&std::path::Path>) -> anyhow::Result<CuratorSettings> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match settings_file_path() {
            Ok(path) => path,
            Err(e) => {
                warn!("{e}; using built-in settings");
                return Ok(CuratorSettings::default());
            }
        },
    };
    load_settings(&path).with_context(|| format!("failed to load settings from {}", path.display()))
}

async fn unlock<P: ConfigPersistence>(state: &Arc<EditorState<P>>, key: &str) -> anyhow::Result<()> {
    into_result(editor_bridge::login(Arc::clone(state), key).await)
}

fn into_result<T: serde::Serialize>(result: CommandResult<T>) -> anyhow::Result<T> {
    match (result.success, result.data) {
        (true, Some(data)) => Ok(data),
        _ => bail!(result.error.unwrap_or_else(|| "command failed".to_string())),
    }
}

/// Every editable path, in display order.
fn all_paths() -> Vec<ConfigPath> {
    let mut paths: Vec<ConfigPath> = HeroField::ALL.into_iter().map(ConfigPath::Hero).collect();
    paths.extend(ContentField::ALL.into_iter().map(ConfigPath::Content));
    paths.extend(FeatureImage::ALL.into_iter().map(ConfigPath::Feature));
    for list in ImageList::ALL {
        paths.extend((0..list.slots()).map(|index| ConfigPath::Slot { list, index }));
    }
    paths.push(ConfigPath::VideoUrl);
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use inn_core::SiteConfig;

    #[test]
    fn test_all_paths_covers_every_value() {
        let config = SiteConfig::default();
        let paths = all_paths();

        assert_eq!(paths.len(), 4 + 4 + 3 + 6 + 8 + 4 + 1);
        assert!(paths.iter().all(|p| config.value_at(*p).is_some()));
    }

    #[test]
    fn test_cli_parses_set_with_key() {
        let cli = Cli::try_parse_from(["inn-curator", "set", "gallery.3", "u", "--key", "k"]).unwrap();
        assert!(matches!(cli.command, Command::Set { ref path, .. } if path == "gallery.3"));
    }

    #[test]
    fn test_cli_requires_at_least_one_question() {
        assert!(Cli::try_parse_from(["inn-curator", "ask"]).is_err());
    }
}
