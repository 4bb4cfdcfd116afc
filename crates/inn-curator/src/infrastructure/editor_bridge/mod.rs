//! Editor command bridge: the operations the editing surface invokes.
//!
//! Every command takes the shared [`EditorState`] and returns a
//! [`CommandResult`], so a front end (the console binary today, a web panel
//! later) gets one response shape for everything:
//! `{ success: bool, data: T | null, error: string | null }`.
//!
//! Read commands (`get_config`, `get_field`) are open: the public site reads
//! the same snapshot.  Write commands require an unlocked [`AdminGate`].
//!
//! # Why tokio Mutex?
//!
//! Commands are `async` and may be invoked from several tasks.  An async
//! mutex suspends the waiting task instead of blocking the worker thread.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;

use inn_core::{ConfigPath, SiteConfig, SiteConfigPatch};

use crate::application::{
    admin_gate::AdminGate,
    config_store::{ConfigPersistence, ConfigStore},
};

// ── Shared editor state ───────────────────────────────────────────────────────

/// State shared between editor commands.
pub struct EditorState<P> {
    /// The site content store.  Its watch channel feeds every display.
    pub store: Mutex<ConfigStore<P>>,
    /// Whether the editing surface is unlocked.
    pub gate: Mutex<AdminGate>,
}

impl<P: ConfigPersistence> EditorState<P> {
    pub fn new(store: ConfigStore<P>, gate: AdminGate) -> Arc<Self> {
        Arc::new(Self {
            store: Mutex::new(store),
            gate: Mutex::new(gate),
        })
    }
}

// ── Data Transfer Objects ─────────────────────────────────────────────────────

/// One addressed value, as shown in an editor input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDto {
    pub path: String,
    pub value: String,
}

/// Unified response wrapper used by editor commands.
#[derive(Debug, Serialize, Deserialize)]
pub struct CommandResult<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
    pub fn err(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

const LOCKED: &str = "editing surface is locked";

// ── Commands ──────────────────────────────────────────────────────────────────

/// Unlocks the editing surface.
pub async fn login<P: ConfigPersistence>(state: Arc<EditorState<P>>, key: &str) -> CommandResult<()> {
    let mut gate = state.gate.lock().await;
    match gate.try_login(key, Instant::now()) {
        Ok(()) => CommandResult::ok(()),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Locks the editing surface.
pub async fn logout<P: ConfigPersistence>(state: Arc<EditorState<P>>) -> CommandResult<()> {
    state.gate.lock().await.lock();
    CommandResult::ok(())
}

/// Returns the current snapshot.
pub async fn get_config<P: ConfigPersistence>(state: Arc<EditorState<P>>) -> CommandResult<SiteConfig> {
    let store = state.store.lock().await;
    CommandResult::ok(SiteConfig::clone(&store.config()))
}

/// Returns one value addressed by an editor path such as `"gallery.3"`.
pub async fn get_field<P: ConfigPersistence>(
    state: Arc<EditorState<P>>,
    path: &str,
) -> CommandResult<FieldDto> {
    let parsed: ConfigPath = match path.parse() {
        Ok(p) => p,
        Err(e) => return CommandResult::err(e.to_string()),
    };
    let store = state.store.lock().await;
    let config = store.config();
    match config.value_at(parsed) {
        Some(value) => CommandResult::ok(FieldDto {
            path: parsed.to_string(),
            value: value.to_string(),
        }),
        None => CommandResult::err(format!("no value at {parsed}")),
    }
}

/// Writes one value addressed by an editor path.
pub async fn update_field<P: ConfigPersistence>(
    state: Arc<EditorState<P>>,
    path: &str,
    value: String,
) -> CommandResult<SiteConfig> {
    if !state.gate.lock().await.is_authenticated() {
        return CommandResult::err(LOCKED);
    }
    let parsed: ConfigPath = match path.parse() {
        Ok(p) => p,
        Err(e) => return CommandResult::err(e.to_string()),
    };

    let mut store = state.store.lock().await;
    match store.apply(parsed.with_value(value)) {
        Ok(config) => {
            info!("editor updated {parsed}");
            CommandResult::ok(SiteConfig::clone(&config))
        }
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Merges a partial JSON document into the snapshot.
pub async fn update_patch<P: ConfigPersistence>(
    state: Arc<EditorState<P>>,
    json: &str,
) -> CommandResult<SiteConfig> {
    if !state.gate.lock().await.is_authenticated() {
        return CommandResult::err(LOCKED);
    }
    let patch = match SiteConfigPatch::from_json(json) {
        Ok(p) => p,
        Err(e) => return CommandResult::err(format!("invalid patch JSON: {e}")),
    };

    let mut store = state.store.lock().await;
    match store.update(&patch) {
        Ok(config) => CommandResult::ok(SiteConfig::clone(&config)),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

/// Restores the built-in content and removes the persisted entry.
pub async fn reset_config<P: ConfigPersistence>(state: Arc<EditorState<P>>) -> CommandResult<SiteConfig> {
    if !state.gate.lock().await.is_authenticated() {
        return CommandResult::err(LOCKED);
    }
    let mut store = state.store.lock().await;
    match store.reset() {
        Ok(()) => CommandResult::ok(SiteConfig::clone(&store.config())),
        Err(e) => CommandResult::err(e.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::admin_gate::DEFAULT_MASTER_KEY;
    use crate::infrastructure::storage::key_value::{
        KeyValueStore, MemoryStore, NamespacedEntry, DEFAULT_STORAGE_KEY,
    };

    type TestState = EditorState<NamespacedEntry<Arc<MemoryStore>>>;

    /// Creates an isolated state over an in-memory store so tests never touch
    /// the real storage file.
    fn make_state() -> (Arc<TestState>, Arc<MemoryStore>) {
        let backing = Arc::new(MemoryStore::new());
        let store = ConfigStore::initialize(NamespacedEntry::site_config(Arc::clone(&backing)));
        (EditorState::new(store, AdminGate::default()), backing)
    }

    async fn unlocked_state() -> (Arc<TestState>, Arc<MemoryStore>) {
        let (state, backing) = make_state();
        assert!(login(Arc::clone(&state), DEFAULT_MASTER_KEY).await.success);
        (state, backing)
    }

    #[tokio::test]
    async fn test_get_config_returns_defaults_initially() {
        let (state, _) = make_state();

        let result = get_config(state).await;

        assert!(result.success);
        assert_eq!(result.data.unwrap(), SiteConfig::default());
    }

    #[tokio::test]
    async fn test_get_field_reads_through_editor_path() {
        let (state, _) = make_state();

        let field = get_field(state, "hero.title").await.data.unwrap();

        assert_eq!(field.value, "Ship");
    }

    #[tokio::test]
    async fn test_get_field_returns_normalised_path() {
        let (state, _) = make_state();

        let field = get_field(state, "gallery[0]").await.data.unwrap();

        assert_eq!(field.path, "gallery.0");
        assert_eq!(field.value, SiteConfig::default().gallery[0]);
    }

    #[tokio::test]
    async fn test_writes_are_refused_while_locked() {
        // Arrange
        let (state, backing) = make_state();

        // Act
        let result = update_field(Arc::clone(&state), "hero.title", "Anchor".into()).await;

        // Assert
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some(LOCKED));
        assert_eq!(backing.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_wrong_key_does_not_unlock() {
        let (state, _) = make_state();

        let result = login(Arc::clone(&state), "guess").await;

        assert!(!result.success);
        assert!(!update_patch(state, r#"{"videoUrl":"x"}"#).await.success);
    }

    #[tokio::test]
    async fn test_update_field_persists_and_returns_snapshot() {
        // Arrange
        let (state, backing) = unlocked_state().await;

        // Act
        let result = update_field(Arc::clone(&state), "gallery.3", "new-url".into()).await;

        // Assert
        let config = result.data.expect("update succeeds");
        assert_eq!(config.gallery[3], "new-url");
        let persisted = backing.get(DEFAULT_STORAGE_KEY).unwrap().expect("entry saved");
        assert!(persisted.contains("new-url"));
    }

    #[tokio::test]
    async fn test_update_field_rejects_unknown_path() {
        let (state, _) = unlocked_state().await;

        let result = update_field(state, "hero.colour", "red".into()).await;

        assert!(!result.success);
        assert!(result.error.unwrap().contains("hero.colour"));
    }

    #[tokio::test]
    async fn test_update_patch_rejects_malformed_json() {
        let (state, _) = unlocked_state().await;

        let result = update_patch(state, "{ not json").await;

        assert!(!result.success);
        assert!(result.error.unwrap().starts_with("invalid patch JSON"));
    }

    #[tokio::test]
    async fn test_reset_restores_defaults_and_clears_entry() {
        // Arrange
        let (state, backing) = unlocked_state().await;
        update_patch(Arc::clone(&state), r#"{"hero":{"title":"Anchor"}}"#).await;

        // Act
        let result = reset_config(Arc::clone(&state)).await;

        // Assert
        assert_eq!(result.data.unwrap().hero.title, "Ship");
        assert_eq!(backing.get(DEFAULT_STORAGE_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_locks_again() {
        let (state, _) = unlocked_state().await;

        logout(Arc::clone(&state)).await;

        assert!(!reset_config(state).await.success);
    }
}
