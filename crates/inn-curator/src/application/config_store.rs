//! ConfigStore: the single source of truth for the site content.
//!
//! The store owns one [`SiteConfig`] snapshot per session.  It is created
//! explicitly with [`ConfigStore::initialize`] and handed to whatever needs
//! it; there is no global instance.
//!
//! # Lifecycle
//!
//! ```text
//! initialize(persistence)
//!   └─ load()  ── absent / unreadable / unparseable ──►  defaults
//!             └─ JSON text ──► defaults merged with parsed patch
//!
//! update(patch) / apply(edit) / update_array_field(..)
//!   └─ merge onto current snapshot ──► publish ──► save(full JSON)
//!
//! reset()
//!   └─ publish defaults ──► clear()
//! ```
//!
//! # Propagation
//!
//! Snapshots are published through a `tokio::sync::watch` channel of
//! `Arc<SiteConfig>`.  Each publish replaces the whole `Arc`, so a receiver
//! sees either the previous snapshot or the next one, never a half-merged
//! tree.  Mutators take `&mut self`: there is exactly one writer.
//!
//! # Persistence failures
//!
//! A failed save or clear never rolls the published snapshot back.  The
//! failure is logged and returned as [`StoreError::Persist`] so the caller
//! can tell the operator the change will not survive a reload.

use std::sync::Arc;

use inn_core::{ConfigEdit, EditError, ImageList, SiteConfig, SiteConfigPatch};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Failure reported by a [`ConfigPersistence`] adapter.
///
/// Adapters keep their own concrete error types; the store only logs and
/// forwards them.
pub type PersistenceError = Box<dyn std::error::Error + Send + Sync>;

/// Error type for store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The edit was rejected; nothing was published or persisted.
    #[error("edit rejected: {0}")]
    Edit(#[from] EditError),

    /// The snapshot was published but could not be persisted.
    #[error("change applied but not persisted: {0}")]
    Persist(#[source] PersistenceError),

    /// The snapshot could not be serialized.
    #[error("failed to serialize site config: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where the serialized snapshot lives between sessions.
///
/// One entry, one key: implementations are bound to the namespace key at
/// construction time.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigPersistence {
    /// Returns the stored JSON text, or `None` if nothing has been saved.
    fn load(&self) -> Result<Option<String>, PersistenceError>;

    /// Replaces the stored JSON text.
    fn save(&self, json: &str) -> Result<(), PersistenceError>;

    /// Removes the entry entirely.
    fn clear(&self) -> Result<(), PersistenceError>;
}

/// Owns the current [`SiteConfig`] snapshot and its persisted copy.
pub struct ConfigStore<P> {
    persistence: P,
    tx: watch::Sender<Arc<SiteConfig>>,
}

impl<P: ConfigPersistence> ConfigStore<P> {
    /// Loads the persisted entry (if any), merges it onto the defaults, and
    /// publishes the result.
    ///
    /// Never fails: an unreadable or unparseable entry is logged and the
    /// store starts from the defaults.
    pub fn initialize(persistence: P) -> Self {
        let initial = load_initial(&persistence);
        let (tx, _rx) = watch::channel(Arc::new(initial));
        Self { persistence, tx }
    }

    /// Returns the current snapshot.
    pub fn config(&self) -> Arc<SiteConfig> {
        Arc::clone(&self.tx.borrow())
    }

    /// Returns a receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SiteConfig>> {
        self.tx.subscribe()
    }

    /// Merges `patch` onto the current snapshot, publishes, and persists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the new snapshot could not be saved.
    /// The snapshot is published regardless.
    pub fn update(&mut self, patch: &SiteConfigPatch) -> Result<Arc<SiteConfig>, StoreError> {
        if patch.is_empty() {
            debug!("ignoring empty config patch");
            return Ok(self.config());
        }
        let next = self.config().merged(patch);
        self.commit(next)
    }

    /// Applies one typed edit, publishes, and persists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Edit`] (nothing published) if the edit targets a
    /// slot past the end of its list, or [`StoreError::Persist`] as for
    /// [`update`](Self::update).
    pub fn apply(&mut self, edit: ConfigEdit) -> Result<Arc<SiteConfig>, StoreError> {
        let path = edit.path();
        let mut next = SiteConfig::clone(&self.config());
        edit.apply_to(&mut next)?;
        debug!("applied edit to {path}");
        self.commit(next)
    }

    /// Replaces one slot of a positional image list.
    ///
    /// The list is copied, the single index changed, and the whole list
    /// written back, so length and every other slot are preserved.
    ///
    /// # Errors
    ///
    /// Same as [`apply`](Self::apply).
    pub fn update_array_field(
        &mut self,
        list: ImageList,
        index: usize,
        url: impl Into<String>,
    ) -> Result<Arc<SiteConfig>, StoreError> {
        let mut urls = self.config().images(list).to_vec();
        let slots = urls.len();
        let slot = urls
            .get_mut(index)
            .ok_or(EditError::SlotOutOfRange { list, index, slots })?;
        *slot = url.into();
        self.update(&SiteConfigPatch::image_list(list, urls))
    }

    /// Restores the built-in defaults and removes the persisted entry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Persist`] if the entry could not be removed.
    /// The defaults are published regardless.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.tx.send_replace(Arc::new(SiteConfig::default()));
        info!("site config reset to defaults");
        self.persistence.clear().map_err(|e| {
            warn!("failed to clear persisted site config: {e}");
            StoreError::Persist(e)
        })
    }

    fn commit(&mut self, next: SiteConfig) -> Result<Arc<SiteConfig>, StoreError> {
        let json = serde_json::to_string(&next)?;
        let snapshot = Arc::new(next);
        self.tx.send_replace(Arc::clone(&snapshot));

        self.persistence.save(&json).map_err(|e| {
            warn!("failed to persist site config: {e}");
            StoreError::Persist(e)
        })?;
        Ok(snapshot)
    }
}

fn load_initial(persistence: &impl ConfigPersistence) -> SiteConfig {
    let stored = match persistence.load() {
        Ok(Some(text)) => text,
        Ok(None) => {
            debug!("no persisted site config; using defaults");
            return SiteConfig::default();
        }
        Err(e) => {
            warn!("failed to read persisted site config, using defaults: {e}");
            return SiteConfig::default();
        }
    };

    match SiteConfigPatch::from_json_lenient(&stored) {
        Ok((patch, rejected)) => {
            for key in &rejected {
                warn!("ignoring malformed persisted key {key:?}; keeping its default");
            }
            info!("loaded persisted site config");
            SiteConfig::default().merged(&patch)
        }
        Err(e) => {
            warn!("failed to parse persisted site config, using defaults: {e}");
            SiteConfig::default()
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
