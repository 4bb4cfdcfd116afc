//! Integration tests for the config store over the real storage adapters.
//!
//! Each test gets its own storage file under the system temp directory, so
//! "reloading the page" is re-initialising a store over the same file.

use std::path::PathBuf;
use std::sync::Arc;

use inn_core::{HeroField, ImageList, SiteConfig, SiteConfigPatch};
use inn_curator::application::config_store::{ConfigStore, StoreError};
use inn_curator::infrastructure::storage::key_value::{
    JsonFileStore, KeyValueStore, MemoryStore, NamespacedEntry, DEFAULT_STORAGE_KEY,
};
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

struct TempStorage {
    dir: PathBuf,
    file: PathBuf,
}

impl TempStorage {
    fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("inn_store_it_{}", Uuid::new_v4()));
        let file = dir.join("storage.json");
        Self { dir, file }
    }

    fn open(&self) -> ConfigStore<NamespacedEntry<JsonFileStore>> {
        ConfigStore::initialize(NamespacedEntry::site_config(JsonFileStore::new(&self.file)))
    }

    fn raw_entry(&self) -> Option<String> {
        JsonFileStore::new(&self.file)
            .get(DEFAULT_STORAGE_KEY)
            .expect("storage file readable")
    }
}

impl Drop for TempStorage {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.dir).ok();
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn test_edit_reload_reset_reload_scenario() {
    let storage = TempStorage::new();

    // Fresh start: nothing stored, defaults published.
    let mut store = storage.open();
    assert_eq!(store.config().hero.title, "Ship");

    // Edit survives a reload.
    store
        .update(&SiteConfigPatch::hero_field(HeroField::Title, "Anchor"))
        .expect("update");
    assert_eq!(store.config().hero.title, "Anchor");
    let mut store = storage.open();
    assert_eq!(store.config().hero.title, "Anchor");

    // Reset removes the entry; the next reload starts from defaults.
    store.reset().expect("reset");
    assert_eq!(store.config().hero.title, "Ship");
    assert_eq!(storage.raw_entry(), None);
    assert_eq!(*storage.open().config(), SiteConfig::default());
}

#[test]
fn test_reinitialising_from_persisted_entry_is_idempotent() {
    // Arrange
    let storage = TempStorage::new();
    let mut store = storage.open();
    store
        .update_array_field(ImageList::Rooms, 5, "https://example.com/loft.jpg")
        .unwrap();
    store
        .update(&SiteConfigPatch::video_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    // Act
    let first = storage.open().config();
    let second = storage.open().config();

    // Assert
    assert_eq!(*first, *store.config());
    assert_eq!(first, second);
}

#[test]
fn test_persisted_entry_uses_camel_case_keys() {
    let storage = TempStorage::new();
    storage
        .open()
        .update(&SiteConfigPatch::video_url("dQw4w9WgXcQ"))
        .unwrap();

    let raw = storage.raw_entry().expect("entry saved");
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    assert_eq!(value["videoUrl"], "dQw4w9WgXcQ");
    assert!(value["content"]["aboutTitle"].is_string());
    assert_eq!(value["gallery"].as_array().map(Vec::len), Some(8));
}

// ── Merge rules ───────────────────────────────────────────────────────────────

#[test]
fn test_video_url_only_patch_leaves_everything_else() {
    let mut store = ConfigStore::initialize(NamespacedEntry::site_config(MemoryStore::new()));
    let before = store.config();

    let after = store
        .update(&SiteConfigPatch::video_url("https://youtu.be/dQw4w9WgXcQ"))
        .unwrap();

    let mut expected = SiteConfig::clone(&before);
    expected.video_url = "https://youtu.be/dQw4w9WgXcQ".to_string();
    assert_eq!(*after, expected);
}

#[test]
fn test_partial_hero_patch_keeps_sibling_fields() {
    // A nested patch naming only `bg` must not drop title/subtitle/tagline.
    let mut store = ConfigStore::initialize(NamespacedEntry::site_config(MemoryStore::new()));
    let patch = SiteConfigPatch::from_json(r#"{"hero":{"bg":"Y"}}"#).unwrap();

    let after = store.update(&patch).unwrap();

    let defaults = SiteConfig::default();
    assert_eq!(after.hero.bg, "Y");
    assert_eq!(after.hero.title, defaults.hero.title);
    assert_eq!(after.hero.subtitle, defaults.hero.subtitle);
    assert_eq!(after.hero.tagline, defaults.hero.tagline);
}

#[test]
fn test_gallery_slot_update_changes_exactly_one_index() {
    let mut store = ConfigStore::initialize(NamespacedEntry::site_config(MemoryStore::new()));
    let before = store.config();

    let after = store
        .update_array_field(ImageList::Gallery, 3, "new-url")
        .unwrap();

    assert_eq!(after.gallery.len(), 8);
    for i in 0..8 {
        let expected = if i == 3 { "new-url" } else { before.gallery[i].as_str() };
        assert_eq!(after.gallery[i], expected, "gallery[{i}]");
    }
}

#[test]
fn test_out_of_range_slot_leaves_state_and_storage_untouched() {
    let backing = Arc::new(MemoryStore::new());
    let mut store = ConfigStore::initialize(NamespacedEntry::site_config(Arc::clone(&backing)));

    let result = store.update_array_field(ImageList::Loading, 4, "x");

    assert!(matches!(result, Err(StoreError::Edit(_))));
    assert_eq!(*store.config(), SiteConfig::default());
    assert_eq!(backing.get(DEFAULT_STORAGE_KEY).unwrap(), None);
}

// ── Failure handling ──────────────────────────────────────────────────────────

#[test]
fn test_corrupt_storage_file_starts_from_defaults_and_recovers_on_next_edit() {
    // Arrange
    let storage = TempStorage::new();
    std::fs::create_dir_all(&storage.dir).unwrap();
    std::fs::write(&storage.file, "not json at all").unwrap();

    // Act
    let mut store = storage.open();
    let defaults_on_load = *store.config() == SiteConfig::default();
    store
        .update(&SiteConfigPatch::hero_field(HeroField::Title, "Anchor"))
        .expect("write moves the corrupt file aside");

    // Assert
    assert!(defaults_on_load);
    assert_eq!(storage.open().config().hero.title, "Anchor");
    assert!(storage.dir.join("storage.json.corrupt").exists());
}

#[test]
fn test_reset_over_corrupt_storage_file_succeeds_and_later_edits_persist() {
    // Arrange
    let storage = TempStorage::new();
    std::fs::create_dir_all(&storage.dir).unwrap();
    std::fs::write(&storage.file, "truncated{").unwrap();
    let mut store = storage.open();

    // Act
    let reset = store.reset();
    let update = store.update(&SiteConfigPatch::video_url("dQw4w9WgXcQ"));

    // Assert
    assert!(reset.is_ok(), "reset failed: {reset:?}");
    assert!(update.is_ok(), "update failed: {update:?}");
    assert_eq!(storage.open().config().video_url, "dQw4w9WgXcQ");
}

#[test]
fn test_malformed_key_in_stored_entry_does_not_discard_the_rest() {
    let backing = Arc::new(MemoryStore::new());
    backing
        .set(
            DEFAULT_STORAGE_KEY,
            r#"{"hero":{"title":"Anchor"},"gallery":["a",null,"c"]}"#,
        )
        .unwrap();

    let store = ConfigStore::initialize(NamespacedEntry::site_config(Arc::clone(&backing)));

    assert_eq!(store.config().hero.title, "Anchor");
    assert_eq!(store.config().gallery, SiteConfig::default().gallery);
}

#[test]
fn test_unparseable_entry_falls_back_to_defaults() {
    let backing = Arc::new(MemoryStore::new());
    backing.set(DEFAULT_STORAGE_KEY, "{\"hero\": ").unwrap();

    let store = ConfigStore::initialize(NamespacedEntry::site_config(Arc::clone(&backing)));

    assert_eq!(*store.config(), SiteConfig::default());
}

// ── Propagation ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_subscriber_sees_update_as_one_snapshot() {
    // Arrange
    let mut store = ConfigStore::initialize(NamespacedEntry::site_config(MemoryStore::new()));
    let mut rx = store.subscribe();

    // Act
    store
        .update(&SiteConfigPatch::from_json(r#"{"hero":{"title":"Anchor","subtitle":"Hotel."}}"#).unwrap())
        .unwrap();

    // Assert
    rx.changed().await.expect("sender alive");
    let seen = rx.borrow_and_update().clone();
    assert_eq!(seen.hero.title, "Anchor");
    assert_eq!(seen.hero.subtitle, "Hotel.");
}
