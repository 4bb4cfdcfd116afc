//! # inn-core
//!
//! Shared content model for the heritage inn website.  Every piece of
//! editable visual content (hero text, room and gallery images, feature
//! images, loading-screen imagery, the atmosphere video) lives in one
//! [`SiteConfig`] tree defined here.
//!
//! This crate has zero dependencies on storage, networking, or UI
//! frameworks.  The config store in `inn-curator` owns a `SiteConfig`
//! snapshot and uses the types here to merge, edit, and serialize it.
//!
//! # Architecture overview
//!
//! - **`domain::site_config`** – The content tree, its built-in defaults, and
//!   typed selectors for every editable leaf and image slot.
//!
//! - **`domain::patch`** – Partial updates.  A [`SiteConfigPatch`] is what
//!   gets parsed from persisted JSON and merged onto the defaults at startup.
//!
//! - **`domain::edit`** – Typed update commands ([`ConfigEdit`]), one per
//!   editable leaf or image slot, plus [`ConfigPath`] for the `"hero.bg"`
//!   style paths the editing surface uses.
//!
//! - **`domain::video`** – Normalises the stored video URL (or bare video id)
//!   into an embeddable player URL.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `inn_core::SiteConfig` instead of `inn_core::domain::site_config::SiteConfig`.
pub use domain::edit::{ConfigEdit, ConfigPath, EditError};
pub use domain::patch::{ContentPatch, FeaturesPatch, HeroPatch, SiteConfigPatch};
pub use domain::site_config::{
    Content, ContentField, FeatureImage, Features, Hero, HeroField, ImageList, SiteConfig,
    GALLERY_SLOTS, LOADING_SLOTS, ROOM_SLOTS,
};
pub use domain::video::{resolve_embed_url, DEFAULT_VIDEO_ID};
