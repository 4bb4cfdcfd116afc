//! Partial updates to a [`SiteConfig`].
//!
//! A [`SiteConfigPatch`] is the shape of anything that only covers part of the
//! content tree: the JSON entry read back from storage (possibly written by an
//! older build), or an operator-supplied fragment.
//!
//! # Merge rules
//!
//! - A top-level key absent from the patch leaves the current value alone.
//! - Nested objects (`hero`, `content`, `features`) merge leaf by leaf.  A
//!   patch of `{"hero": {"bg": "x"}}` replaces the background and keeps the
//!   current title, subtitle, and tagline.
//! - Image lists overlay by position.  Entry *i* of the patch replaces slot
//!   *i*; missing trailing entries keep their current value, and entries past
//!   the fixed slot count are dropped.  A list never changes length.
//!
//! Because every rule only ever replaces leaves, merging any patch onto a
//! fully populated config yields a fully populated config.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::site_config::{
    Content, ContentField, FeatureImage, Features, Hero, HeroField, ImageList, SiteConfig,
};

/// Partial [`SiteConfig`]: every top-level key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfigPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hero: Option<HeroPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ContentPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gallery: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeaturesPatch>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_url: Option<String>,
}

/// Partial [`Hero`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeroPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
}

/// Partial [`Content`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub about_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub philosophy_description: Option<String>,
}

/// Partial [`Features`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub culinary: Option<String>,
}

impl SiteConfigPatch {
    /// Parses a patch from JSON text.  Unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the text is not JSON
    /// or a known key has the wrong type.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Parses a stored entry key by key.
    ///
    /// A top-level key whose value has the wrong shape is skipped and its
    /// name returned in the second element; every other key still applies.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] only when the text is not
    /// a JSON object.
    pub fn from_json_lenient(text: &str) -> Result<(Self, Vec<String>), serde_json::Error> {
        let entries: serde_json::Map<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut patch = Self::default();
        let mut rejected = Vec::new();

        for (key, value) in entries {
            let mut single = serde_json::Map::new();
            single.insert(key.clone(), value);
            match serde_json::from_value::<Self>(serde_json::Value::Object(single)) {
                Ok(part) => patch.absorb(part),
                Err(e) => {
                    debug!("skipping stored key {key:?}: {e}");
                    rejected.push(key);
                }
            }
        }
        Ok((patch, rejected))
    }

    /// Takes every key `other` carries.
    fn absorb(&mut self, other: Self) {
        self.hero = other.hero.or(self.hero.take());
        self.content = other.content.or(self.content.take());
        self.rooms = other.rooms.or(self.rooms.take());
        self.gallery = other.gallery.or(self.gallery.take());
        self.features = other.features.or(self.features.take());
        self.loading = other.loading.or(self.loading.take());
        self.video_url = other.video_url.or(self.video_url.take());
    }

    /// A patch that touches nothing.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Builder helper: patch a single hero leaf.
    pub fn hero_field(field: HeroField, value: impl Into<String>) -> Self {
        let mut hero = HeroPatch::default();
        let value = Some(value.into());
        match field {
            HeroField::Background => hero.bg = value,
            HeroField::Title => hero.title = value,
            HeroField::Subtitle => hero.subtitle = value,
            HeroField::Tagline => hero.tagline = value,
        }
        Self {
            hero: Some(hero),
            ..Self::default()
        }
    }

    /// Builder helper: replace the video URL.
    pub fn video_url(value: impl Into<String>) -> Self {
        Self {
            video_url: Some(value.into()),
            ..Self::default()
        }
    }

    /// Builder helper: replace a whole positional image list.
    pub fn image_list(list: ImageList, urls: Vec<String>) -> Self {
        let mut patch = Self::default();
        match list {
            ImageList::Rooms => patch.rooms = Some(urls),
            ImageList::Gallery => patch.gallery = Some(urls),
            ImageList::Loading => patch.loading = Some(urls),
        }
        patch
    }
}

impl From<SiteConfig> for SiteConfigPatch {
    /// Full patch: every key and leaf present.
    fn from(cfg: SiteConfig) -> Self {
        Self {
            hero: Some(HeroPatch {
                bg: Some(cfg.hero.bg),
                title: Some(cfg.hero.title),
                subtitle: Some(cfg.hero.subtitle),
                tagline: Some(cfg.hero.tagline),
            }),
            content: Some(ContentPatch {
                about_title: Some(cfg.content.about_title),
                about_description: Some(cfg.content.about_description),
                philosophy_title: Some(cfg.content.philosophy_title),
                philosophy_description: Some(cfg.content.philosophy_description),
            }),
            rooms: Some(cfg.rooms.into()),
            gallery: Some(cfg.gallery.into()),
            features: Some(FeaturesPatch {
                main: Some(cfg.features.main),
                spa: Some(cfg.features.spa),
                culinary: Some(cfg.features.culinary),
            }),
            loading: Some(cfg.loading.into()),
            video_url: Some(cfg.video_url),
        }
    }
}

// ── Merge ─────────────────────────────────────────────────────────────────────

impl SiteConfig {
    /// Returns a copy of `self` with `patch` merged on top.
    pub fn merged(&self, patch: &SiteConfigPatch) -> SiteConfig {
        let mut next = self.clone();
        next.apply(patch);
        next
    }

    /// Merges `patch` into `self` in place.
    pub fn apply(&mut self, patch: &SiteConfigPatch) {
        if let Some(hero) = &patch.hero {
            merge_hero(&mut self.hero, hero);
        }
        if let Some(content) = &patch.content {
            merge_content(&mut self.content, content);
        }
        if let Some(features) = &patch.features {
            merge_features(&mut self.features, features);
        }
        for list in ImageList::ALL {
            let urls = match list {
                ImageList::Rooms => patch.rooms.as_deref(),
                ImageList::Gallery => patch.gallery.as_deref(),
                ImageList::Loading => patch.loading.as_deref(),
            };
            if let Some(urls) = urls {
                overlay_slots(list, self.images_mut(list), urls);
            }
        }
        if let Some(url) = &patch.video_url {
            self.video_url = url.clone();
        }
    }
}

fn merge_hero(hero: &mut Hero, patch: &HeroPatch) {
    let leaves = [
        (HeroField::Background, &patch.bg),
        (HeroField::Title, &patch.title),
        (HeroField::Subtitle, &patch.subtitle),
        (HeroField::Tagline, &patch.tagline),
    ];
    for (field, value) in leaves {
        if let Some(value) = value {
            hero.set(field, value.clone());
        }
    }
}

fn merge_content(content: &mut Content, patch: &ContentPatch) {
    let leaves = [
        (ContentField::AboutTitle, &patch.about_title),
        (ContentField::AboutDescription, &patch.about_description),
        (ContentField::PhilosophyTitle, &patch.philosophy_title),
        (ContentField::PhilosophyDescription, &patch.philosophy_description),
    ];
    for (field, value) in leaves {
        if let Some(value) = value {
            content.set(field, value.clone());
        }
    }
}

fn merge_features(features: &mut Features, patch: &FeaturesPatch) {
    let leaves = [
        (FeatureImage::Main, &patch.main),
        (FeatureImage::Spa, &patch.spa),
        (FeatureImage::Culinary, &patch.culinary),
    ];
    for (image, value) in leaves {
        if let Some(value) = value {
            features.set(image, value.clone());
        }
    }
}

fn overlay_slots(list: ImageList, slots: &mut [String], urls: &[String]) {
    if urls.len() > slots.len() {
        debug!(
            "{list}: ignoring {} entries past the {} fixed slots",
            urls.len() - slots.len(),
            slots.len()
        );
    }
    for (slot, url) in slots.iter_mut().zip(urls) {
        slot.clone_from(url);
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
