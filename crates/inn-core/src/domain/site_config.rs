//! The editable site content tree.
//!
//! [`SiteConfig`] is always fully populated: every leaf holds either its
//! built-in default or an operator override.  Image lists are fixed-size
//! arrays, so index *i* of `gallery` is always "gallery image *i*" everywhere
//! in the site and no list can grow or shrink.
//!
//! # Persisted layout
//!
//! The tree serializes to JSON with camelCase keys:
//!
//! ```json
//! {
//!   "hero": { "bg": "...", "title": "Ship", "subtitle": "Inn Stanley.", "tagline": "..." },
//!   "content": { "aboutTitle": "...", "aboutDescription": "...", ... },
//!   "rooms": ["...", "...", "...", "...", "...", "..."],
//!   "gallery": ["...", ...],
//!   "features": { "main": "...", "spa": "...", "culinary": "..." },
//!   "loading": ["...", "...", "...", "..."],
//!   "videoUrl": "https://www.youtube.com/embed/b0PwAGnD8Cc"
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of room showcase images.
pub const ROOM_SLOTS: usize = 6;
/// Number of gallery images.
pub const GALLERY_SLOTS: usize = 8;
/// Number of loading-screen images.
pub const LOADING_SLOTS: usize = 4;

// ── Content tree ──────────────────────────────────────────────────────────────

/// Root of all editable site content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    pub hero: Hero,
    pub content: Content,
    pub rooms: [String; ROOM_SLOTS],
    pub gallery: [String; GALLERY_SLOTS],
    pub features: Features,
    pub loading: [String; LOADING_SLOTS],
    /// Either a full video URL or a bare platform video id.
    pub video_url: String,
}

/// Hero banner: background image plus the two-part heading and tagline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hero {
    /// Background image URL.
    pub bg: String,
    /// First heading fragment.
    pub title: String,
    /// Second heading fragment.
    pub subtitle: String,
    pub tagline: String,
}

/// Free-text copy for the about and philosophy sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub about_title: String,
    pub about_description: String,
    pub philosophy_title: String,
    pub philosophy_description: String,
}

/// Feature section imagery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Features {
    pub main: String,
    pub spa: String,
    pub culinary: String,
}

// ── Typed selectors ───────────────────────────────────────────────────────────

/// One editable leaf of [`Hero`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeroField {
    Background,
    Title,
    Subtitle,
    Tagline,
}

impl HeroField {
    pub const ALL: [HeroField; 4] = [
        HeroField::Background,
        HeroField::Title,
        HeroField::Subtitle,
        HeroField::Tagline,
    ];

    /// The persisted JSON key for this leaf.
    pub fn key(self) -> &'static str {
        match self {
            HeroField::Background => "bg",
            HeroField::Title => "title",
            HeroField::Subtitle => "subtitle",
            HeroField::Tagline => "tagline",
        }
    }
}

/// One editable leaf of [`Content`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentField {
    AboutTitle,
    AboutDescription,
    PhilosophyTitle,
    PhilosophyDescription,
}

impl ContentField {
    pub const ALL: [ContentField; 4] = [
        ContentField::AboutTitle,
        ContentField::AboutDescription,
        ContentField::PhilosophyTitle,
        ContentField::PhilosophyDescription,
    ];

    /// The persisted JSON key for this leaf.
    pub fn key(self) -> &'static str {
        match self {
            ContentField::AboutTitle => "aboutTitle",
            ContentField::AboutDescription => "aboutDescription",
            ContentField::PhilosophyTitle => "philosophyTitle",
            ContentField::PhilosophyDescription => "philosophyDescription",
        }
    }
}

/// One image of [`Features`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureImage {
    Main,
    Spa,
    Culinary,
}

impl FeatureImage {
    pub const ALL: [FeatureImage; 3] = [FeatureImage::Main, FeatureImage::Spa, FeatureImage::Culinary];

    /// The persisted JSON key for this image.
    pub fn key(self) -> &'static str {
        match self {
            FeatureImage::Main => "main",
            FeatureImage::Spa => "spa",
            FeatureImage::Culinary => "culinary",
        }
    }
}

/// One of the positional image lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageList {
    Rooms,
    Gallery,
    Loading,
}

impl ImageList {
    pub const ALL: [ImageList; 3] = [ImageList::Rooms, ImageList::Gallery, ImageList::Loading];

    /// The persisted JSON key for this list.
    pub fn key(self) -> &'static str {
        match self {
            ImageList::Rooms => "rooms",
            ImageList::Gallery => "gallery",
            ImageList::Loading => "loading",
        }
    }

    /// Fixed number of slots in this list.
    pub fn slots(self) -> usize {
        match self {
            ImageList::Rooms => ROOM_SLOTS,
            ImageList::Gallery => GALLERY_SLOTS,
            ImageList::Loading => LOADING_SLOTS,
        }
    }
}

impl fmt::Display for ImageList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ── Accessor / mutator pairs ──────────────────────────────────────────────────

impl Hero {
    pub fn get(&self, field: HeroField) -> &str {
        match field {
            HeroField::Background => &self.bg,
            HeroField::Title => &self.title,
            HeroField::Subtitle => &self.subtitle,
            HeroField::Tagline => &self.tagline,
        }
    }

    pub fn set(&mut self, field: HeroField, value: String) {
        match field {
            HeroField::Background => self.bg = value,
            HeroField::Title => self.title = value,
            HeroField::Subtitle => self.subtitle = value,
            HeroField::Tagline => self.tagline = value,
        }
    }
}

impl Content {
    pub fn get(&self, field: ContentField) -> &str {
        match field {
            ContentField::AboutTitle => &self.about_title,
            ContentField::AboutDescription => &self.about_description,
            ContentField::PhilosophyTitle => &self.philosophy_title,
            ContentField::PhilosophyDescription => &self.philosophy_description,
        }
    }

    pub fn set(&mut self, field: ContentField, value: String) {
        match field {
            ContentField::AboutTitle => self.about_title = value,
            ContentField::AboutDescription => self.about_description = value,
            ContentField::PhilosophyTitle => self.philosophy_title = value,
            ContentField::PhilosophyDescription => self.philosophy_description = value,
        }
    }
}

impl Features {
    pub fn get(&self, image: FeatureImage) -> &str {
        match image {
            FeatureImage::Main => &self.main,
            FeatureImage::Spa => &self.spa,
            FeatureImage::Culinary => &self.culinary,
        }
    }

    pub fn set(&mut self, image: FeatureImage, value: String) {
        match image {
            FeatureImage::Main => self.main = value,
            FeatureImage::Spa => self.spa = value,
            FeatureImage::Culinary => self.culinary = value,
        }
    }
}

impl SiteConfig {
    /// Returns the slots of one positional image list.
    ///
    /// The slice length always equals [`ImageList::slots`].
    pub fn images(&self, list: ImageList) -> &[String] {
        match list {
            ImageList::Rooms => &self.rooms,
            ImageList::Gallery => &self.gallery,
            ImageList::Loading => &self.loading,
        }
    }

    /// Mutable view of one positional image list.  Length cannot change.
    pub fn images_mut(&mut self, list: ImageList) -> &mut [String] {
        match list {
            ImageList::Rooms => &mut self.rooms,
            ImageList::Gallery => &mut self.gallery,
            ImageList::Loading => &mut self.loading,
        }
    }
}

// ── Built-in defaults ─────────────────────────────────────────────────────────

fn unsplash(photo: &str, width: u32) -> String {
    format!("https://images.unsplash.com/photo-{photo}?q=80&w={width}&auto=format&fit=crop")
}

fn default_hero() -> Hero {
    Hero {
        bg: "https://images.squarespace-cdn.com/content/v1/5c9b1392815512293441a1a7/1563254444535-W9O4E7W7P7W7W7W7W7W7/Ship+Inn+Stanley+Exterior.jpg".to_string(),
        title: "Ship".to_string(),
        subtitle: "Inn Stanley.".to_string(),
        tagline: "A collection of heritage-listed sanctuaries nestled at the base of the iconic Circular Head Nut.".to_string(),
    }
}

fn default_content() -> Content {
    Content {
        about_title: "About Us".to_string(),
        about_description: "At Ship Inn Stanley\u{2122} we specialize in connecting guests with exceptional Tasmanian hospitality. With years of expertise and a guest-first approach, we make heritage luxury simple and stress-free.".to_string(),
        philosophy_title: "A symphony of natural elegance.".to_string(),
        philosophy_description: "We believe luxury isn't about excess, but the perfect harmony between silence, space, and spirit.".to_string(),
    }
}

fn default_rooms() -> [String; ROOM_SLOTS] {
    [
        unsplash("1560185007-c5ca9d2c014d", 2070),
        unsplash("1616594831818-844000302b0c", 2070),
        unsplash("1600607687920-4e2a09cf159d", 2070),
        unsplash("1554995207-c18c203602cb", 2070),
        unsplash("1560448204-e02f11c3d0e2", 2070),
        unsplash("1600566752355-3979ff6942bc", 2070),
    ]
}

fn default_gallery() -> [String; GALLERY_SLOTS] {
    [
        unsplash("1518780664697-55e3ad937233", 2000),
        unsplash("1506450654448-65f04e0ba6ad", 2069),
        unsplash("1498503182468-3b51cbb6cb24", 2070),
        unsplash("1540518614846-7eded433c457", 2070),
        unsplash("1590515152220-4c407c742c0c", 2000),
        unsplash("1551882547-ff43c63faf76", 2070),
        unsplash("1512917774080-9991f1c4c750", 2070),
        unsplash("1566073771259-6a8506099945", 2070),
    ]
}

fn default_features() -> Features {
    Features {
        main: unsplash("1540555700478-4be289fbecef", 2070),
        spa: unsplash("1544161515-4ae6ce6db874", 2070),
        culinary: unsplash("1559339352-11d035aa65de", 1974),
    }
}

fn default_loading() -> [String; LOADING_SLOTS] {
    [
        unsplash("1518780664697-55e3ad937233", 500),
        unsplash("1590515152220-4c407c742c0c", 500),
        unsplash("1506450654448-65f04e0ba6ad", 500),
        unsplash("1498503182468-3b51cbb6cb24", 500),
    ]
}

fn default_video_url() -> String {
    "https://www.youtube.com/embed/b0PwAGnD8Cc".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            hero: Hero::default(),
            content: Content::default(),
            rooms: default_rooms(),
            gallery: default_gallery(),
            features: Features::default(),
            loading: default_loading(),
            video_url: default_video_url(),
        }
    }
}

impl Default for Hero {
    fn default() -> Self {
        default_hero()
    }
}

impl Default for Content {
    fn default() -> Self {
        default_content()
    }
}

impl Default for Features {
    fn default() -> Self {
        default_features()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
