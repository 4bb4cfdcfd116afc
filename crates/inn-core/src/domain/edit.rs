//! Typed edit commands for the editing surface.
//!
//! Every change an operator can make is one [`ConfigEdit`]: a single leaf of
//! `hero`, `content`, or `features`, a single slot of an image list, or the
//! video URL.  Applying an edit never touches anything else, so there is no
//! way to lose sibling fields by forgetting to copy them into an update.
//!
//! The editing surface addresses fields with dotted paths (`"hero.bg"`,
//! `"content.aboutTitle"`, `"gallery.3"`).  [`ConfigPath`] parses those once
//! at the boundary; everything past that point is typed.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::site_config::{ContentField, FeatureImage, HeroField, ImageList, SiteConfig};

/// Errors produced while parsing paths or applying edits.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The path does not name an editable field.
    #[error("unknown config path: {0:?}")]
    UnknownPath(String),

    /// The slot index is past the end of a fixed-length image list.
    #[error("{list} has {slots} slots; index {index} is out of range")]
    SlotOutOfRange {
        list: ImageList,
        index: usize,
        slots: usize,
    },
}

/// Address of one editable value in a [`SiteConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigPath {
    Hero(HeroField),
    Content(ContentField),
    Feature(FeatureImage),
    Slot { list: ImageList, index: usize },
    VideoUrl,
}

/// A single-value change to a [`SiteConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigEdit {
    Hero(HeroField, String),
    Content(ContentField, String),
    Feature(FeatureImage, String),
    Slot {
        list: ImageList,
        index: usize,
        url: String,
    },
    VideoUrl(String),
}

impl ConfigEdit {
    /// The path this edit writes to.
    pub fn path(&self) -> ConfigPath {
        match self {
            ConfigEdit::Hero(field, _) => ConfigPath::Hero(*field),
            ConfigEdit::Content(field, _) => ConfigPath::Content(*field),
            ConfigEdit::Feature(image, _) => ConfigPath::Feature(*image),
            ConfigEdit::Slot { list, index, .. } => ConfigPath::Slot {
                list: *list,
                index: *index,
            },
            ConfigEdit::VideoUrl(_) => ConfigPath::VideoUrl,
        }
    }

    /// Writes the edit into `cfg`.
    ///
    /// # Errors
    ///
    /// Returns [`EditError::SlotOutOfRange`] for a slot edit past the end of
    /// its list; `cfg` is left unchanged in that case.
    pub fn apply_to(self, cfg: &mut SiteConfig) -> Result<(), EditError> {
        match self {
            ConfigEdit::Hero(field, value) => cfg.hero.set(field, value),
            ConfigEdit::Content(field, value) => cfg.content.set(field, value),
            ConfigEdit::Feature(image, value) => cfg.features.set(image, value),
            ConfigEdit::Slot { list, index, url } => {
                let slots = cfg.images_mut(list);
                let len = slots.len();
                let slot = slots.get_mut(index).ok_or(EditError::SlotOutOfRange {
                    list,
                    index,
                    slots: len,
                })?;
                *slot = url;
            }
            ConfigEdit::VideoUrl(url) => cfg.video_url = url,
        }
        Ok(())
    }
}

impl ConfigPath {
    /// Pairs this path with a new value.
    pub fn with_value(self, value: String) -> ConfigEdit {
        match self {
            ConfigPath::Hero(field) => ConfigEdit::Hero(field, value),
            ConfigPath::Content(field) => ConfigEdit::Content(field, value),
            ConfigPath::Feature(image) => ConfigEdit::Feature(image, value),
            ConfigPath::Slot { list, index } => ConfigEdit::Slot {
                list,
                index,
                url: value,
            },
            ConfigPath::VideoUrl => ConfigEdit::VideoUrl(value),
        }
    }
}

impl SiteConfig {
    /// Reads the value at `path`.  `None` only for an out-of-range slot.
    pub fn value_at(&self, path: ConfigPath) -> Option<&str> {
        match path {
            ConfigPath::Hero(field) => Some(self.hero.get(field)),
            ConfigPath::Content(field) => Some(self.content.get(field)),
            ConfigPath::Feature(image) => Some(self.features.get(image)),
            ConfigPath::Slot { list, index } => self.images(list).get(index).map(String::as_str),
            ConfigPath::VideoUrl => Some(&self.video_url),
        }
    }
}

// ── Path parsing ──────────────────────────────────────────────────────────────

impl FromStr for ConfigPath {
    type Err = EditError;

    /// Accepts `videoUrl`, `<object>.<leaf>`, `<list>.<index>`, and
    /// `<list>[<index>]`.  Keys are the persisted JSON keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unknown = || EditError::UnknownPath(s.to_string());
        let trimmed = s.trim();

        if trimmed == "videoUrl" {
            return Ok(ConfigPath::VideoUrl);
        }

        let (head, tail) = match trimmed.strip_suffix(']') {
            Some(rest) => rest.split_once('[').ok_or_else(unknown)?,
            None => trimmed.split_once('.').ok_or_else(unknown)?,
        };

        match head {
            "hero" => HeroField::ALL
                .into_iter()
                .find(|f| f.key() == tail)
                .map(ConfigPath::Hero)
                .ok_or_else(unknown),
            "content" => ContentField::ALL
                .into_iter()
                .find(|f| f.key() == tail)
                .map(ConfigPath::Content)
                .ok_or_else(unknown),
            "features" => FeatureImage::ALL
                .into_iter()
                .find(|f| f.key() == tail)
                .map(ConfigPath::Feature)
                .ok_or_else(unknown),
            _ => {
                let list = ImageList::ALL
                    .into_iter()
                    .find(|l| l.key() == head)
                    .ok_or_else(unknown)?;
                let index: usize = tail.parse().map_err(|_| unknown())?;
                if index >= list.slots() {
                    return Err(EditError::SlotOutOfRange {
                        list,
                        index,
                        slots: list.slots(),
                    });
                }
                Ok(ConfigPath::Slot { list, index })
            }
        }
    }
}

impl fmt::Display for ConfigPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigPath::Hero(field) => write!(f, "hero.{}", field.key()),
            ConfigPath::Content(field) => write!(f, "content.{}", field.key()),
            ConfigPath::Feature(image) => write!(f, "features.{}", image.key()),
            ConfigPath::Slot { list, index } => write!(f, "{list}.{index}"),
            ConfigPath::VideoUrl => f.write_str("videoUrl"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_leaf_paths() {
        assert_eq!("hero.bg".parse::<ConfigPath>(), Ok(ConfigPath::Hero(HeroField::Background)));
        assert_eq!(
            "content.aboutDescription".parse::<ConfigPath>(),
            Ok(ConfigPath::Content(ContentField::AboutDescription))
        );
        assert_eq!("features.spa".parse::<ConfigPath>(), Ok(ConfigPath::Feature(FeatureImage::Spa)));
        assert_eq!("videoUrl".parse::<ConfigPath>(), Ok(ConfigPath::VideoUrl));
    }

    #[test]
    fn test_parse_slot_paths_in_both_notations() {
        let expected = ConfigPath::Slot {
            list: ImageList::Gallery,
            index: 3,
        };
        assert_eq!("gallery.3".parse::<ConfigPath>(), Ok(expected));
        assert_eq!("gallery[3]".parse::<ConfigPath>(), Ok(expected));
    }

    #[test]
    fn test_parse_rejects_unknown_leaf() {
        let result: Result<ConfigPath, _> = "hero.colour".parse();
        assert_eq!(result, Err(EditError::UnknownPath("hero.colour".to_string())));
    }

    #[test]
    fn test_parse_rejects_bare_object_key() {
        assert!("hero".parse::<ConfigPath>().is_err());
        assert!("rooms[x]".parse::<ConfigPath>().is_err());
    }

    #[test]
    fn test_parse_rejects_slot_past_end() {
        let result: Result<ConfigPath, _> = "loading.4".parse();
        assert_eq!(
            result,
            Err(EditError::SlotOutOfRange {
                list: ImageList::Loading,
                index: 4,
                slots: 4
            })
        );
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        let paths = [
            ConfigPath::Hero(HeroField::Tagline),
            ConfigPath::Content(ContentField::PhilosophyTitle),
            ConfigPath::Feature(FeatureImage::Culinary),
            ConfigPath::Slot {
                list: ImageList::Rooms,
                index: 5,
            },
            ConfigPath::VideoUrl,
        ];
        for path in paths {
            assert_eq!(path.to_string().parse::<ConfigPath>(), Ok(path));
        }
    }

    #[test]
    fn test_slot_edit_changes_only_target_index() {
        // Arrange
        let mut cfg = SiteConfig::default();
        let before = cfg.clone();

        // Act
        ConfigEdit::Slot {
            list: ImageList::Gallery,
            index: 3,
            url: "new-url".to_string(),
        }
        .apply_to(&mut cfg)
        .expect("index 3 is in range");

        // Assert
        assert_eq!(cfg.gallery.len(), before.gallery.len());
        for (i, url) in cfg.gallery.iter().enumerate() {
            if i == 3 {
                assert_eq!(url, "new-url");
            } else {
                assert_eq!(url, &before.gallery[i]);
            }
        }
    }

    #[test]
    fn test_out_of_range_slot_edit_leaves_config_untouched() {
        let mut cfg = SiteConfig::default();
        let before = cfg.clone();

        let result = ConfigEdit::Slot {
            list: ImageList::Rooms,
            index: 6,
            url: "x".to_string(),
        }
        .apply_to(&mut cfg);

        assert!(matches!(result, Err(EditError::SlotOutOfRange { index: 6, .. })));
        assert_eq!(cfg, before);
    }

    #[test]
    fn test_hero_edit_keeps_sibling_leaves() {
        let mut cfg = SiteConfig::default();
        ConfigEdit::Hero(HeroField::Title, "Anchor".to_string())
            .apply_to(&mut cfg)
            .unwrap();

        assert_eq!(cfg.hero.title, "Anchor");
        assert_eq!(cfg.hero.subtitle, "Inn Stanley.");
    }

    #[test]
    fn test_value_at_reads_through_path() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.value_at(ConfigPath::Hero(HeroField::Title)), Some("Ship"));
        assert_eq!(
            cfg.value_at(ConfigPath::Slot {
                list: ImageList::Loading,
                index: 9
            }),
            None
        );
    }

    #[test]
    fn test_with_value_and_path_are_inverse() {
        let path: ConfigPath = "features.main".parse().unwrap();
        let edit = path.with_value("m.jpg".to_string());
        assert_eq!(edit.path(), path);
    }
}
