//! Atmosphere video URL normalisation.
//!
//! Operators paste whatever they have into the video field: a watch link, a
//! short link, an embed link, or just the 11-character video id.  The player
//! needs a single embed URL, so [`resolve_embed_url`] reduces all of those to
//! an id and rebuilds the URL with a fixed parameter set.

use std::sync::OnceLock;

use regex::Regex;

/// Played when nothing usable can be extracted from the stored value.
pub const DEFAULT_VIDEO_ID: &str = "b0PwAGnD8Cc";

const VIDEO_ID_LEN: usize = 11;

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^.*(youtu.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
            .expect("video id pattern is a valid regex")
    })
}

/// Extracts the video id from a URL or bare id.
///
/// Returns `None` for empty input.  Unrecognised input falls back to
/// [`DEFAULT_VIDEO_ID`] rather than failing.
pub fn extract_video_id(video_url: &str) -> Option<&str> {
    let trimmed = video_url.trim();
    if trimmed.is_empty() {
        return None;
    }

    let from_url = id_pattern()
        .captures(video_url)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
        .filter(|id| id.len() == VIDEO_ID_LEN);

    Some(match from_url {
        Some(id) => id,
        None if trimmed.len() == VIDEO_ID_LEN => trimmed,
        None => DEFAULT_VIDEO_ID,
    })
}

/// Builds the embeddable player URL for the stored video value.
///
/// `origin` is the page origin the player is embedded on.
///
/// # Example
///
/// ```rust
/// use inn_core::resolve_embed_url;
///
/// let url = resolve_embed_url("https://youtu.be/dQw4w9WgXcQ", "https://inn.example").unwrap();
/// assert!(url.starts_with("https://www.youtube.com/embed/dQw4w9WgXcQ?"));
/// ```
pub fn resolve_embed_url(video_url: &str, origin: &str) -> Option<String> {
    extract_video_id(video_url).map(|id| {
        format!(
            "https://www.youtube.com/embed/{id}?autoplay=1&mute=0&rel=0&enablejsapi=1&origin={origin}"
        )
    })
}
