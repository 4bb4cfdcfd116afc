//! Domain entities for the site content model.
//!
//! Nothing in this module performs I/O.  Loading, persisting, and publishing
//! snapshots is the job of the config store in `inn-curator`; the types here
//! only describe what the content looks like and how partial updates combine
//! with it.

/// The content tree and its defaults.
pub mod site_config;

/// Partial updates merged onto a [`site_config::SiteConfig`].
pub mod patch;

/// Typed per-field edit commands and editor path parsing.
pub mod edit;

/// Video URL normalisation.
pub mod video;
