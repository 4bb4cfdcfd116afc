//! Application layer: the use cases behind the site's editing and chat features.
//!
//! Code here depends on `inn_core` and on traits it defines itself
//! ([`config_store::ConfigPersistence`], [`concierge::ChatBackend`]).  It
//! contains no file system access and no network I/O; the infrastructure
//! layer supplies those through the traits.
//!
//! # Sub-modules
//!
//! - **`config_store`** – Loads, merges, publishes, and persists the site
//!   content snapshot.  Every display component reads from it; the editing
//!   surface is its only writer.
//!
//! - **`admin_gate`** – The shared-key check in front of the editing surface.
//!
//! - **`concierge`** – Wraps the remote assistant so the chat widget always
//!   gets a reply string, plus the chat transcript.

pub mod admin_gate;
pub mod concierge;
pub mod config_store;
