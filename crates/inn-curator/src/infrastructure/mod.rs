//! Infrastructure layer for inn-curator.
//!
//! Contains the adapters the application layer talks to through traits:
//! key-value storage for the persisted site config, the operator settings
//! file, the Gemini HTTP backend for the concierge, and the command bridge
//! the editing surface calls.
//!
//! **Dependency rule**: this layer may depend on `application` and `inn_core`,
//! but MUST NOT be imported by the `application` or domain layers.

pub mod editor_bridge;
pub mod gemini;
pub mod settings;
pub mod storage;
