//! Utility helpers shared by the session and page layers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate environment concerns (disk persistence, route
//! paths) from slice and page logic to keep both testable.

pub mod auth;
pub mod storage;
