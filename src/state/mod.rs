//! Client-side state: resource slices, the session, and preferences.
//!
//! SYSTEM CONTEXT
//! ==============
//! Page controllers dispatch operations on these types; views subscribe to
//! their `watch` channels. Everything here is independent of presentation.

pub mod auth;
pub mod ledger;
pub mod nested;
pub mod pagination;
pub mod preferences;
pub mod record_slot;
pub mod settings;
pub mod slice;
pub mod statistics;
pub mod status;
pub mod store;
