//! Admin console core for the fitness-coaching platform.
//!
//! SYSTEM CONTEXT
//! ==============
//! Administrators manage users, content, app settings, and ledgers through a
//! remote REST API. This crate holds everything below presentation: the HTTP
//! client wrapper, resource slices with per-operation status, the persisted
//! session, the route gate, and page controllers that sequence fetches the
//! way each screen does. The `cli` workspace member drives it from a
//! terminal.
//!
//! DESIGN
//! ======
//! - Wire shapes live in the `wire` crate; this crate never parses a raw
//!   envelope outside `state`.
//! - All state is held in `tokio::sync::watch` channels and is observable
//!   through `subscribe()`.
//! - The network sits behind the [`net::Transport`] trait so every flow is
//!   testable against a scripted transport.

pub mod config;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

pub use config::{AdminConfig, ConfigError};
pub use net::{ApiClient, ClientError, HttpTransport};
pub use state::store::AdminStore;
