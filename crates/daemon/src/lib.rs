//! Share-link authentication daemon.
//!
//! A share grants anonymous, scoped access to one item of a collection.
//! Logging in through a share checks its password, time window and usage
//! quota, records the use, and mints an access token plus a refresh session.

pub mod access;
pub mod database;
pub mod directory;
pub mod http_server;
pub mod mail;
pub mod process;
pub mod service_config;
pub mod service_state;
pub mod shares;
pub mod state;

pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
