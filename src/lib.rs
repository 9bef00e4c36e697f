//! AceFlow GEO API service core.
//!
//! Configuration resolution, database connection lifecycle, the extension
//! registry for feature routers, and the bootstrap that ties them together.

pub mod config;
pub mod database;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::{Settings, SettingsResolver};
pub use database::ConnectionManager;
pub use http::HttpServer;
pub use lifecycle::{Application, Shutdown, StartupError};
pub use routing::ExtensionRegistry;
