//! Database connection lifecycle subsystem.
//!
//! # Data Flow
//! ```text
//! ConnectionManager::start()
//!     → registry.rs (register target from Settings.database_url)
//!     → registry.rs (open pool, ping)
//!     → schema.rs (CREATE TABLE IF NOT EXISTS ...)
//!     → ConnectionRegistry published for checkout
//!
//! ConnectionManager::stop()
//!     → registry unpublished
//!     → every pool closed, failures logged
//! ```
//!
//! # Design Decisions
//! - One registry per manager; the bootstrap owns exactly one manager
//! - The URL scheme selects the driver (sqlite, postgres)
//! - Checkout is lock-free; pools synchronize internally

pub mod lifecycle;
pub mod registry;
pub mod schema;

pub use lifecycle::{ConnectionManager, LifecycleError, LifecycleState};
pub use registry::{ConnectionRegistry, ConnectionTarget, DEFAULT_CONNECTION};
pub use schema::SchemaPlan;

pub use sea_orm;
