//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! Settings::default()
//!     → env file pairs (loader.rs, optional)
//!     → process environment pairs (loader.rs)
//!     → coerce.rs (string → bool / list / number)
//!     → validation.rs (semantic checks)
//!     → Arc<Settings> (validated, immutable, memoized)
//!     → passed explicitly to every subsystem
//! ```
//!
//! # Design Decisions
//! - Settings are immutable once resolved; no reload
//! - All fields have defaults so an empty environment is valid
//! - Keys are matched case-insensitively; unknown keys are ignored
//! - The memo lives in the resolver value, not in a global

pub mod coerce;
pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{ConfigError, EnvFile, ProcessEnv, SettingsResolver, SettingsSource, StaticSource};
pub use schema::{LogFormat, Settings};
pub use validation::ValidationError;
