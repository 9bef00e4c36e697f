//! Connection targets and the registry of open pools.
//!
//! # Responsibilities
//! - Turn `Settings.database_url` into a connectable target
//! - Open a pool and validate connectivity
//! - Hold open pools by logical name for concurrent checkout
//! - Release pools on shutdown without failing

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::Settings;
use crate::database::lifecycle::LifecycleError;

/// Logical name of the single connection registered from settings.
pub const DEFAULT_CONNECTION: &str = "default";

/// A database to connect to, with its pool options.
#[derive(Debug, Clone)]
pub struct ConnectionTarget {
    name: String,
    url: String,
    max_connections: u32,
    min_connections: u32,
    connect_timeout: Duration,
    logging: bool,
}

impl ConnectionTarget {
    /// Register a target from settings.
    ///
    /// SQLite file targets get their parent directory created and are
    /// opened in create mode.
    pub fn from_settings(name: impl Into<String>, settings: &Settings) -> Result<Self, LifecycleError> {
        let name = name.into();
        let url = prepare_sqlite_url(&settings.database_url).map_err(|e| LifecycleError::Connection {
            name: name.clone(),
            message: format!("cannot prepare database file: {}", e),
        })?;

        Ok(Self {
            name,
            url,
            max_connections: settings.db_max_connections,
            min_connections: settings.db_min_connections,
            connect_timeout: Duration::from_secs(settings.db_connect_timeout_secs),
            logging: settings.debug,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The connection URL with any password removed, for logs.
    pub fn redacted_url(&self) -> String {
        match url::Url::parse(&self.url) {
            Ok(mut parsed) if parsed.password().is_some() => {
                let _ = parsed.set_password(Some("***"));
                parsed.to_string()
            }
            _ => self.url.clone(),
        }
    }

    /// Open the pool and check it answers.
    pub async fn connect(&self) -> Result<DatabaseConnection, LifecycleError> {
        let mut opt = ConnectOptions::new(self.url.clone());
        opt.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.connect_timeout)
            .sqlx_logging(self.logging);

        let conn = Database::connect(opt).await.map_err(|e| self.error(e))?;

        if let Err(e) = conn.ping().await {
            let err = self.error(e);
            if let Err(close_err) = conn.close().await {
                tracing::warn!(connection = %self.name, error = %close_err, "Failed to close pool after failed ping");
            }
            return Err(err);
        }

        tracing::debug!(connection = %self.name, url = %self.redacted_url(), "Database reachable");
        Ok(conn)
    }

    fn error(&self, err: sea_orm::DbErr) -> LifecycleError {
        LifecycleError::Connection {
            name: self.name.clone(),
            message: err.to_string(),
        }
    }
}

/// Rewrite `sqlite://path` targets so the driver creates the file.
fn prepare_sqlite_url(url: &str) -> std::io::Result<String> {
    let Some(rest) = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
    else {
        return Ok(url.to_string());
    };

    if rest.starts_with(":memory:") || rest.contains("mode=memory") {
        return Ok(url.to_string());
    }

    let (path, query) = match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    };
    if path.is_empty() {
        return Ok(url.to_string());
    }

    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(match query {
        Some(query) if has_mode(query) => format!("sqlite:{}?{}", path, query),
        Some("") | None => format!("sqlite:{}?mode=rwc", path),
        Some(query) => format!("sqlite:{}?{}&mode=rwc", path, query),
    })
}

fn has_mode(query: &str) -> bool {
    query.split('&').any(|pair| pair.split('=').next() == Some("mode"))
}

/// Open pools keyed by logical name.
///
/// Pools synchronize checkout internally, so handles can be cloned out and
/// used from any number of concurrent requests.
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: HashMap<String, Arc<DatabaseConnection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, conn: DatabaseConnection) {
        self.connections.insert(name.into(), Arc::new(conn));
    }

    pub fn get(&self, name: &str) -> Option<Arc<DatabaseConnection>> {
        self.connections.get(name).cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.connections.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Close every pool. Never fails; problems are logged.
    ///
    /// A pool still checked out elsewhere cannot be closed here; it is
    /// released when its last handle is dropped.
    pub async fn release(registry: Arc<ConnectionRegistry>) {
        let handles: Vec<_> = registry
            .connections
            .iter()
            .map(|(name, conn)| (name.clone(), Arc::clone(conn)))
            .collect();
        drop(registry);

        for (name, handle) in handles {
            match Arc::try_unwrap(handle) {
                Ok(conn) => match conn.close().await {
                    Ok(()) => tracing::debug!(connection = %name, "Connection closed"),
                    Err(e) => tracing::warn!(connection = %name, error = %e, "Error while closing connection"),
                },
                Err(_) => {
                    tracing::warn!(
                        connection = %name,
                        "Connection still checked out, pool closes when the last handle is released"
                    );
                }
            }
        }
    }
}
