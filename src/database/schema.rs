//! Schema readiness at startup.
//!
//! Business modules contribute table definitions; the lifecycle manager
//! creates whatever is missing right after connecting. Creation uses
//! `IF NOT EXISTS`, so running it against an initialized database is a no-op.

use sea_orm::sea_query::TableCreateStatement;
use sea_orm::{ConnectionTrait, DatabaseConnection};

use crate::database::lifecycle::LifecycleError;

/// Tables that must exist before the service accepts traffic.
#[derive(Debug, Clone, Default)]
pub struct SchemaPlan {
    tables: Vec<TableCreateStatement>,
}

impl SchemaPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table definition.
    pub fn table(mut self, statement: TableCreateStatement) -> Self {
        self.tables.push(statement);
        self
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Create every missing table, in registration order.
    pub async fn ensure(&self, conn: &DatabaseConnection) -> Result<(), LifecycleError> {
        let backend = conn.get_database_backend();

        for table in &self.tables {
            let mut statement = table.clone();
            statement.if_not_exists();
            conn.execute(backend.build(&statement))
                .await
                .map_err(|e| LifecycleError::Schema(e.to_string()))?;
        }

        if !self.tables.is_empty() {
            tracing::info!(tables = self.tables.len(), "Schema ensured");
        }
        Ok(())
    }
}
