//! Startup validation that migrations ran and the schema is complete.

use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

/// Every table the storefront expects after migrations.
pub const REQUIRED_TABLES: &[&str] = &[
    "categories",
    "product_types",
    "products",
    "orders",
    "users",
    "carts",
];

#[derive(Debug, Error)]
pub enum DatabaseValidationError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Database validator for ensuring the schema is correct.
pub struct DatabaseValidator {
    pool: SqlitePool,
}

impl DatabaseValidator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Check that the database is initialized and list any missing tables.
    pub async fn validate(&self) -> Result<ValidationResult, DatabaseValidationError> {
        let migrations_table_exists = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='_sqlx_migrations'",
        )
        .fetch_one(&self.pool)
        .await?
            > 0;

        if !migrations_table_exists {
            warn!("Database not initialized - _sqlx_migrations table does not exist");
            return Ok(ValidationResult {
                is_initialized: false,
                migrations_applied: 0,
                missing_tables: REQUIRED_TABLES.iter().map(|t| t.to_string()).collect(),
            });
        }

        let migrations_applied = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM _sqlx_migrations WHERE success = 1",
        )
        .fetch_one(&self.pool)
        .await?;

        let missing_tables = self.missing_tables().await?;

        info!(
            migrations_applied = migrations_applied,
            missing_tables = missing_tables.len(),
            "Database validation complete"
        );

        Ok(ValidationResult {
            is_initialized: true,
            migrations_applied: migrations_applied as usize,
            missing_tables,
        })
    }

    async fn missing_tables(&self) -> Result<Vec<String>, DatabaseValidationError> {
        let mut missing_tables = Vec::new();

        for table in REQUIRED_TABLES {
            let exists = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=$1",
            )
            .bind(table)
            .fetch_one(&self.pool)
            .await?
                > 0;

            if !exists {
                missing_tables.push(table.to_string());
            }
        }

        Ok(missing_tables)
    }
}

/// Result of database validation.
#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_initialized: bool,
    pub migrations_applied: usize,
    pub missing_tables: Vec<String>,
}

impl ValidationResult {
    pub fn is_ok(&self) -> bool {
        self.is_initialized && self.missing_tables.is_empty()
    }

    pub fn summary(&self) -> String {
        if !self.is_initialized {
            "Database not initialized - migrations need to be run".to_string()
        } else if !self.missing_tables.is_empty() {
            format!("Database missing tables: {}", self.missing_tables.join(", "))
        } else {
            format!(
                "Database OK - {} migrations applied",
                self.migrations_applied
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::DBService;

    #[tokio::test]
    async fn test_migrated_database_validates_clean() {
        let db = DBService::new_in_memory().await.unwrap();
        let validator = DatabaseValidator::new(db.pool.clone());

        let result = validator.validate().await.unwrap();
        assert!(result.is_ok());
        assert!(result.migrations_applied >= 1);
        assert!(result.summary().starts_with("Database OK"));
    }

    #[tokio::test]
    async fn test_dropped_table_is_reported() {
        let db = DBService::new_in_memory().await.unwrap();
        sqlx::query("DROP TABLE carts").execute(&db.pool).await.unwrap();

        let validator = DatabaseValidator::new(db.pool.clone());
        let result = validator.validate().await.unwrap();

        assert!(!result.is_ok());
        assert_eq!(result.missing_tables, vec!["carts".to_string()]);
    }
}
