use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::constants::ALREADY_EXISTS;

/// Every failure a catalog operation can surface.
///
/// `Validation`, `NotFound` and `PermissionDenied` are deterministic outcomes
/// of the input and are never retried.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("You don't have permission to perform this action")]
    PermissionDenied,
    #[error("Query failed: {0}")]
    Query(#[source] sqlx::Error),
    #[error("Migration failed: {0}")]
    Migrate(#[from] MigrateError),
}

impl CatalogError {
    pub fn validation(info: impl Into<String>) -> Self {
        Self::Validation(info.into())
    }

    pub fn not_found(info: impl Into<String>) -> Self {
        Self::NotFound(info.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(value: sqlx::Error) -> Self {
        match value {
            sqlx::Error::RowNotFound => Self::not_found("RowNotFound"),
            sqlx::Error::Database(e) if e.is_unique_violation() => {
                log::warn!("> Unique constraint rejected write: {e}");
                Self::validation(ALREADY_EXISTS)
            }
            sqlx::Error::Database(e) if e.is_check_violation() => {
                log::warn!("> Check constraint rejected write: {e}");
                Self::validation(format!("Constraint violated: {e}"))
            }
            sqlx::Error::Database(e) if e.is_foreign_key_violation() => {
                log::warn!("> Foreign key rejected write: {e}");
                Self::not_found("Referenced row does not exist")
            }
            e => Self::Query(e),
        }
    }
}
