use strum::Display;
use thiserror::Error;
use uuid::Uuid;

/// Usecase operation that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    Create,
    Get,
    Query,
    Update,
    Delete,
}

#[derive(Debug, Error)]
pub enum ProductError {
    /// Input violates a domain invariant; nothing was written
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Product not found with filter: {id} (during {operation})")]
    NotFound { id: Uuid, operation: Operation },

    /// Driver or server failure, surfaced as-is
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type ProductResult<T> = Result<T, ProductError>;

impl ProductError {
    pub fn not_found(id: Uuid, operation: Operation) -> Self {
        ProductError::NotFound { id, operation }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProductError::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ProductError::Validation(_))
    }
}

impl From<mongodb::error::Error> for ProductError {
    fn from(err: mongodb::error::Error) -> Self {
        ProductError::Database(err.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for ProductError {
    fn from(err: mongodb::bson::ser::Error) -> Self {
        ProductError::Serialization(err.to_string())
    }
}
