use async_trait::async_trait;
use thiserror::Error;

use super::models::{Category, CategoryFields, Product, ProductFields};

/// Errors from the catalog stores
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    #[error(transparent)]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Persistence for categories. Lookups by id return `None` when the row is absent.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError>;

    async fn find_category(&self, id: i32) -> Result<Option<Category>, DatabaseError>;

    async fn insert_category(&self, fields: CategoryFields) -> Result<Category, DatabaseError>;

    async fn update_category(
        &self,
        id: i32,
        fields: CategoryFields,
    ) -> Result<Option<Category>, DatabaseError>;

    /// Deletes the category and every product that references it.
    async fn delete_category(&self, id: i32) -> Result<bool, DatabaseError>;
}

/// Persistence for products. Writes referencing a missing category fail with
/// [`DatabaseError::ForeignKeyViolation`].
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError>;

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError>;

    async fn insert_product(&self, fields: ProductFields) -> Result<Product, DatabaseError>;

    async fn update_product(
        &self,
        id: i32,
        fields: ProductFields,
    ) -> Result<Option<Product>, DatabaseError>;

    async fn delete_product(&self, id: i32) -> Result<bool, DatabaseError>;
}

#[async_trait]
pub trait CatalogStore: CategoryStore + ProductStore {
    async fn health_check(&self) -> Result<(), DatabaseError>;
}
