use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use super::models::{Category, CategoryFields, Product, ProductFields};
use super::store::{CatalogStore, CategoryStore, DatabaseError, ProductStore};
use crate::config::DatabaseConfig;

/// SQLSTATE numeric_value_out_of_range
const NUMERIC_OUT_OF_RANGE: &str = "22003";

const CATEGORY_COLUMNS: &str = "id, name, description";
const PRODUCT_COLUMNS: &str =
    "id, name, description, price, image, purchase_date, stock, category_id";

/// Catalog store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    /// Open the pool described by `config`.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;
        let shown = redacted_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        info!("Created database pool for: {}", shown);
        Ok(Self { pool })
    }

    /// Apply the embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

/// Render a connection string for logs with the password masked.
pub fn redacted_url(raw: &str) -> Result<String, DatabaseError> {
    let mut url = url::Url::parse(raw).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    if url.password().is_some() {
        url.set_password(Some("***"))
            .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
    }
    Ok(url.into())
}

fn map_write_error(err: sqlx::Error) -> DatabaseError {
    match &err {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            DatabaseError::ForeignKeyViolation(db.message().to_string())
        }
        sqlx::Error::Database(db) if db.code().as_deref() == Some(NUMERIC_OUT_OF_RANGE) => {
            DatabaseError::OutOfRange(db.message().to_string())
        }
        _ => DatabaseError::Sqlx(err),
    }
}

#[async_trait]
impl CategoryStore for PgCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id");
        Ok(sqlx::query_as::<_, Category>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        Ok(sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_category(&self, fields: CategoryFields) -> Result<Category, DatabaseError> {
        let sql = format!(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(fields.name)
            .bind(fields.description)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_category(
        &self,
        id: i32,
        fields: CategoryFields,
    ) -> Result<Option<Category>, DatabaseError> {
        let sql = format!(
            "UPDATE categories SET name = $2, description = $3 WHERE id = $1 RETURNING {CATEGORY_COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.description)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn delete_category(&self, id: i32) -> Result<bool, DatabaseError> {
        // products.category_id is ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ProductStore for PgCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id");
        Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
        Ok(sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }

    async fn insert_product(&self, fields: ProductFields) -> Result<Product, DatabaseError> {
        let sql = format!(
            "INSERT INTO products (name, description, price, image, purchase_date, stock, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(fields.name)
            .bind(fields.description)
            .bind(fields.price)
            .bind(fields.image)
            .bind(fields.purchase_date)
            .bind(fields.stock)
            .bind(fields.category_id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn update_product(
        &self,
        id: i32,
        fields: ProductFields,
    ) -> Result<Option<Product>, DatabaseError> {
        let sql = format!(
            "UPDATE products SET name = $2, description = $3, price = $4, image = $5, \
             purchase_date = $6, stock = $7, category_id = $8 \
             WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        );
        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(fields.name)
            .bind(fields.description)
            .bind(fields.price)
            .bind(fields.image)
            .bind(fields.purchase_date)
            .bind(fields.stock)
            .bind(fields.category_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_write_error)
    }

    async fn delete_product(&self, id: i32) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    /// Pings the pool to ensure connectivity
    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
