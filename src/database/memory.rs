use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::models::{Category, CategoryFields, Product, ProductFields};
use super::store::{CatalogStore, CategoryStore, DatabaseError, ProductStore};

/// In-process catalog with the same rules as the relational schema: serial ids
/// starting at 1, product → category foreign key, cascade on category delete.
#[derive(Default)]
pub struct MemoryCatalogStore {
    tables: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    categories: BTreeMap<i32, Category>,
    products: BTreeMap<i32, Product>,
    category_seq: i32,
    product_seq: i32,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn check_category(&self, category_id: i32) -> Result<(), DatabaseError> {
        if self.categories.contains_key(&category_id) {
            Ok(())
        } else {
            Err(DatabaseError::ForeignKeyViolation(format!(
                "category {} does not exist",
                category_id
            )))
        }
    }
}

#[async_trait]
impl CategoryStore for MemoryCatalogStore {
    async fn list_categories(&self) -> Result<Vec<Category>, DatabaseError> {
        Ok(self.tables.read().await.categories.values().cloned().collect())
    }

    async fn find_category(&self, id: i32) -> Result<Option<Category>, DatabaseError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert_category(&self, fields: CategoryFields) -> Result<Category, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.category_seq += 1;
        let category = Category {
            id: tables.category_seq,
            name: fields.name,
            description: fields.description,
        };
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: i32,
        fields: CategoryFields,
    ) -> Result<Option<Category>, DatabaseError> {
        let mut tables = self.tables.write().await;
        Ok(tables.categories.get_mut(&id).map(|category| {
            category.apply(fields);
            category.clone()
        }))
    }

    async fn delete_category(&self, id: i32) -> Result<bool, DatabaseError> {
        let mut tables = self.tables.write().await;
        if tables.categories.remove(&id).is_none() {
            return Ok(false);
        }
        tables.products.retain(|_, product| product.category_id != id);
        Ok(true)
    }
}

#[async_trait]
impl ProductStore for MemoryCatalogStore {
    async fn list_products(&self) -> Result<Vec<Product>, DatabaseError> {
        Ok(self.tables.read().await.products.values().cloned().collect())
    }

    async fn find_product(&self, id: i32) -> Result<Option<Product>, DatabaseError> {
        Ok(self.tables.read().await.products.get(&id).cloned())
    }

    async fn insert_product(&self, fields: ProductFields) -> Result<Product, DatabaseError> {
        let mut tables = self.tables.write().await;
        tables.check_category(fields.category_id)?;
        tables.product_seq += 1;
        let product = Product {
            id: tables.product_seq,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            image: fields.image,
            purchase_date: fields.purchase_date,
            stock: fields.stock,
            category_id: fields.category_id,
        };
        tables.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: i32,
        fields: ProductFields,
    ) -> Result<Option<Product>, DatabaseError> {
        let mut tables = self.tables.write().await;
        if !tables.products.contains_key(&id) {
            return Ok(None);
        }
        tables.check_category(fields.category_id)?;
        Ok(tables.products.get_mut(&id).map(|product| {
            product.apply(fields);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: i32) -> Result<bool, DatabaseError> {
        Ok(self.tables.write().await.products.remove(&id).is_some())
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
