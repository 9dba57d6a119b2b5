pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryCatalogStore;
pub use postgres::PgCatalogStore;
pub use store::{CatalogStore, CategoryStore, DatabaseError, ProductStore};
