pub mod category;
pub mod product;

pub use category::{Category, CategoryFields, CategoryPayload};
pub use product::{Product, ProductFields, ProductPayload};
