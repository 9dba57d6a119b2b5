use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Category {
    #[serde(rename = "categoriaId")]
    pub id: i32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
}

/// Mutable columns of a category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryFields {
    #[serde(rename = "nome", alias = "Nome")]
    pub name: String,
    #[serde(rename = "descricao", alias = "Descricao", default)]
    pub description: Option<String>,
}

/// Body of `POST /categorias` and `PUT /categorias/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPayload {
    /// Ignored on create; must equal the path id on update.
    #[serde(rename = "categoriaId", alias = "CategoriaId", default)]
    pub id: i32,
    #[serde(flatten)]
    pub fields: CategoryFields,
}

impl Category {
    pub fn apply(&mut self, fields: CategoryFields) {
        self.name = fields.name;
        self.description = fields.description;
    }
}
