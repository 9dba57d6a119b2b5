use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

/// Decimal places kept for `preco`; `products.price` is NUMERIC(14, 2).
pub const PRICE_SCALE: u32 = 2;
/// Prices must stay strictly below this magnitude to fit NUMERIC(14, 2).
const PRICE_LIMIT: i64 = 1_000_000_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Product {
    #[serde(rename = "produtoId")]
    pub id: i32,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "preco")]
    pub price: Decimal,
    #[serde(rename = "imagem")]
    pub image: Option<String>,
    #[serde(rename = "dataCompra")]
    pub purchase_date: DateTime<Utc>,
    #[serde(rename = "estoque")]
    pub stock: i32,
    #[serde(rename = "categoriaId")]
    pub category_id: i32,
}

/// Mutable columns of a product. `categoriaId` is required; the rest default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductFields {
    #[serde(rename = "nome", alias = "Nome")]
    pub name: String,
    #[serde(rename = "descricao", alias = "Descricao", default)]
    pub description: Option<String>,
    #[serde(rename = "preco", alias = "Preco", default, deserialize_with = "price_in_column_range")]
    pub price: Decimal,
    #[serde(rename = "imagem", alias = "Imagem", default)]
    pub image: Option<String>,
    #[serde(
        rename = "dataCompra",
        alias = "DataCompra",
        default = "Utc::now",
        deserialize_with = "purchase_date_as_utc"
    )]
    pub purchase_date: DateTime<Utc>,
    #[serde(rename = "estoque", alias = "Estoque", default)]
    pub stock: i32,
    #[serde(rename = "categoriaId", alias = "CategoriaId")]
    pub category_id: i32,
}

/// Body of `POST /produtos` and `PUT /produtos/:id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductPayload {
    /// Ignored on create; must equal the path id on update.
    #[serde(rename = "produtoId", alias = "ProdutoId", default)]
    pub id: i32,
    #[serde(flatten)]
    pub fields: ProductFields,
}

impl Product {
    pub fn apply(&mut self, fields: ProductFields) {
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.image = fields.image;
        self.purchase_date = fields.purchase_date;
        self.stock = fields.stock;
        self.category_id = fields.category_id;
    }
}

/// Round to the stored scale so every store returns the same value, and reject
/// magnitudes the column cannot hold.
fn price_in_column_range<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let price = <Decimal as Deserialize>::deserialize(deserializer)?
        .round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    if price.abs() >= Decimal::from(PRICE_LIMIT) {
        return Err(de::Error::custom(format!(
            "preco must be below {} in magnitude",
            PRICE_LIMIT
        )));
    }
    Ok(price)
}

/// RFC 3339 timestamps keep their offset; timestamps without one are read as UTC.
fn purchase_date_as_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(at) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(at.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|_| de::Error::custom(format!("dataCompra is not a date-time: {}", raw)))
}
