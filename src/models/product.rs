// src/models/product.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Product A")]
    pub name: String,
    #[schema(example = "High-quality metal component")]
    pub description: Option<String>,
    #[schema(example = "25.50")]
    pub cost_per_unit: Decimal,
    pub created_at: DateTime<Utc>,
}
