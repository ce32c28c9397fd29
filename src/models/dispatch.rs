// src/models/dispatch.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Dispatch {
    pub id: i32,
    pub job_id: i32,
    #[schema(example = 100)]
    pub quantity: i32,
    #[schema(example = "2550.00")]
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
}

// Despacho + nomes do job de origem, usado no relatório de despachos
#[derive(Debug, Clone, FromRow)]
pub struct DispatchRecord {
    pub id: i32,
    pub job_id: i32,
    pub quantity: i32,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub product_id: i32,
    pub product_name: String,
    pub machine_name: String,
    pub operator_username: Option<String>,
}

/// Dados para o romaneio (PDF) de um job despachado.
#[derive(Debug, Clone, FromRow)]
pub struct DispatchSlipData {
    pub dispatch_id: i32,
    pub job_id: i32,
    pub quantity: i32,
    pub cost: Decimal,
    pub cost_per_unit: Decimal,
    pub dispatched_at: DateTime<Utc>,
    pub product_name: String,
    pub machine_name: String,
    pub operator_username: Option<String>,
}
