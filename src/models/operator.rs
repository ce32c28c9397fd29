// src/models/operator.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::job::JobDetail;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Operator {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "+1234567890")]
    pub phone: String,
    #[schema(example = "John Operator")]
    pub username: Option<String>,
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorWithJobs {
    #[serde(flatten)]
    pub operator: Operator,
    pub jobs: Vec<JobDetail>,
}
