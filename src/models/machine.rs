// src/models/machine.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::models::job::JobDetail;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "machine_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MachineStatus {
    On,
    #[default]
    Off,
    Maintenance,
    Idle,
}

impl MachineStatus {
    // Só máquinas ligadas aceitam novos jobs
    pub fn accepts_jobs(self) -> bool {
        matches!(self, MachineStatus::On)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MachineStatus::On => "ON",
            MachineStatus::Off => "OFF",
            MachineStatus::Maintenance => "MAINTENANCE",
            MachineStatus::Idle => "IDLE",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Cutting MC/1")]
    pub name: String,
    pub status: MachineStatus,
    #[schema(example = "Production Floor A")]
    pub location: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

// Máquina com os jobs aninhados (?includeJobs=true)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineWithJobs {
    #[serde(flatten)]
    pub machine: Machine,
    pub jobs: Vec<JobDetail>,
}
