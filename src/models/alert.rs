// src/models/alert.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "alert_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertType {
    System,
    Manager,
    Job,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: i32,
    #[schema(example = "Machine Maintenance Due")]
    pub title: String,
    #[schema(example = "Cutting MC/1 requires scheduled maintenance")]
    pub message: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub sent_by: Option<i32>,
    pub created_at: DateTime<Utc>,
}

// Alerta + nome de quem enviou (LEFT JOIN users)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AlertWithSender {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub alert: Alert,
    pub sender_name: Option<String>,
}

/// Alerta a ser gravado. Os fluxos de máquina/job montam os seus próprios.
#[derive(Debug, Clone)]
pub struct NewAlert {
    pub title: String,
    pub message: String,
    pub alert_type: AlertType,
    pub sent_by: Option<i32>,
}

impl NewAlert {
    pub fn job_dispatched(job_id: i32, quantity: i32) -> Self {
        Self {
            title: "Job Dispatched".to_string(),
            message: format!("Job #{} has been dispatched ({} units)", job_id, quantity),
            alert_type: AlertType::Job,
            sent_by: None,
        }
    }

    pub fn machine_maintenance(machine_name: &str) -> Self {
        Self {
            title: "Machine Maintenance".to_string(),
            message: format!("Machine {} requires maintenance", machine_name),
            alert_type: AlertType::System,
            sent_by: None,
        }
    }
}
