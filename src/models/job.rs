// src/models/job.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    models::{
        machine::{Machine, MachineStatus},
        operator::Operator,
        product::Product,
    },
};

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    InProgress,
    Finished,
    Dispatched,
    // Aparece em dados antigos da UI; tratado como "concluído"
    Completed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Finished => "FINISHED",
            JobStatus::Dispatched => "DISPATCHED",
            JobStatus::Completed => "COMPLETED",
        }
    }

    pub fn is_complete(self) -> bool {
        matches!(self, JobStatus::Finished | JobStatus::Dispatched | JobStatus::Completed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "job_stage", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStage {
    Initial,
    Processing,
    Finished,
    Dispatched,
}

/// Ação enviada no PUT /api/jobs junto com o checklist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum JobAction {
    #[default]
    Update,
    Dispatch,
}

impl JobAction {
    /// Status e etapa finais da transição.
    pub fn target(self) -> (JobStatus, JobStage) {
        match self {
            JobAction::Update => (JobStatus::Finished, JobStage::Finished),
            JobAction::Dispatch => (JobStatus::Dispatched, JobStage::Dispatched),
        }
    }
}

// --- Template do checklist ---

/// (label, obrigatório) na ordem em que os itens são criados.
pub const CHECKLIST_TEMPLATE: [(&str, bool); 4] = [
    ("Quality Check", true),
    ("Deburring", true),
    ("Final Inspection", true),
    ("Oiling", false),
];

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[schema(example = 1)]
    pub id: i32,
    pub machine_id: i32,
    pub product_id: i32,
    pub operator_id: Option<i32>,
    #[schema(example = 100)]
    pub quantity: i32,
    #[schema(example = "25.50")]
    pub cost_per_unit: Decimal,
    #[schema(example = "2550.00")]
    pub total_cost: Decimal,
    pub status: JobStatus,
    pub stage: JobStage,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub dispatched_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    pub id: i32,
    pub job_id: i32,
    #[schema(example = "Quality Check")]
    pub label: String,
    pub required: bool,
    pub checked: bool,
    #[schema(example = 1)]
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MachineSummary {
    pub id: i32,
    pub name: String,
    pub status: MachineStatus,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub cost_per_unit: Decimal,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OperatorSummary {
    pub id: i32,
    pub username: Option<String>,
    pub phone: String,
}

/// Job com máquina, produto, operador e checklist aninhados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: Job,
    pub machine: MachineSummary,
    pub product: ProductSummary,
    pub operator: Option<OperatorSummary>,
    pub checklist_items: Vec<ChecklistItem>,
}

impl JobDetail {
    pub fn operator_name(&self) -> &str {
        self.operator
            .as_ref()
            .and_then(|o| o.username.as_deref())
            .unwrap_or("Unassigned")
    }
}

// Linha "achatada" do SELECT com JOINs (ver job_repo)
#[derive(Debug, FromRow)]
pub struct JobDetailRow {
    #[sqlx(flatten)]
    pub job: Job,
    pub machine_name: String,
    pub machine_status: MachineStatus,
    pub product_name: String,
    pub product_description: Option<String>,
    pub product_cost_per_unit: Decimal,
    pub operator_username: Option<String>,
    pub operator_phone: Option<String>,
}

impl JobDetailRow {
    pub fn into_detail(self, checklist_items: Vec<ChecklistItem>) -> JobDetail {
        let operator = match (self.job.operator_id, self.operator_phone) {
            (Some(id), Some(phone)) => Some(OperatorSummary {
                id,
                username: self.operator_username,
                phone,
            }),
            _ => None,
        };

        JobDetail {
            machine: MachineSummary {
                id: self.job.machine_id,
                name: self.machine_name,
                status: self.machine_status,
            },
            product: ProductSummary {
                id: self.job.product_id,
                name: self.product_name,
                description: self.product_description,
                cost_per_unit: self.product_cost_per_unit,
            },
            operator,
            checklist_items,
            job: self.job,
        }
    }
}

/// Filtros da listagem de jobs. Campos `None` não filtram.
#[derive(Debug, Clone, Default)]
pub struct JobFilter {
    pub status: Option<JobStatus>,
    pub operator_id: Option<i32>,
    pub machine_id: Option<i32>,
    pub product_id: Option<i32>,
    pub product_name: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

/// Listas usadas pelo formulário de criação de job.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobFormData {
    pub machines: Vec<Machine>,
    pub products: Vec<Product>,
    pub operators: Vec<Operator>,
}

// --- Regras de negócio puras ---

pub fn total_cost(cost_per_unit: Decimal, quantity: i32) -> Decimal {
    cost_per_unit * Decimal::from(quantity)
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistUpdate {
    #[serde(alias = "checklistItemId")]
    #[schema(example = 1)]
    pub id: i32,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistGate {
    pub required_items: usize,
    pub checked_required: usize,
}

impl ChecklistGate {
    /// Sobrepõe as marcações enviadas ao estado salvo e conta os obrigatórios.
    /// Falha se algum item enviado não pertencer ao job.
    pub fn evaluate(stored: &[ChecklistItem], updates: &[ChecklistUpdate]) -> Result<Self, AppError> {
        let submitted: HashMap<i32, bool> = updates.iter().map(|u| (u.id, u.checked)).collect();

        if let Some(stray) = updates.iter().find(|u| !stored.iter().any(|item| item.id == u.id)) {
            return Err(AppError::ChecklistItemMismatch(stray.id));
        }

        let (required_items, checked_required) = stored
            .iter()
            .filter(|item| item.required)
            .fold((0, 0), |(total, checked), item| {
                let is_checked = submitted.get(&item.id).copied().unwrap_or(item.checked);
                (total + 1, checked + usize::from(is_checked))
            });

        Ok(Self { required_items, checked_required })
    }

    pub fn is_satisfied(&self) -> bool {
        self.checked_required == self.required_items
    }

    pub fn ensure_satisfied(self) -> Result<Self, AppError> {
        if self.is_satisfied() {
            Ok(self)
        } else {
            Err(AppError::ChecklistIncomplete {
                required_items: self.required_items,
                checked_required: self.checked_required,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn template_items(job_id: i32) -> Vec<ChecklistItem> {
        CHECKLIST_TEMPLATE
            .iter()
            .enumerate()
            .map(|(i, (label, required))| ChecklistItem {
                id: i as i32 + 1,
                job_id,
                label: label.to_string(),
                required: *required,
                checked: false,
                order: i as i32 + 1,
            })
            .collect()
    }

    fn check(ids: &[i32]) -> Vec<ChecklistUpdate> {
        ids.iter().map(|&id| ChecklistUpdate { id, checked: true }).collect()
    }

    #[test]
    fn total_cost_is_snapshot_times_quantity() {
        let cost = Decimal::from_str("25.50").unwrap();
        assert_eq!(total_cost(cost, 100), Decimal::from_str("2550.00").unwrap());
        assert_eq!(total_cost(Decimal::ZERO, 7), Decimal::ZERO);
    }

    #[test]
    fn template_has_three_required_items() {
        assert_eq!(CHECKLIST_TEMPLATE.len(), 4);
        assert_eq!(CHECKLIST_TEMPLATE.iter().filter(|(_, r)| *r).count(), 3);
        assert_eq!(CHECKLIST_TEMPLATE[3], ("Oiling", false));
    }

    #[test]
    fn gate_reports_counts_when_required_item_missing() {
        let items = template_items(1);
        let err = ChecklistGate::evaluate(&items, &check(&[1, 2]))
            .unwrap()
            .ensure_satisfied()
            .unwrap_err();

        match err {
            AppError::ChecklistIncomplete { required_items, checked_required } => {
                assert_eq!(required_items, 3);
                assert_eq!(checked_required, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn gate_passes_without_optional_item() {
        let items = template_items(1);
        let gate = ChecklistGate::evaluate(&items, &check(&[1, 2, 3])).unwrap();
        assert!(gate.is_satisfied());
        assert_eq!(gate.required_items, 3);
    }

    #[test]
    fn gate_counts_previously_checked_items() {
        let mut items = template_items(1);
        items[0].checked = true;
        let gate = ChecklistGate::evaluate(&items, &check(&[2, 3])).unwrap();
        assert!(gate.is_satisfied());
    }

    #[test]
    fn gate_honors_explicit_uncheck() {
        let mut items = template_items(1);
        for item in items.iter_mut() {
            item.checked = true;
        }
        let updates = vec![ChecklistUpdate { id: 2, checked: false }];
        let gate = ChecklistGate::evaluate(&items, &updates).unwrap();
        assert_eq!(gate.checked_required, 2);
        assert!(!gate.is_satisfied());
    }

    #[test]
    fn gate_rejects_items_from_other_jobs() {
        let items = template_items(1);
        let err = ChecklistGate::evaluate(&items, &check(&[1, 2, 3, 99])).unwrap_err();
        assert!(matches!(err, AppError::ChecklistItemMismatch(99)));
    }

    #[test]
    fn actions_map_to_status_and_stage() {
        assert_eq!(JobAction::Update.target(), (JobStatus::Finished, JobStage::Finished));
        assert_eq!(JobAction::Dispatch.target(), (JobStatus::Dispatched, JobStage::Dispatched));
        assert_eq!(JobAction::default(), JobAction::Update);
    }

    #[test]
    fn completed_statuses() {
        assert!(JobStatus::Completed.is_complete());
        assert!(JobStatus::Dispatched.is_complete());
        assert!(!JobStatus::InProgress.is_complete());
    }
}
