use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    models::{job::JobStatus, machine::MachineStatus},
};

// O tipo de erro interno. Repositórios e services devolvem sempre este.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Parâmetro inválido: {0}")]
    InvalidParameter(String),

    // O &'static str é a chave do recurso no catálogo ("machine", "job", ...)
    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(&'static str),

    #[error("Recurso já existe: {0}")]
    AlreadyExists(&'static str),

    #[error("Referência inválida")]
    InvalidReference,

    #[error("Máquina não está ligada (status {0:?})")]
    MachineNotReady(MachineStatus),

    #[error("Checklist incompleto ({checked_required}/{required_items})")]
    ChecklistIncomplete {
        required_items: usize,
        checked_required: usize,
    },

    #[error("Item de checklist {0} não pertence ao job")]
    ChecklistItemMismatch(i32),

    #[error("Job {0} já despachado")]
    JobAlreadyDispatched(i32),

    #[error("Transição inválida de {from:?} para {to:?}")]
    InvalidTransition { from: JobStatus, to: JobStatus },

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),
}

/// O erro que sai pela API: status + mensagem traduzida + detalhes opcionais.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: message.into(),
            details: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::InvalidParameter(_)
            | AppError::InvalidReference
            | AppError::MachineNotReady(_)
            | AppError::ChecklistIncomplete { .. }
            | AppError::ChecklistItemMismatch(_) => StatusCode::BAD_REQUEST,
            AppError::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            AppError::AlreadyExists(_)
            | AppError::JobAlreadyDispatched(_)
            | AppError::InvalidTransition { .. } => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::FontNotFound(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte para a resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        let (error, details) = match self {
            AppError::ValidationError(errors) => {
                let mut fields = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let key = e.message.as_deref().unwrap_or(e.code.as_ref());
                            store.translate(lang, key, &[])
                        })
                        .collect();
                    fields.insert(camel_case(&field), messages);
                }
                (store.translate(lang, "validation_failed", &[]), Some(json!(fields)))
            }
            AppError::InvalidParameter(param) => {
                (store.translate(lang, "invalid_parameter", &[("param", param.as_str())]), None)
            }
            AppError::ResourceNotFound(resource) => {
                let name = store.resource_name(lang, resource);
                (store.translate(lang, "resource_not_found", &[("resource", name.as_str())]), None)
            }
            AppError::AlreadyExists(resource) => {
                let name = store.resource_name(lang, resource);
                (store.translate(lang, "already_exists", &[("resource", name.as_str())]), None)
            }
            AppError::InvalidReference => (store.translate(lang, "invalid_reference", &[]), None),
            AppError::MachineNotReady(machine_status) => (
                store.translate(lang, "machine_not_ready", &[]),
                Some(json!({ "machineStatus": machine_status })),
            ),
            AppError::ChecklistIncomplete { required_items, checked_required } => (
                store.translate(
                    lang,
                    "checklist_incomplete",
                    &[
                        ("checked", checked_required.to_string().as_str()),
                        ("required", required_items.to_string().as_str()),
                    ],
                ),
                Some(json!({
                    "requiredItems": required_items,
                    "checkedRequired": checked_required,
                })),
            ),
            AppError::ChecklistItemMismatch(id) => (
                store.translate(lang, "checklist_item_mismatch", &[("id", id.to_string().as_str())]),
                None,
            ),
            AppError::JobAlreadyDispatched(id) => (
                store.translate(lang, "job_already_dispatched", &[("id", id.to_string().as_str())]),
                None,
            ),
            AppError::InvalidTransition { from, to } => (
                store.translate(
                    lang,
                    "invalid_transition",
                    &[("from", from.as_str()), ("to", to.as_str())],
                ),
                None,
            ),
            // Erros internos: loga o detalhe, devolve mensagem genérica
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (store.translate(lang, "internal_error", &[]), None)
            }
        };

        ApiError { status, error, details }
    }
}

// O validator reporta o nome do campo Rust; a API fala camelCase
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::{ValidationError, ValidationErrors};

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn checklist_error_reports_counts() {
        let store = I18nStore::load().unwrap();
        let api = AppError::ChecklistIncomplete { required_items: 3, checked_required: 2 }
            .to_api_error(&en(), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.unwrap();
        assert_eq!(details["requiredItems"], 3);
        assert_eq!(details["checkedRequired"], 2);
        assert!(api.error.contains("2/3"));
    }

    #[test]
    fn machine_not_ready_carries_status() {
        let store = I18nStore::load().unwrap();
        let api = AppError::MachineNotReady(MachineStatus::Maintenance).to_api_error(&en(), &store);

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.error, "Machine must be ON to add job");
        assert_eq!(api.details.unwrap()["machineStatus"], "MAINTENANCE");
    }

    #[test]
    fn not_found_is_localized() {
        let store = I18nStore::load().unwrap();
        let api = AppError::ResourceNotFound("machine")
            .to_api_error(&Locale("pt".to_string()), &store);

        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Máquina não encontrado(a)");
    }

    #[test]
    fn conflicts_and_internal_errors() {
        let store = I18nStore::load().unwrap();

        let dispatched = AppError::JobAlreadyDispatched(7).to_api_error(&en(), &store);
        assert_eq!(dispatched.status, StatusCode::CONFLICT);
        assert_eq!(dispatched.error, "Job #7 has already been dispatched");

        let internal = AppError::InternalServerError(anyhow::anyhow!("boom")).to_api_error(&en(), &store);
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.error, "An unexpected error occurred.");
    }

    #[test]
    fn validation_messages_are_translated_per_field() {
        let store = I18nStore::load().unwrap();
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("range");
        err.message = Some("must_be_positive".into());
        errors.add("quantity", err);

        let api = AppError::ValidationError(errors).to_api_error(&en(), &store);
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["quantity"][0], "Must be a positive number.");
    }

    #[test]
    fn validation_details_use_request_field_names() {
        assert_eq!(camel_case("machine_id"), "machineId");
        assert_eq!(camel_case("cost_per_unit"), "costPerUnit");
        assert_eq!(camel_case("quantity"), "quantity");

        let store = I18nStore::load().unwrap();
        let mut errors = ValidationErrors::new();
        let mut err = ValidationError::new("required");
        err.message = Some("required".into());
        errors.add("product_id", err);

        let details = AppError::ValidationError(errors).to_api_error(&en(), &store).details.unwrap();
        assert_eq!(details["productId"][0], "This field is required.");
        assert!(details.get("product_id").is_none());
    }
}
