// src/handlers/alerts.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::{AppJson, AppQuery},
    },
    config::AppState,
    middleware::i18n::Locale,
    models::alert::{Alert, AlertType, AlertWithSender},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlertPayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    #[schema(example = "Shift change")]
    pub title: String,
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    #[schema(example = "Second shift starts at 14:00")]
    pub message: String,
    #[validate(range(min = 1, message = "must_be_positive"))]
    pub sent_by: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AlertListQuery {
    #[serde(rename = "type")]
    pub alert_type: Option<AlertType>,
    pub limit: Option<i64>,
}

#[utoipa::path(
    get,
    path = "/api/alerts",
    tag = "Alerts",
    params(
        ("type" = Option<AlertType>, Query, description = "SYSTEM, MANAGER ou JOB"),
        ("limit" = Option<i64>, Query, description = "Máximo de alertas (padrão 50)")
    ),
    responses(
        (status = 200, description = "Alertas mais recentes primeiro ({alerts})", body = Vec<AlertWithSender>),
        (status = 400, description = "Limite inválido")
    )
)]
pub async fn list_alerts(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<AlertListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let alerts = app_state
        .alert_service
        .list_alerts(&app_state.db_pool, query.alert_type, query.limit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "alerts": alerts }))))
}

#[utoipa::path(
    post,
    path = "/api/alerts",
    tag = "Alerts",
    request_body = CreateAlertPayload,
    responses(
        (status = 201, description = "Alerta MANAGER criado ({alert})", body = Alert),
        (status = 404, description = "Usuário remetente não encontrado")
    )
)]
pub async fn create_alert(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateAlertPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let alert = app_state
        .alert_service
        .send_manager_alert(&app_state.db_pool, payload.title.trim(), payload.message.trim(), payload.sent_by)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(json!({ "alert": alert }))))
}
