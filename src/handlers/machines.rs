// src/handlers/machines.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        db_utils::require_id,
        error::{ApiError, AppError},
        extract::{AppJson, AppQuery},
    },
    config::AppState,
    handlers::IdQuery,
    middleware::i18n::Locale,
    models::machine::{Machine, MachineStatus, MachineWithJobs},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachinePayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    #[schema(example = "Cutting MC/1")]
    pub name: String,
    #[serde(default)]
    pub status: MachineStatus,
    pub location: Option<String>,
    pub description: Option<String>,
}

// Campos ausentes mantêm o valor atual
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMachinePayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    pub name: Option<String>,
    pub status: Option<MachineStatus>,
    pub location: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineListQuery {
    pub status: Option<MachineStatus>,
    #[serde(default)]
    pub include_jobs: bool,
}

#[utoipa::path(
    get,
    path = "/api/machines",
    tag = "Machines",
    params(
        ("status" = Option<MachineStatus>, Query, description = "Filtra pelo status"),
        ("includeJobs" = Option<bool>, Query, description = "Aninha os jobs de cada máquina")
    ),
    responses(
        (status = 200, description = "Máquinas ({machines})", body = Vec<MachineWithJobs>)
    )
)]
pub async fn list_machines(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<MachineListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let machines = if query.include_jobs {
        let machines = app_state
            .machine_service
            .list_machines_with_jobs(&app_state.db_pool, query.status)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        json!({ "machines": machines })
    } else {
        let machines = app_state
            .machine_service
            .list_machines(&app_state.db_pool, query.status)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        json!({ "machines": machines })
    };

    Ok((StatusCode::OK, Json(machines)))
}

#[utoipa::path(
    post,
    path = "/api/machines",
    tag = "Machines",
    request_body = CreateMachinePayload,
    responses(
        (status = 201, description = "Máquina criada ({machine})", body = Machine),
        (status = 400, description = "Dados inválidos")
    )
)]
pub async fn create_machine(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateMachinePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let machine = app_state
        .machine_service
        .create_machine(
            &app_state.db_pool,
            payload.name.trim(),
            payload.status,
            payload.location.as_deref(),
            payload.description.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(json!({ "machine": machine }))))
}

#[utoipa::path(
    put,
    path = "/api/machines",
    tag = "Machines",
    params(("id" = i32, Query, description = "ID da máquina")),
    request_body = UpdateMachinePayload,
    responses(
        (status = 200, description = "Máquina atualizada ({machine})", body = Machine),
        (status = 404, description = "Máquina não encontrada")
    )
)]
pub async fn update_machine(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateMachinePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = require_id(query.id, "id").map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let machine = app_state
        .machine_service
        .update_machine(
            &app_state.db_pool,
            id,
            payload.name.as_deref().map(str::trim),
            payload.status,
            payload.location.as_deref(),
            payload.description.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "machine": machine }))))
}
