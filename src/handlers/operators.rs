// src/handlers/operators.rs

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
    models::operator::{Operator, OperatorWithJobs},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOperatorPayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    #[schema(example = "+1234567890")]
    pub phone: String,
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOperatorPayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    pub phone: Option<String>,
    pub username: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorListQuery {
    #[serde(default)]
    pub include_jobs: bool,
}

#[utoipa::path(
    get,
    path = "/api/operators",
    tag = "Operators",
    params(("includeJobs" = Option<bool>, Query, description = "Aninha os jobs de cada operador")),
    responses(
        (status = 200, description = "Operadores ({operators})", body = Vec<OperatorWithJobs>)
    )
)]
pub async fn list_operators(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<OperatorListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let operators = if query.include_jobs {
        let operators = app_state
            .operator_service
            .list_operators_with_jobs(&app_state.db_pool)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        json!({ "operators": operators })
    } else {
        let operators = app_state
            .operator_service
            .list_operators(&app_state.db_pool)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
        json!({ "operators": operators })
    };

    Ok((StatusCode::OK, Json(operators)))
}

#[utoipa::path(
    post,
    path = "/api/operators",
    tag = "Operators",
    request_body = CreateOperatorPayload,
    responses(
        (status = 201, description = "Operador criado ({operator})", body = Operator),
        (status = 409, description = "Telefone já cadastrado")
    )
)]
pub async fn create_operator(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateOperatorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let operator = app_state
        .operator_service
        .create_operator(
            &app_state.db_pool,
            payload.phone.trim(),
            payload.username.as_deref(),
            payload.profile_image.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(json!({ "operator": operator }))))
}

#[utoipa::path(
    put,
    path = "/api/operators",
    tag = "Operators",
    params(("id" = i32, Query, description = "ID do operador")),
    request_body = UpdateOperatorPayload,
    responses(
        (status = 200, description = "Operador atualizado ({operator})", body = Operator),
        (status = 404, description = "Operador não encontrado"),
        (status = 409, description = "Telefone já cadastrado")
    )
)]
pub async fn update_operator(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateOperatorPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = require_id(query.id, "id").map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let operator = app_state
        .operator_service
        .update_operator(
            &app_state.db_pool,
            id,
            payload.phone.as_deref().map(str::trim),
            payload.username.as_deref(),
            payload.profile_image.as_deref(),
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "operator": operator }))))
}
