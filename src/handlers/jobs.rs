// src/handlers/jobs.rs

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
    models::job::{ChecklistUpdate, JobAction, JobDetail, JobFilter, JobFormData, JobStatus},
};

// ---
// Payload: CreateJob
// ---
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobPayload {
    #[validate(required(message = "required"), range(min = 1, message = "must_be_positive"))]
    #[schema(example = 1)]
    pub machine_id: Option<i32>,

    #[validate(required(message = "required"), range(min = 1, message = "must_be_positive"))]
    #[schema(example = 1)]
    pub product_id: Option<i32>,

    #[validate(range(min = 1, message = "must_be_positive"))]
    pub operator_id: Option<i32>,

    #[validate(required(message = "required"), range(min = 1, message = "must_be_positive"))]
    #[schema(example = 100)]
    pub quantity: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateJobPayload {
    #[serde(default)]
    pub checklist_items: Vec<ChecklistUpdate>,
    #[serde(default)]
    pub action: JobAction,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobListQuery {
    pub status: Option<JobStatus>,
    pub operator_id: Option<i32>,
    pub machine_id: Option<i32>,
    pub product_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormDataQuery {
    #[serde(default)]
    pub include_offline: bool,
}

// ---
// Handler: create_job
// ---
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = CreateJobPayload,
    responses(
        (status = 201, description = "Job criado com checklist ({job, message})", body = JobDetail),
        (status = 400, description = "Dados inválidos ou máquina não está ON"),
        (status = 404, description = "Máquina, produto ou operador inexistente")
    )
)]
pub async fn create_job(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateJobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    // Após o validate(), os campos obrigatórios estão presentes
    let (Some(machine_id), Some(product_id), Some(quantity)) =
        (payload.machine_id, payload.product_id, payload.quantity)
    else {
        return Err(AppError::InvalidParameter("machineId".to_string())
            .to_api_error(&locale, &app_state.i18n_store));
    };

    let job = app_state
        .job_service
        .create_job(&app_state.db_pool, machine_id, product_id, payload.operator_id, quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "job": job, "message": "Job created successfully" })),
    ))
}

// ---
// Handler: list_jobs
// ---
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    params(
        ("status" = Option<JobStatus>, Query, description = "Filtra pelo status"),
        ("operatorId" = Option<i32>, Query, description = "Filtra pelo operador"),
        ("machineId" = Option<i32>, Query, description = "Filtra pela máquina"),
        ("productId" = Option<i32>, Query, description = "Filtra pelo produto")
    ),
    responses(
        (status = 200, description = "Jobs com máquina, produto, operador e checklist ({jobs})", body = Vec<JobDetail>)
    )
)]
pub async fn list_jobs(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<JobListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = JobFilter {
        status: query.status,
        operator_id: query.operator_id,
        machine_id: query.machine_id,
        product_id: query.product_id,
        ..JobFilter::default()
    };

    let jobs = app_state
        .job_service
        .list_jobs(&app_state.db_pool, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "jobs": jobs }))))
}

// ---
// Handler: update_job (checklist + finalizar/despachar)
// ---
#[utoipa::path(
    put,
    path = "/api/jobs",
    tag = "Jobs",
    params(("id" = i32, Query, description = "ID do job")),
    request_body = UpdateJobPayload,
    responses(
        (status = 200, description = "Job atualizado ({job, message})", body = JobDetail),
        (status = 400, description = "Checklist incompleto ou item de outro job"),
        (status = 404, description = "Job não encontrado"),
        (status = 409, description = "Job já despachado")
    )
)]
pub async fn update_job(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateJobPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = require_id(query.id, "id").map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let job = app_state
        .job_service
        .update_checklist(&app_state.db_pool, job_id, &payload.checklist_items, payload.action)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let message = match payload.action {
        JobAction::Update => "Job updated successfully",
        JobAction::Dispatch => "Job dispatched successfully",
    };

    Ok((StatusCode::OK, Json(json!({ "job": job, "message": message }))))
}

// ---
// Handler: start_job
// ---
#[utoipa::path(
    post,
    path = "/api/jobs/start",
    tag = "Jobs",
    params(("id" = i32, Query, description = "ID do job")),
    responses(
        (status = 200, description = "Job em produção ({job})", body = JobDetail),
        (status = 404, description = "Job não encontrado"),
        (status = 409, description = "Job não está PENDING")
    )
)]
pub async fn start_job(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<IdQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = require_id(query.id, "id").map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let job = app_state
        .job_service
        .start_job(&app_state.db_pool, job_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "job": job }))))
}

// ---
// Handler: form_data
// ---
#[utoipa::path(
    get,
    path = "/api/jobs/form-data",
    tag = "Jobs",
    params(("includeOffline" = Option<bool>, Query, description = "Inclui máquinas que não estão ON")),
    responses(
        (status = 200, description = "Máquinas, produtos e operadores para o formulário", body = JobFormData)
    )
)]
pub async fn form_data(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<FormDataQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let data = app_state
        .job_service
        .form_data(&app_state.db_pool, query.include_offline)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(data)))
}

// ---
// Handler: pending_jobs
// ---
#[utoipa::path(
    get,
    path = "/api/jobs/pending",
    tag = "Jobs",
    responses(
        (status = 200, description = "Jobs aguardando checklist ({jobs})", body = Vec<JobDetail>)
    )
)]
pub async fn pending_jobs(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let jobs = app_state
        .job_service
        .pending_jobs(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "jobs": jobs }))))
}
