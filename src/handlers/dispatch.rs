// src/handlers/dispatch.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    common::{db_utils::require_id, error::ApiError, extract::AppQuery},
    config::AppState,
    handlers::reports::parse_range,
    middleware::i18n::Locale,
    models::report::{DateRange, DispatchReport},
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchQuery {
    pub date_range: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlipQuery {
    pub job_id: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/dispatch",
    tag = "Dispatch",
    params(("dateRange" = Option<String>, Query, description = "today|week|month|all (padrão all)")),
    responses(
        (status = 200, description = "Despachos agrupados por produto", body = DispatchReport),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn dispatch_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<DispatchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = parse_range(query.date_range.as_deref(), DateRange::All, "dateRange")
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .dispatch_report(&app_state.db_pool, range, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/dispatch/slip",
    tag = "Dispatch",
    params(("jobId" = i32, Query, description = "ID do job despachado")),
    responses(
        (status = 200, description = "Romaneio em PDF", content_type = "application/pdf"),
        (status = 404, description = "Job sem despacho")
    )
)]
pub async fn dispatch_slip(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<SlipQuery>,
) -> Result<Response, ApiError> {
    let job_id = require_id(query.job_id, "jobId").map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let pdf_bytes = app_state
        .document_service
        .generate_dispatch_slip(&app_state.db_pool, job_id)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale, &app_state.i18n_store))?;

    // Configura os Headers para o navegador baixar ou mostrar o PDF
    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"dispatch_job_{}.pdf\"", job_id),
        ),
    ];

    Ok((headers, pdf_bytes).into_response())
}
