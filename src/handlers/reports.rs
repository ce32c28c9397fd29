// src/handlers/reports.rs

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppQuery,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::report::{DateRange, ProductionReport},
};

#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub filter: Option<String>,
}

/// Lê o período da query string; ausente = `default`.
pub(crate) fn parse_range(raw: Option<&str>, default: DateRange, param: &str) -> Result<DateRange, AppError> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse::<DateRange>()
            .map_err(|_| AppError::InvalidParameter(param.to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/api/reports",
    tag = "Reports",
    params(("filter" = Option<String>, Query, description = "daily|weekly|monthly|all (ou today|week|month)")),
    responses(
        (status = 200, description = "Relatório de produção do período", body = ProductionReport),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn production_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<ReportQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let range = parse_range(query.filter.as_deref(), DateRange::Today, "filter")
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let report = app_state
        .report_service
        .production_report(&app_state.db_pool, range, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/reports/export",
    tag = "Reports",
    params(("filter" = Option<String>, Query, description = "daily|weekly|monthly|all")),
    responses(
        (status = 200, description = "CSV dos jobs do período", content_type = "text/csv"),
        (status = 400, description = "Período inválido")
    )
)]
pub async fn export_report(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<ReportQuery>,
) -> Result<Response, ApiError> {
    let range = parse_range(query.filter.as_deref(), DateRange::Today, "filter")
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let csv = app_state
        .report_service
        .export_csv(&app_state.db_pool, range, Utc::now())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
        (header::CONTENT_DISPOSITION, "attachment; filename=\"report.csv\""),
    ];

    Ok((headers, csv).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_filter_uses_default() {
        assert_eq!(parse_range(None, DateRange::Today, "filter").unwrap(), DateRange::Today);
        assert_eq!(parse_range(Some("weekly"), DateRange::Today, "filter").unwrap(), DateRange::Week);
    }

    #[test]
    fn bad_filter_names_the_parameter() {
        let err = parse_range(Some("yearly"), DateRange::All, "dateRange").unwrap_err();
        assert!(matches!(err, AppError::InvalidParameter(p) if p == "dateRange"));
    }
}
