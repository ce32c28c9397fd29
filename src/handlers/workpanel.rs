// src/handlers/workpanel.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::{
    common::{
        error::{ApiError, AppError},
        extract::AppQuery,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::report::MachineJobs,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkpanelQuery {
    pub product_type: Option<String>,
    pub action: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/manager/workpanel",
    tag = "Manager",
    params(
        ("productType" = Option<String>, Query, description = "Nome do produto"),
        ("action" = Option<String>, Query, description = "getProductTypes lista os nomes de produto")
    ),
    responses(
        (status = 200, description = "Jobs de hoje agrupados por máquina ({jobs}) ou {productTypes}", body = Vec<MachineJobs>),
        (status = 400, description = "productType ausente")
    )
)]
pub async fn workpanel(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<WorkpanelQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.action.as_deref() == Some("getProductTypes") {
        let product_types = app_state
            .report_service
            .product_types(&app_state.db_pool)
            .await
            .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

        return Ok((StatusCode::OK, Json(json!({ "productTypes": product_types }))));
    }

    let product_type = query
        .product_type
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| {
            AppError::InvalidParameter("productType".to_string()).to_api_error(&locale, &app_state.i18n_store)
        })?;

    let jobs = app_state
        .report_service
        .workpanel(&app_state.db_pool, product_type, Utc::now().date_naive())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "jobs": jobs }))))
}
