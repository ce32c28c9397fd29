// src/handlers/products.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        db_utils::require_id,
        error::{ApiError, AppError},
        extract::{AppJson, AppQuery},
    },
    config::AppState,
    handlers::IdQuery,
    middleware::i18n::Locale,
    models::{
        product::Product,
        report::{ActiveProduct, ProductDetails},
    },
};

fn validate_not_negative(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.add_param("min".into(), &0.0);
        err.message = Some("not_negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    #[schema(example = "Product A")]
    pub name: String,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    #[schema(example = "25.50")]
    pub cost_per_unit: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(custom(function = "crate::handlers::validate_not_blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_not_negative"))]
    pub cost_per_unit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailsQuery {
    pub product_id: Option<i32>,
    pub date: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    responses((status = 200, description = "Produtos ordenados por nome ({products})", body = Vec<Product>))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .list_products(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "products": products }))))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado ({product})", body = Product),
        (status = 400, description = "Nome vazio ou custo negativo")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AppJson(payload): AppJson<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .create_product(
            &app_state.db_pool,
            payload.name.trim(),
            payload.description.as_deref(),
            payload.cost_per_unit,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(json!({ "product": product }))))
}

#[utoipa::path(
    put,
    path = "/api/products",
    tag = "Products",
    params(("id" = i32, Query, description = "ID do produto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Produto atualizado ({product})", body = Product),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<IdQuery>,
    AppJson(payload): AppJson<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let id = require_id(query.id, "id").map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update_product(
            &app_state.db_pool,
            id,
            payload.name.as_deref().map(str::trim),
            payload.description.as_deref(),
            payload.cost_per_unit,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "product": product }))))
}

#[utoipa::path(
    get,
    path = "/api/products/count",
    tag = "Products",
    responses((status = 200, description = "Quantidade fabricada por produto ({counts: {nome: qtd}})"))
)]
pub async fn product_counts(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let counts = app_state
        .report_service
        .product_counts(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "counts": counts }))))
}

#[utoipa::path(
    get,
    path = "/api/products/active",
    tag = "Products",
    responses((status = 200, description = "Jobs em produção ({active})", body = Vec<ActiveProduct>))
)]
pub async fn active_products(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let active = app_state
        .report_service
        .active_products(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(json!({ "active": active }))))
}

#[utoipa::path(
    get,
    path = "/api/products/details",
    tag = "Products",
    params(
        ("productId" = i32, Query, description = "ID do produto"),
        ("date" = Option<String>, Query, description = "Dia (YYYY-MM-DD), padrão hoje")
    ),
    responses(
        (status = 200, description = "Resumo do dia por máquina e operador", body = ProductDetails),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn product_details(
    State(app_state): State<AppState>,
    locale: Locale,
    AppQuery(query): AppQuery<ProductDetailsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let product_id = require_id(query.product_id, "productId")
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());

    let details = app_state
        .report_service
        .product_details(&app_state.db_pool, product_id, date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(details)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn negative_cost_is_rejected() {
        let payload = CreateProductPayload {
            name: "Product A".to_string(),
            description: None,
            cost_per_unit: Decimal::from_str("-0.01").unwrap(),
        };
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cost_per_unit"));
    }

    #[test]
    fn zero_cost_is_allowed() {
        let payload = CreateProductPayload {
            name: "Sample".to_string(),
            description: None,
            cost_per_unit: Decimal::ZERO,
        };
        assert!(payload.validate().is_ok());
    }
}
