// src/services/product_service.rs

use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};

use crate::{common::error::AppError, db::ProductRepository, models::product::Product};

#[derive(Clone)]
pub struct ProductService {
    product_repo: ProductRepository,
}

impl ProductService {
    pub fn new(product_repo: ProductRepository) -> Self {
        Self { product_repo }
    }

    pub async fn create_product<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        cost_per_unit: Decimal,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = self
            .product_repo
            .create(executor, name, description, cost_per_unit)
            .await?;

        tracing::info!(product_id = product.id, name = %product.name, cost_per_unit = %product.cost_per_unit, "product created");
        Ok(product)
    }

    pub async fn list_products<'e, E>(&self, executor: E) -> Result<Vec<Product>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.product_repo.list(executor).await
    }

    pub async fn update_product<'e, E>(
        &self,
        executor: E,
        id: i32,
        name: Option<&str>,
        description: Option<&str>,
        cost_per_unit: Option<Decimal>,
    ) -> Result<Product, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let product = self
            .product_repo
            .update(executor, id, name, description, cost_per_unit)
            .await?
            .ok_or(AppError::ResourceNotFound("product"))?;

        tracing::info!(product_id = id, cost_per_unit = %product.cost_per_unit, "product updated");
        Ok(product)
    }
}
