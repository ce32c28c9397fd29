// src/db/dispatch_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::dispatch::{Dispatch, DispatchRecord, DispatchSlipData},
};

#[derive(Clone)]
pub struct DispatchRepository {
    pool: PgPool,
}

impl DispatchRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(
        &self,
        executor: E,
        job_id: i32,
        quantity: i32,
        cost: Decimal,
    ) -> Result<Dispatch, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Dispatch>(
            r#"
            INSERT INTO dispatches (job_id, quantity, cost)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(quantity)
        .bind(cost)
        .fetch_one(executor)
        .await
        .map_err(|e| match e.as_database_error() {
            // UNIQUE(job_id): outro despacho ganhou a corrida
            Some(db_err) if db_err.is_unique_violation() => AppError::JobAlreadyDispatched(job_id),
            _ => AppError::DatabaseError(e),
        })
    }

    pub async fn count_for_job<'e, E>(&self, executor: E, job_id: i32) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM dispatches WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(executor)
            .await?;

        Ok(count)
    }

    pub async fn list_records<'e, E>(
        &self,
        executor: E,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<DispatchRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, DispatchRecord>(
            r#"
            SELECT
                d.id, d.job_id, d.quantity, d.cost, d.created_at,
                p.id AS product_id,
                p.name AS product_name,
                m.name AS machine_name,
                o.username AS operator_username
            FROM dispatches d
            JOIN jobs j ON j.id = d.job_id
            JOIN products p ON p.id = j.product_id
            JOIN machines m ON m.id = j.machine_id
            LEFT JOIN operators o ON o.id = j.operator_id
            WHERE ($1::timestamptz IS NULL OR d.created_at >= $1)
            ORDER BY d.created_at DESC
            "#,
        )
        .bind(since)
        .fetch_all(executor)
        .await?;

        Ok(records)
    }

    pub async fn find_slip_data<'e, E>(&self, executor: E, job_id: i32) -> Result<Option<DispatchSlipData>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let data = sqlx::query_as::<_, DispatchSlipData>(
            r#"
            SELECT
                d.id AS dispatch_id,
                d.job_id,
                d.quantity,
                d.cost,
                j.cost_per_unit,
                d.created_at AS dispatched_at,
                p.name AS product_name,
                m.name AS machine_name,
                o.username AS operator_username
            FROM dispatches d
            JOIN jobs j ON j.id = d.job_id
            JOIN products p ON p.id = j.product_id
            JOIN machines m ON m.id = j.machine_id
            LEFT JOIN operators o ON o.id = j.operator_id
            WHERE d.job_id = $1
            "#,
        )
        .bind(job_id)
        .fetch_optional(executor)
        .await?;

        Ok(data)
    }
}
