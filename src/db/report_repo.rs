// src/db/report_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::common::error::AppError;

#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Quantidade fabricada por nome de produto (produtos sem job não aparecem)
    pub async fn quantity_by_product<'e, E>(&self, executor: E) -> Result<Vec<(String, i64)>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows: Vec<(String, i64)> = sqlx::query_as(
            r#"
            SELECT p.name, COALESCE(SUM(j.quantity), 0)::BIGINT
            FROM jobs j
            JOIN products p ON p.id = j.product_id
            GROUP BY p.name
            ORDER BY p.name ASC
            "#,
        )
        .fetch_all(executor)
        .await?;

        Ok(rows)
    }
}
