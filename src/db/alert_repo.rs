// src/db/alert_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::alert::{Alert, AlertType, AlertWithSender, NewAlert},
};

#[derive(Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert<'e, E>(&self, executor: E, alert: &NewAlert) -> Result<Alert, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Alert>(
            r#"
            INSERT INTO alerts (title, message, type, sent_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&alert.title)
        .bind(&alert.message)
        .bind(alert.alert_type)
        .bind(alert.sent_by)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "alert"))
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        alert_type: Option<AlertType>,
        limit: i64,
    ) -> Result<Vec<AlertWithSender>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let alerts = sqlx::query_as::<_, AlertWithSender>(
            r#"
            SELECT a.*, u.name AS sender_name
            FROM alerts a
            LEFT JOIN users u ON u.id = a.sent_by
            WHERE ($1::alert_type IS NULL OR a.type = $1)
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $2
            "#,
        )
        .bind(alert_type)
        .bind(limit)
        .fetch_all(executor)
        .await?;

        Ok(alerts)
    }
}
