// src/db/operator_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::operator::Operator,
};

#[derive(Clone)]
pub struct OperatorRepository {
    pool: PgPool,
}

impl OperatorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        phone: &str,
        username: Option<&str>,
        profile_image: Option<&str>,
    ) -> Result<Operator, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Operator>(
            r#"
            INSERT INTO operators (phone, username, profile_image)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(phone)
        .bind(username)
        .bind(profile_image)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "operator"))
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Operator>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let operator = sqlx::query_as::<_, Operator>("SELECT * FROM operators WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(operator)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Operator>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let operators = sqlx::query_as::<_, Operator>("SELECT * FROM operators ORDER BY created_at DESC")
            .fetch_all(executor)
            .await?;

        Ok(operators)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        phone: Option<&str>,
        username: Option<&str>,
        profile_image: Option<&str>,
    ) -> Result<Option<Operator>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Operator>(
            r#"
            UPDATE operators
            SET phone = COALESCE($2, phone),
                username = COALESCE($3, username),
                profile_image = COALESCE($4, profile_image)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(phone)
        .bind(username)
        .bind(profile_image)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_constraint_error(e, "operator"))
    }
}
