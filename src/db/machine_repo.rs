// src/db/machine_repo.rs

use sqlx::{Executor, PgPool, Postgres};

use crate::{
    common::error::AppError,
    models::machine::{Machine, MachineStatus},
};

#[derive(Clone)]
pub struct MachineRepository {
    pool: PgPool,
}

impl MachineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        status: MachineStatus,
        location: Option<&str>,
        description: Option<&str>,
    ) -> Result<Machine, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            INSERT INTO machines (name, status, location, description)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(status)
        .bind(location)
        .bind(description)
        .fetch_one(executor)
        .await?;

        Ok(machine)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: i32) -> Result<Option<Machine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let machine = sqlx::query_as::<_, Machine>("SELECT * FROM machines WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(machine)
    }

    // Trava a linha até o fim da transação (mudança de status + alerta)
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: i32) -> Result<Option<Machine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let machine = sqlx::query_as::<_, Machine>("SELECT * FROM machines WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(machine)
    }

    pub async fn list<'e, E>(&self, executor: E, status: Option<MachineStatus>) -> Result<Vec<Machine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let machines = sqlx::query_as::<_, Machine>(
            r#"
            SELECT * FROM machines
            WHERE ($1::machine_status IS NULL OR status = $1)
            ORDER BY name ASC
            "#,
        )
        .bind(status)
        .fetch_all(executor)
        .await?;

        Ok(machines)
    }

    // Campos None mantêm o valor atual
    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: i32,
        name: Option<&str>,
        status: Option<MachineStatus>,
        location: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Machine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let machine = sqlx::query_as::<_, Machine>(
            r#"
            UPDATE machines
            SET name = COALESCE($2, name),
                status = COALESCE($3, status),
                location = COALESCE($4, location),
                description = COALESCE($5, description)
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(status)
        .bind(location)
        .bind(description)
        .fetch_optional(executor)
        .await?;

        Ok(machine)
    }
}
