// src/db/job_repo.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgConnection, PgPool, Postgres};

use crate::{
    common::{db_utils::map_constraint_error, error::AppError},
    models::job::{
        ChecklistItem, ChecklistUpdate, Job, JobDetail, JobDetailRow, JobFilter, JobStage, JobStatus,
    },
};

// SELECT base do job com máquina, produto e operador (operador é opcional)
const JOB_DETAIL_SELECT: &str = r#"
    SELECT
        j.*,
        m.name AS machine_name,
        m.status AS machine_status,
        p.name AS product_name,
        p.description AS product_description,
        p.cost_per_unit AS product_cost_per_unit,
        o.username AS operator_username,
        o.phone AS operator_phone
    FROM jobs j
    JOIN machines m ON m.id = j.machine_id
    JOIN products p ON p.id = j.product_id
    LEFT JOIN operators o ON o.id = j.operator_id
"#;

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // =========================================================================
    //  JOBS
    // =========================================================================

    pub async fn insert_job<'e, E>(
        &self,
        executor: E,
        machine_id: i32,
        product_id: i32,
        operator_id: Option<i32>,
        quantity: i32,
        cost_per_unit: Decimal,
        total_cost: Decimal,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Job>(
            r#"
            INSERT INTO jobs (
                machine_id, product_id, operator_id, quantity,
                cost_per_unit, total_cost, status, stage
            )
            VALUES ($1, $2, $3, $4, $5, $6, 'PENDING', 'INITIAL')
            RETURNING *
            "#,
        )
        .bind(machine_id)
        .bind(product_id)
        .bind(operator_id)
        .bind(quantity)
        .bind(cost_per_unit)
        .bind(total_cost)
        .fetch_one(executor)
        .await
        .map_err(|e| map_constraint_error(e, "job"))
    }

    // FOR UPDATE: serializa atualizações concorrentes do mesmo job
    pub async fn find_by_id_for_update<'e, E>(&self, executor: E, id: i32) -> Result<Option<Job>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(job)
    }

    pub async fn set_status<'e, E>(
        &self,
        executor: E,
        id: i32,
        status: JobStatus,
        stage: JobStage,
        dispatched_at: Option<DateTime<Utc>>,
    ) -> Result<Job, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let job = sqlx::query_as::<_, Job>(
            r#"
            UPDATE jobs
            SET status = $2,
                stage = $3,
                dispatched_at = COALESCE($4, dispatched_at),
                updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(stage)
        .bind(dispatched_at)
        .fetch_one(executor)
        .await?;

        Ok(job)
    }

    pub async fn find_detail<'e, E>(&self, executor: E, id: i32) -> Result<Option<JobDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("{} WHERE j.id = $1", JOB_DETAIL_SELECT);

        let row = sqlx::query_as::<_, JobDetailRow>(&sql)
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(row)
    }

    pub async fn list_details<'e, E>(&self, executor: E, filter: &JobFilter) -> Result<Vec<JobDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            r#"{}
            WHERE ($1::job_status IS NULL OR j.status = $1)
              AND ($2::int IS NULL OR j.operator_id = $2)
              AND ($3::int IS NULL OR j.machine_id = $3)
              AND ($4::int IS NULL OR j.product_id = $4)
              AND ($5::text IS NULL OR p.name = $5)
              AND ($6::timestamptz IS NULL OR j.created_at >= $6)
              AND ($7::timestamptz IS NULL OR j.created_at < $7)
            ORDER BY j.created_at DESC, j.id DESC
            "#,
            JOB_DETAIL_SELECT
        );

        let rows = sqlx::query_as::<_, JobDetailRow>(&sql)
            .bind(filter.status)
            .bind(filter.operator_id)
            .bind(filter.machine_id)
            .bind(filter.product_id)
            .bind(filter.product_name.as_deref())
            .bind(filter.created_from)
            .bind(filter.created_to)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    // Jobs que ainda aguardam o checklist (não finalizados)
    pub async fn list_pending_details<'e, E>(&self, executor: E) -> Result<Vec<JobDetailRow>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "{} WHERE j.status IN ('PENDING', 'IN_PROGRESS') ORDER BY j.created_at DESC, j.id DESC",
            JOB_DETAIL_SELECT
        );

        let rows = sqlx::query_as::<_, JobDetailRow>(&sql)
            .fetch_all(executor)
            .await?;

        Ok(rows)
    }

    // =========================================================================
    //  CHECKLIST
    // =========================================================================

    pub async fn insert_checklist_items<'e, E>(
        &self,
        executor: E,
        job_id: i32,
        template: &[(&str, bool)],
    ) -> Result<Vec<ChecklistItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let labels: Vec<String> = template.iter().map(|(label, _)| label.to_string()).collect();
        let required: Vec<bool> = template.iter().map(|(_, required)| *required).collect();
        let orders: Vec<i32> = (1..=template.len() as i32).collect();

        // Um único INSERT para os itens do template
        let mut items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            INSERT INTO job_checklist_items (job_id, label, required, "order")
            SELECT $1, t.label, t.required, t.ord
            FROM UNNEST($2::text[], $3::bool[], $4::int[]) AS t(label, required, ord)
            RETURNING *
            "#,
        )
        .bind(job_id)
        .bind(&labels)
        .bind(&required)
        .bind(&orders)
        .fetch_all(executor)
        .await?;

        items.sort_by_key(|item| item.order);
        Ok(items)
    }

    pub async fn list_checklist<'e, E>(&self, executor: E, job_ids: &[i32]) -> Result<Vec<ChecklistItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, ChecklistItem>(
            r#"
            SELECT * FROM job_checklist_items
            WHERE job_id = ANY($1)
            ORDER BY job_id ASC, "order" ASC
            "#,
        )
        .bind(job_ids)
        .fetch_all(executor)
        .await?;

        Ok(items)
    }

    pub async fn apply_checklist_updates<'e, E>(
        &self,
        executor: E,
        job_id: i32,
        updates: &[ChecklistUpdate],
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let ids: Vec<i32> = updates.iter().map(|u| u.id).collect();
        let checked: Vec<bool> = updates.iter().map(|u| u.checked).collect();

        let result = sqlx::query(
            r#"
            UPDATE job_checklist_items AS c
            SET checked = u.checked
            FROM UNNEST($2::int[], $3::bool[]) AS u(id, checked)
            WHERE c.id = u.id AND c.job_id = $1
            "#,
        )
        .bind(job_id)
        .bind(&ids)
        .bind(&checked)
        .execute(executor)
        .await?;

        Ok(result.rows_affected())
    }

    // =========================================================================
    //  JOB + CHECKLIST
    // =========================================================================

    /// Junta os itens de checklist (em ordem) a cada linha do SELECT de detalhes.
    pub async fn attach_checklists(
        &self,
        conn: &mut PgConnection,
        rows: Vec<JobDetailRow>,
    ) -> Result<Vec<JobDetail>, AppError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.job.id).collect();
        let mut by_job: HashMap<i32, Vec<ChecklistItem>> = HashMap::new();
        for item in self.list_checklist(&mut *conn, &ids).await? {
            by_job.entry(item.job_id).or_default().push(item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_job.remove(&row.job.id).unwrap_or_default();
                row.into_detail(items)
            })
            .collect())
    }

    pub async fn load_details(&self, conn: &mut PgConnection, filter: &JobFilter) -> Result<Vec<JobDetail>, AppError> {
        let rows = self.list_details(&mut *conn, filter).await?;
        self.attach_checklists(conn, rows).await
    }

    pub async fn load_detail(&self, conn: &mut PgConnection, id: i32) -> Result<Option<JobDetail>, AppError> {
        let Some(row) = self.find_detail(&mut *conn, id).await? else {
            return Ok(None);
        };
        let mut details = self.attach_checklists(conn, vec![row]).await?;
        Ok(details.pop())
    }
}
