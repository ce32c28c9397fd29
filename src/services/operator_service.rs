// src/services/operator_service.rs

use std::collections::HashMap;

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{JobRepository, OperatorRepository},
    models::{
        job::{JobDetail, JobFilter},
        operator::{Operator, OperatorWithJobs},
    },
};

#[derive(Clone)]
pub struct OperatorService {
    operator_repo: OperatorRepository,
    job_repo: JobRepository,
}

impl OperatorService {
    pub fn new(operator_repo: OperatorRepository, job_repo: JobRepository) -> Self {
        Self { operator_repo, job_repo }
    }

    // Telefone duplicado -> AlreadyExists (409), tratado no repositório
    pub async fn create_operator<'e, E>(
        &self,
        executor: E,
        phone: &str,
        username: Option<&str>,
        profile_image: Option<&str>,
    ) -> Result<Operator, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let operator = self
            .operator_repo
            .create(executor, phone, username, profile_image)
            .await?;

        tracing::info!(operator_id = operator.id, "operator registered");
        Ok(operator)
    }

    pub async fn list_operators<'e, E>(&self, executor: E) -> Result<Vec<Operator>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.operator_repo.list(executor).await
    }

    pub async fn list_operators_with_jobs<'e, E>(&self, executor: E) -> Result<Vec<OperatorWithJobs>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let operators = self.operator_repo.list(&mut *tx).await?;
        let jobs = self.job_repo.load_details(&mut *tx, &JobFilter::default()).await?;

        tx.commit().await?;

        let mut by_operator: HashMap<i32, Vec<JobDetail>> = HashMap::new();
        for job in jobs {
            if let Some(operator_id) = job.job.operator_id {
                by_operator.entry(operator_id).or_default().push(job);
            }
        }

        Ok(operators
            .into_iter()
            .map(|operator| OperatorWithJobs {
                jobs: by_operator.remove(&operator.id).unwrap_or_default(),
                operator,
            })
            .collect())
    }

    pub async fn update_operator<'e, E>(
        &self,
        executor: E,
        id: i32,
        phone: Option<&str>,
        username: Option<&str>,
        profile_image: Option<&str>,
    ) -> Result<Operator, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.operator_repo
            .update(executor, id, phone, username, profile_image)
            .await?
            .ok_or(AppError::ResourceNotFound("operator"))
    }
}
