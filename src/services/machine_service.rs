// src/services/machine_service.rs

use std::collections::HashMap;

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{AlertRepository, JobRepository, MachineRepository},
    models::{
        alert::NewAlert,
        job::{JobDetail, JobFilter},
        machine::{Machine, MachineStatus, MachineWithJobs},
    },
};

#[derive(Clone)]
pub struct MachineService {
    machine_repo: MachineRepository,
    job_repo: JobRepository,
    alert_repo: AlertRepository,
}

impl MachineService {
    pub fn new(machine_repo: MachineRepository, job_repo: JobRepository, alert_repo: AlertRepository) -> Self {
        Self {
            machine_repo,
            job_repo,
            alert_repo,
        }
    }

    pub async fn create_machine<'e, E>(
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
        let machine = self
            .machine_repo
            .create(executor, name, status, location, description)
            .await?;

        tracing::info!(machine_id = machine.id, name = %machine.name, status = machine.status.as_str(), "machine created");
        Ok(machine)
    }

    pub async fn list_machines<'e, E>(&self, executor: E, status: Option<MachineStatus>) -> Result<Vec<Machine>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.machine_repo.list(executor, status).await
    }

    pub async fn list_machines_with_jobs<'e, E>(
        &self,
        executor: E,
        status: Option<MachineStatus>,
    ) -> Result<Vec<MachineWithJobs>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let machines = self.machine_repo.list(&mut *tx, status).await?;
        let jobs = self.job_repo.load_details(&mut *tx, &JobFilter::default()).await?;

        tx.commit().await?;

        let mut by_machine: HashMap<i32, Vec<JobDetail>> = HashMap::new();
        for job in jobs {
            by_machine.entry(job.job.machine_id).or_default().push(job);
        }

        Ok(machines
            .into_iter()
            .map(|machine| MachineWithJobs {
                jobs: by_machine.remove(&machine.id).unwrap_or_default(),
                machine,
            })
            .collect())
    }

    /// Atualiza a máquina. Entrar em MAINTENANCE gera um alerta SYSTEM na mesma transação.
    pub async fn update_machine<'e, E>(
        &self,
        executor: E,
        id: i32,
        name: Option<&str>,
        status: Option<MachineStatus>,
        location: Option<&str>,
        description: Option<&str>,
    ) -> Result<Machine, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let current = self
            .machine_repo
            .find_by_id_for_update(&mut *tx, id)
            .await?
            .ok_or(AppError::ResourceNotFound("machine"))?;

        let machine = self
            .machine_repo
            .update(&mut *tx, id, name, status, location, description)
            .await?
            .ok_or(AppError::ResourceNotFound("machine"))?;

        let entered_maintenance =
            machine.status == MachineStatus::Maintenance && current.status != MachineStatus::Maintenance;
        if entered_maintenance {
            self.alert_repo
                .insert(&mut *tx, &NewAlert::machine_maintenance(&machine.name))
                .await?;
        }

        tx.commit().await?;

        if current.status != machine.status {
            tracing::info!(
                machine_id = id,
                from = current.status.as_str(),
                to = machine.status.as_str(),
                "machine status changed"
            );
        }
        Ok(machine)
    }
}
