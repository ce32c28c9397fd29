// src/services/job_service.rs

use chrono::Utc;
use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{AlertRepository, DispatchRepository, JobRepository, MachineRepository, OperatorRepository, ProductRepository},
    models::{
        alert::NewAlert,
        job::{
            total_cost, ChecklistGate, ChecklistUpdate, JobAction, JobDetail, JobFilter, JobFormData, JobStage,
            JobStatus, CHECKLIST_TEMPLATE,
        },
        machine::MachineStatus,
    },
};

#[derive(Clone)]
pub struct JobService {
    job_repo: JobRepository,
    machine_repo: MachineRepository,
    product_repo: ProductRepository,
    operator_repo: OperatorRepository,
    dispatch_repo: DispatchRepository,
    alert_repo: AlertRepository,
}

impl JobService {
    pub fn new(
        job_repo: JobRepository,
        machine_repo: MachineRepository,
        product_repo: ProductRepository,
        operator_repo: OperatorRepository,
        dispatch_repo: DispatchRepository,
        alert_repo: AlertRepository,
    ) -> Self {
        Self {
            job_repo,
            machine_repo,
            product_repo,
            operator_repo,
            dispatch_repo,
            alert_repo,
        }
    }

    // --- CREATE JOB ---
    pub async fn create_job<'e, E>(
        &self,
        executor: E,
        machine_id: i32,
        product_id: i32,
        operator_id: Option<i32>,
        quantity: i32,
    ) -> Result<JobDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let machine = self
            .machine_repo
            .find_by_id(&mut *tx, machine_id)
            .await?
            .ok_or(AppError::ResourceNotFound("machine"))?;

        if !machine.status.accepts_jobs() {
            return Err(AppError::MachineNotReady(machine.status));
        }

        let product = self
            .product_repo
            .find_by_id(&mut *tx, product_id)
            .await?
            .ok_or(AppError::ResourceNotFound("product"))?;

        if let Some(id) = operator_id {
            self.operator_repo
                .find_by_id(&mut *tx, id)
                .await?
                .ok_or(AppError::ResourceNotFound("operator"))?;
        }

        // O custo unitário é congelado no job; edições do produto não o afetam
        let cost_per_unit = product.cost_per_unit;
        let job = self
            .job_repo
            .insert_job(
                &mut *tx,
                machine.id,
                product.id,
                operator_id,
                quantity,
                cost_per_unit,
                total_cost(cost_per_unit, quantity),
            )
            .await?;

        self.job_repo
            .insert_checklist_items(&mut *tx, job.id, &CHECKLIST_TEMPLATE)
            .await?;

        let detail = self
            .job_repo
            .load_detail(&mut *tx, job.id)
            .await?
            .ok_or(AppError::ResourceNotFound("job"))?;

        tx.commit().await?;

        tracing::info!(
            job_id = job.id,
            machine = %machine.name,
            product = %product.name,
            quantity,
            total_cost = %job.total_cost,
            "job created"
        );
        Ok(detail)
    }

    // --- START JOB (PENDING -> IN_PROGRESS) ---
    pub async fn start_job<'e, E>(&self, executor: E, job_id: i32) -> Result<JobDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let job = self
            .job_repo
            .find_by_id_for_update(&mut *tx, job_id)
            .await?
            .ok_or(AppError::ResourceNotFound("job"))?;

        if job.status != JobStatus::Pending {
            return Err(AppError::InvalidTransition {
                from: job.status,
                to: JobStatus::InProgress,
            });
        }

        self.job_repo
            .set_status(&mut *tx, job.id, JobStatus::InProgress, JobStage::Processing, None)
            .await?;

        let detail = self
            .job_repo
            .load_detail(&mut *tx, job.id)
            .await?
            .ok_or(AppError::ResourceNotFound("job"))?;

        tx.commit().await?;

        tracing::info!(job_id, "job started");
        Ok(detail)
    }

    // --- CHECKLIST + FINALIZAÇÃO / DESPACHO ---
    pub async fn update_checklist<'e, E>(
        &self,
        executor: E,
        job_id: i32,
        updates: &[ChecklistUpdate],
        action: JobAction,
    ) -> Result<JobDetail, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        // 1. Trava o job: dois despachos simultâneos ficam em fila aqui
        let job = self
            .job_repo
            .find_by_id_for_update(&mut *tx, job_id)
            .await?
            .ok_or(AppError::ResourceNotFound("job"))?;

        if job.status == JobStatus::Dispatched {
            return Err(AppError::JobAlreadyDispatched(job.id));
        }

        // 2. Checklist salvo + marcações enviadas
        let stored = self.job_repo.list_checklist(&mut *tx, &[job.id]).await?;
        let gate = ChecklistGate::evaluate(&stored, updates)?.ensure_satisfied()?;

        // 3. Persiste as marcações
        if !updates.is_empty() {
            self.job_repo
                .apply_checklist_updates(&mut *tx, job.id, updates)
                .await?;
        }

        // 4. Transição
        let (status, stage) = action.target();
        let dispatched_at = match action {
            JobAction::Dispatch => Some(Utc::now()),
            JobAction::Update => None,
        };
        let job = self
            .job_repo
            .set_status(&mut *tx, job.id, status, stage, dispatched_at)
            .await?;

        // 5. Despacho: um registro por job + alerta
        if action == JobAction::Dispatch {
            self.dispatch_repo
                .insert(&mut *tx, job.id, job.quantity, job.total_cost)
                .await?;
            self.alert_repo
                .insert(&mut *tx, &NewAlert::job_dispatched(job.id, job.quantity))
                .await?;
        }

        let detail = self
            .job_repo
            .load_detail(&mut *tx, job.id)
            .await?
            .ok_or(AppError::ResourceNotFound("job"))?;

        tx.commit().await?;

        tracing::info!(
            job_id,
            status = job.status.as_str(),
            checked_required = gate.checked_required,
            "job checklist applied"
        );
        if action == JobAction::Dispatch {
            tracing::info!(job_id, quantity = job.quantity, cost = %job.total_cost, "job dispatched");
        }
        Ok(detail)
    }

    // --- LEITURAS ---

    pub async fn list_jobs<'e, E>(&self, executor: E, filter: &JobFilter) -> Result<Vec<JobDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let jobs = self.job_repo.load_details(&mut *tx, filter).await?;
        tx.commit().await?;
        Ok(jobs)
    }

    pub async fn pending_jobs<'e, E>(&self, executor: E) -> Result<Vec<JobDetail>, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;
        let rows = self.job_repo.list_pending_details(&mut *tx).await?;
        let jobs = self.job_repo.attach_checklists(&mut *tx, rows).await?;
        tx.commit().await?;
        Ok(jobs)
    }

    pub async fn form_data<'e, E>(&self, executor: E, include_offline: bool) -> Result<JobFormData, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let status = if include_offline { None } else { Some(MachineStatus::On) };
        let machines = self.machine_repo.list(&mut *tx, status).await?;
        let products = self.product_repo.list(&mut *tx).await?;
        let mut operators = self.operator_repo.list(&mut *tx).await?;

        tx.commit().await?;

        operators.sort_by(|a, b| a.username.cmp(&b.username).then_with(|| a.phone.cmp(&b.phone)));

        Ok(JobFormData {
            machines,
            products,
            operators,
        })
    }
}
