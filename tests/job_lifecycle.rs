// tests/job_lifecycle.rs
//
// Ciclo completo de um job contra um Postgres de verdade.
// Rodar com: DATABASE_URL=postgres://... cargo test -- --ignored

use std::{str::FromStr, time::Duration};

use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::PgPool;

use trackopz_backend::{
    common::error::AppError,
    config::{AppState, Settings},
    db::DispatchRepository,
    models::{
        alert::AlertType,
        job::{ChecklistUpdate, JobAction, JobStatus},
        machine::MachineStatus,
        report::DateRange,
    },
};

fn state(pool: &PgPool) -> AppState {
    let settings = Settings {
        database_url: String::new(),
        server_addr: "127.0.0.1:0".to_string(),
        db_max_connections: 1,
        db_acquire_timeout: Duration::from_secs(1),
        fonts_dir: "./fonts".to_string(),
    };
    AppState::from_pool(pool.clone(), settings).unwrap()
}

fn dec(raw: &str) -> Decimal {
    Decimal::from_str(raw).unwrap()
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn job_goes_from_creation_to_single_dispatch(pool: PgPool) {
    let app = state(&pool);

    let machine = app
        .machine_service
        .create_machine(&pool, "Cutting MC/1", MachineStatus::On, None, None)
        .await
        .unwrap();
    let product = app
        .product_service
        .create_product(&pool, "Product A", None, dec("25.50"))
        .await
        .unwrap();

    // Criação: custo congelado e checklist padrão
    let job = app
        .job_service
        .create_job(&pool, machine.id, product.id, None, 100)
        .await
        .unwrap();
    assert_eq!(job.job.status, JobStatus::Pending);
    assert_eq!(job.job.total_cost, dec("2550.00"));
    assert_eq!(job.checklist_items.len(), 4);
    assert_eq!(job.checklist_items.iter().filter(|i| i.required).count(), 3);

    let job_id = job.job.id;
    let required: Vec<i32> = job
        .checklist_items
        .iter()
        .filter(|i| i.required)
        .map(|i| i.id)
        .collect();

    // Mudança de preço não altera o job já criado
    app.product_service
        .update_product(&pool, product.id, None, None, Some(dec("30.00")))
        .await
        .unwrap();

    // Checklist incompleto
    let partial: Vec<ChecklistUpdate> = required[..2]
        .iter()
        .map(|&id| ChecklistUpdate { id, checked: true })
        .collect();
    let err = app
        .job_service
        .update_checklist(&pool, job_id, &partial, JobAction::Update)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::ChecklistIncomplete { required_items: 3, checked_required: 2 }
    ));

    // Nada foi persistido pela tentativa recusada
    let pending = app.job_service.pending_jobs(&pool).await.unwrap();
    let stored = pending.iter().find(|j| j.job.id == job_id).unwrap();
    assert!(stored.checklist_items.iter().all(|i| !i.checked));

    // Checklist completo + despacho
    let all: Vec<ChecklistUpdate> = required.iter().map(|&id| ChecklistUpdate { id, checked: true }).collect();
    let dispatched = app
        .job_service
        .update_checklist(&pool, job_id, &all, JobAction::Dispatch)
        .await
        .unwrap();
    assert_eq!(dispatched.job.status, JobStatus::Dispatched);
    assert!(dispatched.job.dispatched_at.is_some());
    assert_eq!(dispatched.job.total_cost, dec("2550.00"));

    // Segundo despacho é recusado e não cria outro registro
    let again = app
        .job_service
        .update_checklist(&pool, job_id, &all, JobAction::Dispatch)
        .await
        .unwrap_err();
    assert!(matches!(again, AppError::JobAlreadyDispatched(id) if id == job_id));

    let dispatch_repo = DispatchRepository::new(pool.clone());
    assert_eq!(dispatch_repo.count_for_job(&pool, job_id).await.unwrap(), 1);

    let report = app
        .report_service
        .dispatch_report(&pool, DateRange::All, Utc::now())
        .await
        .unwrap();
    assert_eq!(report.total_dispatches, 1);
    assert_eq!(report.total_quantity, 100);
    assert_eq!(report.total_cost, dec("2550.00"));

    let alerts = app
        .alert_service
        .list_alerts(&pool, Some(AlertType::Job), None)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn jobs_need_a_machine_that_is_on(pool: PgPool) {
    let app = state(&pool);

    let machine = app
        .machine_service
        .create_machine(&pool, "Milling 2", MachineStatus::Off, None, None)
        .await
        .unwrap();
    let product = app
        .product_service
        .create_product(&pool, "Product B", None, dec("45.75"))
        .await
        .unwrap();

    let err = app
        .job_service
        .create_job(&pool, machine.id, product.id, None, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::MachineNotReady(MachineStatus::Off)));

    let err = app
        .job_service
        .create_job(&pool, machine.id + 1000, product.id, None, 10)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("machine")));

    let jobs = app.job_service.list_jobs(&pool, &Default::default()).await.unwrap();
    assert!(jobs.is_empty());
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn unknown_product_or_operator_is_not_found(pool: PgPool) {
    let app = state(&pool);

    let machine = app
        .machine_service
        .create_machine(&pool, "Milling 1", MachineStatus::On, None, None)
        .await
        .unwrap();
    let product = app
        .product_service
        .create_product(&pool, "Product C", None, dec("12.25"))
        .await
        .unwrap();

    let err = app
        .job_service
        .create_job(&pool, machine.id, product.id + 1000, None, 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("product")));

    let err = app
        .job_service
        .create_job(&pool, machine.id, product.id, Some(9999), 5)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ResourceNotFound("operator")));

    // Nenhum job nem checklist ficou para trás
    let jobs = app.job_service.list_jobs(&pool, &Default::default()).await.unwrap();
    assert!(jobs.is_empty());
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn maintenance_raises_a_system_alert(pool: PgPool) {
    let app = state(&pool);

    let machine = app
        .machine_service
        .create_machine(&pool, "Drilling", MachineStatus::On, None, None)
        .await
        .unwrap();

    let updated = app
        .machine_service
        .update_machine(&pool, machine.id, None, Some(MachineStatus::Maintenance), None, None)
        .await
        .unwrap();
    assert_eq!(updated.status, MachineStatus::Maintenance);

    let alerts = app
        .alert_service
        .list_alerts(&pool, Some(AlertType::System), None)
        .await
        .unwrap();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].alert.message.contains("Drilling"));
}

#[sqlx::test]
#[ignore = "requer Postgres (DATABASE_URL)"]
async fn start_only_from_pending(pool: PgPool) {
    let app = state(&pool);

    let machine = app
        .machine_service
        .create_machine(&pool, "CNC Finish", MachineStatus::On, None, None)
        .await
        .unwrap();
    let product = app
        .product_service
        .create_product(&pool, "Product E", None, dec("89.99"))
        .await
        .unwrap();
    let job = app
        .job_service
        .create_job(&pool, machine.id, product.id, None, 3)
        .await
        .unwrap();

    let started = app.job_service.start_job(&pool, job.job.id).await.unwrap();
    assert_eq!(started.job.status, JobStatus::InProgress);

    let err = app.job_service.start_job(&pool, job.job.id).await.unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition { from: JobStatus::InProgress, to: JobStatus::InProgress }
    ));
}
