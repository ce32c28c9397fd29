// src/bin/seed.rs
//
// Limpa o banco e grava dados de exemplo passando pelos services.

use std::str::FromStr;

use anyhow::Context;
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trackopz_backend::{
    config::{AppState, Settings},
    models::{
        job::{ChecklistUpdate, JobAction},
        machine::MachineStatus,
    },
};

const MACHINES: [(&str, MachineStatus, &str, &str); 5] = [
    ("Cutting MC/1", MachineStatus::On, "Production Floor A", "Primary cutting machine for metal sheets"),
    ("Milling 1", MachineStatus::On, "Production Floor B", "Precision milling machine"),
    ("Milling 2", MachineStatus::Off, "Production Floor B", "Secondary milling machine"),
    ("Drilling", MachineStatus::On, "Production Floor C", "High-speed drilling machine"),
    ("CNC Finish", MachineStatus::On, "Production Floor A", "CNC finishing machine"),
];

const PRODUCTS: [(&str, &str, &str); 5] = [
    ("Product A", "High-quality metal component", "25.50"),
    ("Product B", "Precision machined part", "45.75"),
    ("Product C", "Industrial fastener", "12.25"),
    ("Product D", "Custom bracket assembly", "67.80"),
    ("Product E", "Specialty connector", "89.99"),
];

const OPERATORS: [(&str, &str); 3] = [
    ("+1234567890", "John Operator"),
    ("+1234567891", "Sarah Technician"),
    ("+1234567892", "Mike Engineer"),
];

const USERS: [(&str, &str); 2] = [
    ("manager@trackopz.com", "John Manager"),
    ("admin@trackopz.com", "Admin User"),
];

const SEED_PASSWORD: &str = "password123";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new("info"))
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();

    let state = AppState::new(settings).await?;
    let pool = &state.db_pool;

    sqlx::migrate!()
        .run(pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados.")?;

    tracing::info!("🌱 Iniciando o seed...");

    sqlx::query(
        r#"
        TRUNCATE job_checklist_items, dispatches, jobs, alerts, machines, products, operators, users
        RESTART IDENTITY CASCADE
        "#,
    )
    .execute(pool)
    .await
    .context("Falha ao limpar as tabelas")?;

    tracing::info!("🗑️  Dados existentes removidos");

    let mut machines = Vec::new();
    for (name, status, location, description) in MACHINES {
        let machine = state
            .machine_service
            .create_machine(pool, name, status, Some(location), Some(description))
            .await?;
        machines.push(machine);
    }

    let mut products = Vec::new();
    for (name, description, cost) in PRODUCTS {
        let product = state
            .product_service
            .create_product(pool, name, Some(description), Decimal::from_str(cost)?)
            .await?;
        products.push(product);
    }

    let mut operators = Vec::new();
    for (phone, username) in OPERATORS {
        let operator = state
            .operator_service
            .create_operator(pool, phone, Some(username), None)
            .await?;
        operators.push(operator);
    }

    let mut users = Vec::new();
    for (email, name) in USERS {
        let user = state
            .user_service
            .register_user(pool, email, SEED_PASSWORD, name, None)
            .await?;
        users.push(user);
    }

    // Job 1: PENDING
    state
        .job_service
        .create_job(pool, machines[0].id, products[0].id, Some(operators[0].id), 100)
        .await?;

    // Job 2: IN_PROGRESS
    let job = state
        .job_service
        .create_job(pool, machines[1].id, products[1].id, Some(operators[1].id), 50)
        .await?;
    state.job_service.start_job(pool, job.job.id).await?;

    // Job 3: FINISHED, checklist completo
    let job = state
        .job_service
        .create_job(pool, machines[3].id, products[2].id, Some(operators[2].id), 200)
        .await?;
    state.job_service.start_job(pool, job.job.id).await?;
    let all_checked: Vec<ChecklistUpdate> = job
        .checklist_items
        .iter()
        .map(|item| ChecklistUpdate { id: item.id, checked: true })
        .collect();
    state
        .job_service
        .update_checklist(pool, job.job.id, &all_checked, JobAction::Update)
        .await?;

    // Manutenção gera o alerta SYSTEM; a máquina volta a OFF
    state
        .machine_service
        .update_machine(pool, machines[2].id, None, Some(MachineStatus::Maintenance), None, None)
        .await?;
    state
        .machine_service
        .update_machine(pool, machines[2].id, None, Some(MachineStatus::Off), None, None)
        .await?;

    state
        .alert_service
        .send_manager_alert(
            pool,
            "Shift Briefing",
            "Second shift starts at 14:00, check the pending jobs list",
            Some(users[0].id),
        )
        .await?;

    tracing::info!(
        machines = machines.len(),
        products = products.len(),
        operators = operators.len(),
        users = users.len(),
        jobs = 3,
        "✅ Seed concluído"
    );
    Ok(())
}
