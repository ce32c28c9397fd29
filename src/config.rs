// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        AlertRepository, DispatchRepository, JobRepository, MachineRepository, OperatorRepository,
        ProductRepository, ReportRepository, UserRepository,
    },
    services::{
        alert_service::AlertService, document_service::DocumentService, job_service::JobService,
        machine_service::MachineService, operator_service::OperatorService, product_service::ProductService,
        report_service::ReportService, user_service::UserService,
    },
};

/// Configuração lida do ambiente (e do `.env`, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub fonts_dir: String,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;

        Ok(Self {
            database_url,
            server_addr: parse_var("SERVER_ADDR", env::var("SERVER_ADDR").ok(), "0.0.0.0:3000".to_string())?,
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", env::var("DB_MAX_CONNECTIONS").ok(), 5)?,
            db_acquire_timeout: Duration::from_secs(parse_var(
                "DB_ACQUIRE_TIMEOUT_SECS",
                env::var("DB_ACQUIRE_TIMEOUT_SECS").ok(),
                3,
            )?),
            fonts_dir: parse_var("FONTS_DIR", env::var("FONTS_DIR").ok(), "./fonts".to_string())?,
        })
    }
}

fn parse_var<T>(key: &str, raw: Option<String>, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .with_context(|| format!("Valor inválido para {}: {:?}", key, value)),
        _ => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub settings: Arc<Settings>,
    pub i18n_store: Arc<I18nStore>,
    pub job_service: JobService,
    pub machine_service: MachineService,
    pub product_service: ProductService,
    pub operator_service: OperatorService,
    pub alert_service: AlertService,
    pub user_service: UserService,
    pub report_service: ReportService,
    pub document_service: DocumentService,
}

impl AppState {
    pub async fn new(settings: Settings) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(settings.db_max_connections)
            .acquire_timeout(settings.db_acquire_timeout)
            .connect(&settings.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, settings)
    }

    /// Monta o gráfico de dependências sobre um pool já criado.
    pub fn from_pool(db_pool: PgPool, settings: Settings) -> anyhow::Result<Self> {
        let i18n_store = Arc::new(I18nStore::load()?);

        let job_repo = JobRepository::new(db_pool.clone());
        let machine_repo = MachineRepository::new(db_pool.clone());
        let product_repo = ProductRepository::new(db_pool.clone());
        let operator_repo = OperatorRepository::new(db_pool.clone());
        let dispatch_repo = DispatchRepository::new(db_pool.clone());
        let alert_repo = AlertRepository::new(db_pool.clone());
        let user_repo = UserRepository::new(db_pool.clone());
        let report_repo = ReportRepository::new(db_pool.clone());

        let job_service = JobService::new(
            job_repo.clone(),
            machine_repo.clone(),
            product_repo.clone(),
            operator_repo.clone(),
            dispatch_repo.clone(),
            alert_repo.clone(),
        );
        let machine_service = MachineService::new(machine_repo, job_repo.clone(), alert_repo.clone());
        let product_service = ProductService::new(product_repo.clone());
        let operator_service = OperatorService::new(operator_repo, job_repo.clone());
        let alert_service = AlertService::new(alert_repo, user_repo.clone());
        let user_service = UserService::new(user_repo);
        let report_service = ReportService::new(job_repo, dispatch_repo.clone(), product_repo, report_repo);
        let document_service = DocumentService::new(dispatch_repo, settings.fonts_dir.clone());

        Ok(Self {
            db_pool,
            settings: Arc::new(settings),
            i18n_store,
            job_service,
            machine_service,
            product_service,
            operator_service,
            alert_service,
            user_service,
            report_service,
            document_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_var_uses_default_when_missing_or_blank() {
        assert_eq!(parse_var("DB_MAX_CONNECTIONS", None, 5u32).unwrap(), 5);
        assert_eq!(parse_var("DB_MAX_CONNECTIONS", Some("  ".into()), 5u32).unwrap(), 5);
        assert_eq!(parse_var("DB_MAX_CONNECTIONS", Some("12".into()), 5u32).unwrap(), 12);
    }

    #[test]
    fn parse_var_reports_the_key_on_bad_values() {
        let err = parse_var("DB_ACQUIRE_TIMEOUT_SECS", Some("soon".into()), 3u64).unwrap_err();
        assert!(err.to_string().contains("DB_ACQUIRE_TIMEOUT_SECS"));
    }
}
