// src/services/alert_service.rs

use sqlx::{Acquire, Executor, Postgres};

use crate::{
    common::error::AppError,
    db::{AlertRepository, UserRepository},
    models::alert::{Alert, AlertType, AlertWithSender, NewAlert},
};

pub const DEFAULT_ALERT_LIMIT: i64 = 50;
pub const MAX_ALERT_LIMIT: i64 = 500;

#[derive(Clone)]
pub struct AlertService {
    alert_repo: AlertRepository,
    user_repo: UserRepository,
}

impl AlertService {
    pub fn new(alert_repo: AlertRepository, user_repo: UserRepository) -> Self {
        Self { alert_repo, user_repo }
    }

    /// Alerta enviado por um gerente. Alertas SYSTEM e JOB nascem nos fluxos de máquina e job.
    pub async fn send_manager_alert<'e, E>(
        &self,
        executor: E,
        title: &str,
        message: &str,
        sent_by: Option<i32>,
    ) -> Result<Alert, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        if let Some(user_id) = sent_by {
            self.user_repo
                .find_by_id(&mut *tx, user_id)
                .await?
                .ok_or(AppError::ResourceNotFound("user"))?;
        }

        let alert = self
            .alert_repo
            .insert(
                &mut *tx,
                &NewAlert {
                    title: title.to_string(),
                    message: message.to_string(),
                    alert_type: AlertType::Manager,
                    sent_by,
                },
            )
            .await?;

        tx.commit().await?;

        tracing::info!(alert_id = alert.id, sent_by = ?sent_by, "manager alert sent");
        Ok(alert)
    }

    pub async fn list_alerts<'e, E>(
        &self,
        executor: E,
        alert_type: Option<AlertType>,
        limit: Option<i64>,
    ) -> Result<Vec<AlertWithSender>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let limit = match limit {
            None => DEFAULT_ALERT_LIMIT,
            Some(n) if n > 0 => n.min(MAX_ALERT_LIMIT),
            Some(_) => return Err(AppError::InvalidParameter("limit".to_string())),
        };

        self.alert_repo.list(executor, alert_type, limit).await
    }
}
