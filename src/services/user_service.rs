// src/services/user_service.rs

use bcrypt::hash;
use sqlx::{Executor, Postgres};

use crate::{common::error::AppError, db::UserRepository, models::user::User};

pub const DEFAULT_ROLE: &str = "manager";

#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    pub fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    pub async fn register_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        password: &str,
        name: &str,
        role: Option<&str>,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // Hashing fora do runtime assíncrono
        let password_clone = password.to_owned();
        let hashed_password = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .user_repo
            .create_user(executor, email, &hashed_password, name, role.unwrap_or(DEFAULT_ROLE))
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "user registered");
        Ok(user)
    }

    pub async fn list_users<'e, E>(&self, executor: E) -> Result<Vec<User>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.user_repo.list(executor).await
    }
}
