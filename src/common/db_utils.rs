use crate::common::error::AppError;

/// Traduz violações de constraint do Postgres para erros de domínio.
/// `resource` é a chave do recurso usada na mensagem de duplicidade.
pub(crate) fn map_constraint_error(e: sqlx::Error, resource: &'static str) -> AppError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() {
            return AppError::AlreadyExists(resource);
        }
        if db_err.is_foreign_key_violation() {
            return AppError::InvalidReference;
        }
    }
    AppError::DatabaseError(e)
}

/// Lê um parâmetro obrigatório e positivo da query string (`?id=`).
pub(crate) fn require_id(value: Option<i32>, name: &str) -> Result<i32, AppError> {
    match value {
        Some(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidParameter(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_id_rejects_missing_and_non_positive() {
        assert_eq!(require_id(Some(4), "id").unwrap(), 4);
        assert!(matches!(require_id(None, "id"), Err(AppError::InvalidParameter(p)) if p == "id"));
        assert!(require_id(Some(0), "id").is_err());
        assert!(require_id(Some(-3), "jobId").is_err());
    }

    #[test]
    fn non_database_errors_pass_through() {
        let err = map_constraint_error(sqlx::Error::RowNotFound, "operator");
        assert!(matches!(err, AppError::DatabaseError(sqlx::Error::RowNotFound)));
    }
}
