pub mod alerts;
pub mod dispatch;
pub mod jobs;
pub mod machines;
pub mod operators;
pub mod products;
pub mod reports;
pub mod users;
pub mod workpanel;

use serde::Deserialize;

// `?id=` usado pelos PUTs e ações sobre um único registro
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<i32>,
}

/// Texto obrigatório: vazio ou só espaços é recusado.
pub(crate) fn validate_not_blank(val: &str) -> Result<(), validator::ValidationError> {
    if val.trim().is_empty() {
        let mut err = validator::ValidationError::new("length");
        err.message = Some("required".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(validate_not_blank("Shift change").is_ok());
        assert!(validate_not_blank("  x ").is_ok());

        let err = validate_not_blank("   \t").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("required"));
        assert!(validate_not_blank("").is_err());
    }
}
