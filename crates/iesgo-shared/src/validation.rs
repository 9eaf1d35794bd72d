use crate::error::ValidationError;

/// Loose address check: something with an `@` and a `.`.
pub fn validate_email(email: &str) -> Result<&str, ValidationError> {
    let email = email.trim();
    if email.contains('@') && email.contains('.') {
        Ok(email)
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_campus_and_personal_addresses() {
        assert_eq!(validate_email(" ana@iesgo.edu.br ").unwrap(), "ana@iesgo.edu.br");
        assert!(validate_email("nome@gmail.com").is_ok());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(validate_email("").is_err());
        assert!(validate_email("ana.silva").is_err());
        assert!(validate_email("ana@iesgo").is_err());
    }
}
