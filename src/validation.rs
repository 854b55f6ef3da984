use crate::error::CoreError;

/// Rejects a request when any required field is missing or blank.
pub fn require_fields(values: &[&str]) -> Result<(), CoreError> {
    if values.iter().any(|value| value.trim().is_empty()) {
        Err(CoreError::Validation("All fields are required".into()))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_fields() {
        assert!(require_fields(&["Yoga", "2026-03-02", "10:00"]).is_ok());
        assert!(require_fields(&[]).is_ok());
        assert!(require_fields(&["Yoga", ""]).is_err());
        assert!(require_fields(&["   "]).is_err());
    }
}
