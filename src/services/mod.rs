//! Store operations behind the HTTP handlers. Every call is bounded by the
//! configured store timeout.

use crate::error::AppError;

pub mod appointment_service;
pub mod patient_service;
pub mod teeth_service;
pub mod user_service;

/// Foreign keys in this schema all point at `patients`.
pub(crate) fn missing_patient(err: AppError) -> AppError {
    if err.is_foreign_key_violation() {
        AppError::NotFound("Patient")
    } else {
        err
    }
}

pub(crate) fn duplicate_user(err: AppError) -> AppError {
    if err.is_unique_violation() {
        AppError::Conflict("User already exists.".to_string())
    } else {
        err
    }
}

/// Zero touched rows means the key did not exist.
pub(crate) fn ensure_found(rows: u64, resource: &'static str) -> Result<(), AppError> {
    if rows == 0 {
        return Err(AppError::NotFound(resource));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rows_is_not_found() {
        assert!(matches!(
            ensure_found(0, "Appointment"),
            Err(AppError::NotFound("Appointment"))
        ));
        assert!(ensure_found(1, "Appointment").is_ok());
    }

    #[test]
    fn unrelated_errors_pass_through() {
        assert!(matches!(missing_patient(AppError::Timeout), AppError::Timeout));
        assert!(matches!(
            duplicate_user(AppError::NotFound("User")),
            AppError::NotFound("User")
        ));
    }
}
