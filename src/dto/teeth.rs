use serde::Deserialize;
use utoipa::ToSchema;

use super::present;
use crate::error::{AppError, FieldError};

/// Teeth are numbered 1 to 32 (universal numbering system).
pub const TOOTH_NUMBERS: std::ops::RangeInclusive<i32> = 1..=32;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ToothWorkRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct ToothWorkChanges {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl ToothWorkRequest {
    pub fn validate(self, tooth_number: i32) -> Result<ToothWorkChanges, AppError> {
        if !TOOTH_NUMBERS.contains(&tooth_number) {
            return Err(AppError::Validation(vec![FieldError::new(
                "toothNumber",
                "must be between 1 and 32",
            )]));
        }
        let changes = ToothWorkChanges {
            status: present(self.status),
            notes: present(self.notes),
        };
        if changes.status.is_none() && changes.notes.is_none() {
            return Err(AppError::NoFieldsProvided);
        }
        Ok(changes)
    }
}
