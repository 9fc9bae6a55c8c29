use serde::Deserialize;
use utoipa::ToSchema;

use super::{FieldCheck, present};
use crate::error::AppError;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreatePatientRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub medical_history: Option<String>,
}

#[derive(Debug)]
pub struct NewPatient {
    pub name: String,
    pub contact: Option<String>,
    pub medical_history: Option<String>,
}

impl CreatePatientRequest {
    pub fn validate(self) -> Result<NewPatient, AppError> {
        let mut check = FieldCheck::default();
        let name = check.required("name", self.name);
        check.finish(name.map(|name| NewPatient {
            name,
            contact: present(self.contact),
            medical_history: present(self.medical_history),
        }))
    }
}

/// Every field is optional; at least one must be present for the update to run.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePatientRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub medical_history: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_required() {
        let err = CreatePatientRequest::default().validate().unwrap_err();
        let AppError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "name");

        let err = CreatePatientRequest {
            name: Some("   ".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn optional_fields_drop_blanks() {
        let patient = CreatePatientRequest {
            name: Some(" Jane Doe ".into()),
            contact: Some("".into()),
            medical_history: Some("Asthma".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(patient.name, "Jane Doe");
        assert_eq!(patient.contact, None);
        assert_eq!(patient.medical_history.as_deref(), Some("Asthma"));
    }
}
