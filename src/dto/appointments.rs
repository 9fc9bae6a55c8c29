use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

use super::{FieldCheck, present};
use crate::error::{AppError, FieldError};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    #[schema(value_type = Option<i32>)]
    pub patient_id: Option<Value>,
    /// ISO 8601 date or date-time.
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug)]
pub struct NewAppointment {
    pub patient_id: i32,
    pub date: DateTime<Utc>,
    pub description: String,
}

impl CreateAppointmentRequest {
    pub fn validate(self) -> Result<NewAppointment, AppError> {
        let mut check = FieldCheck::default();
        let patient_id = check.integer("patient_id", self.patient_id);
        let date = check.datetime("date", self.date);
        let description = check.required("description", self.description);
        check.finish(patient_id.zip(date).zip(description).map(
            |((patient_id, date), description)| NewAppointment {
                patient_id,
                date,
                description,
            },
        ))
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateAppointmentRequest {
    pub date: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Default)]
pub struct AppointmentChanges {
    pub date: Option<DateTime<Utc>>,
    pub description: Option<String>,
}

impl UpdateAppointmentRequest {
    pub fn validate(self) -> Result<AppointmentChanges, AppError> {
        let mut check = FieldCheck::default();
        let date = match present(self.date) {
            Some(raw) => check.datetime("date", Some(raw)),
            None => None,
        };
        check.finish(Some(AppointmentChanges {
            date,
            description: present(self.description),
        }))
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AppointmentsQuery {
    /// Calendar day (YYYY-MM-DD, UTC) to list; omit to list everything.
    pub date: Option<String>,
}

impl AppointmentsQuery {
    /// The calendar day to filter on, if one was given.
    pub fn day(&self) -> Result<Option<NaiveDate>, AppError> {
        match self.date.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            None => Ok(None),
            Some(raw) => raw.parse::<NaiveDate>().map(Some).map_err(|_| {
                AppError::Validation(vec![FieldError::new("date", "must be a date (YYYY-MM-DD)")])
            }),
        }
    }
}
