use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        appointments::{CreateAppointmentRequest, UpdateAppointmentRequest},
        patients::{CreatePatientRequest, UpdatePatientRequest},
        teeth::ToothWorkRequest,
        users::{LoginRequest, LoginResponse, RegisterUserRequest, UpdateUserRequest},
    },
    error::FieldError,
    models::{Appointment, Patient, Role, ToothWork, User},
    response::{ErrorBody, MessageResponse, ValidationErrorBody},
    routes::{appointments, health, patients, teeth, users},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        users::register_user,
        users::login,
        users::list_users,
        users::update_user,
        users::delete_user,
        patients::create_patient,
        patients::list_patients,
        patients::get_patient,
        patients::update_patient,
        patients::delete_patient,
        appointments::create_appointment,
        appointments::list_appointments,
        appointments::list_patient_appointments,
        appointments::update_appointment,
        appointments::delete_appointment,
        teeth::upsert_tooth_work,
        teeth::list_tooth_work
    ),
    components(
        schemas(
            Role,
            User,
            Patient,
            Appointment,
            ToothWork,
            RegisterUserRequest,
            LoginRequest,
            LoginResponse,
            UpdateUserRequest,
            CreatePatientRequest,
            UpdatePatientRequest,
            CreateAppointmentRequest,
            UpdateAppointmentRequest,
            ToothWorkRequest,
            MessageResponse,
            ErrorBody,
            ValidationErrorBody,
            FieldError,
            health::HealthData
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Users", description = "Staff accounts and login"),
        (name = "Patients", description = "Patient records"),
        (name = "Appointments", description = "Appointment scheduling"),
        (name = "Teeth", description = "Per-tooth dental work"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();
        for expected in [
            "/health",
            "/users/login",
            "/patients/getpatient/{id}",
            "/appointments/getappointmentsD",
            "/teeth/patients/{id}/teeth/{toothNumber}",
        ] {
            assert!(paths.iter().any(|p| p == expected), "missing {expected}");
        }
    }
}
