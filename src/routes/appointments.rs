use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::appointments::{AppointmentsQuery, CreateAppointmentRequest, UpdateAppointmentRequest},
    error::AppResult,
    middleware::auth::{AdminOnly, Authorized, SecretaryOnly},
    models::Appointment,
    response::{MessageResponse, created, ok},
    routes::params::{IdPath, JsonBody},
    services::appointment_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(create_appointment))
        .route("/getappointmentsD", get(list_appointments))
        .route("/getappointmentP/{id}", get(list_patient_appointments))
        .route("/edit/{id}", put(update_appointment))
        .route("/delete/{id}", delete(delete_appointment))
}

#[utoipa::path(
    post,
    path = "/appointments/register",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = MessageResponse),
        (status = 400, description = "Invalid patient id, date or description"),
        (status = 404, description = "Patient not found"),
    ),
    tag = "Appointments"
)]
pub async fn create_appointment(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let appointment = payload.validate()?;
    appointment_service::create_appointment(&state, appointment).await?;
    Ok(created("Appointment created successfully."))
}

#[utoipa::path(
    get,
    path = "/appointments/getappointmentsD",
    params(AppointmentsQuery),
    responses(
        (status = 200, description = "Appointments ordered by date", body = Vec<Appointment>),
        (status = 400, description = "Malformed date"),
    ),
    tag = "Appointments"
)]
pub async fn list_appointments(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let day = query.day()?;
    Ok(Json(appointment_service::list_appointments(&state, day).await?))
}

#[utoipa::path(
    get,
    path = "/appointments/getappointmentP/{id}",
    params(("id" = i32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "The patient's appointments ordered by date", body = Vec<Appointment>),
    ),
    tag = "Appointments"
)]
pub async fn list_patient_appointments(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    IdPath(patient_id): IdPath<i32>,
) -> AppResult<Json<Vec<Appointment>>> {
    Ok(Json(
        appointment_service::list_patient_appointments(&state, patient_id).await?,
    ))
}

#[utoipa::path(
    put,
    path = "/appointments/edit/{id}",
    params(("id" = i32, Path, description = "Appointment id")),
    request_body = UpdateAppointmentRequest,
    responses(
        (status = 200, description = "Appointment updated", body = MessageResponse),
        (status = 400, description = "No fields provided or invalid date"),
        (status = 404, description = "Appointment not found"),
    ),
    tag = "Appointments"
)]
pub async fn update_appointment(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(payload): JsonBody<UpdateAppointmentRequest>,
) -> AppResult<Json<MessageResponse>> {
    let changes = payload.validate()?;
    appointment_service::update_appointment(&state, id, changes).await?;
    Ok(ok("Appointment updated successfully."))
}

#[utoipa::path(
    delete,
    path = "/appointments/delete/{id}",
    params(("id" = i32, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment deleted", body = MessageResponse),
        (status = 404, description = "Appointment not found"),
    ),
    tag = "Appointments"
)]
pub async fn delete_appointment(
    _admin: Authorized<AdminOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    appointment_service::delete_appointment(&state, id).await?;
    Ok(ok("Appointment deleted successfully."))
}
