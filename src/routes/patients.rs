use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};

use crate::{
    dto::patients::{CreatePatientRequest, UpdatePatientRequest},
    error::AppResult,
    middleware::auth::{AdminOnly, Authorized, SecretaryOnly},
    models::Patient,
    response::{MessageResponse, created, ok},
    routes::params::{IdPath, JsonBody},
    services::patient_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(create_patient))
        .route("/allpatients", get(list_patients))
        .route("/getpatient/{id}", get(get_patient))
        .route("/edit/{id}", put(update_patient))
        .route("/delete/{id}", delete(delete_patient))
}

#[utoipa::path(
    post,
    path = "/patients/register",
    request_body = CreatePatientRequest,
    responses(
        (status = 201, description = "Patient added", body = MessageResponse),
        (status = 400, description = "Name missing"),
    ),
    tag = "Patients"
)]
pub async fn create_patient(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<CreatePatientRequest>,
) -> AppResult<(StatusCode, Json<MessageResponse>)> {
    let patient = payload.validate()?;
    patient_service::create_patient(&state, patient).await?;
    Ok(created("Patient added successfully."))
}

#[utoipa::path(
    get,
    path = "/patients/allpatients",
    responses(
        (status = 200, description = "All patients", body = Vec<Patient>),
    ),
    tag = "Patients"
)]
pub async fn list_patients(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Patient>>> {
    Ok(Json(patient_service::list_patients(&state).await?))
}

#[utoipa::path(
    get,
    path = "/patients/getpatient/{id}",
    params(("id" = i32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient", body = Patient),
        (status = 404, description = "Patient not found"),
    ),
    tag = "Patients"
)]
pub async fn get_patient(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<Patient>> {
    Ok(Json(patient_service::get_patient(&state, id).await?))
}

#[utoipa::path(
    put,
    path = "/patients/edit/{id}",
    params(("id" = i32, Path, description = "Patient id")),
    request_body = UpdatePatientRequest,
    responses(
        (status = 200, description = "Patient updated", body = MessageResponse),
        (status = 400, description = "No fields provided"),
        (status = 404, description = "Patient not found"),
    ),
    tag = "Patients"
)]
pub async fn update_patient(
    _secretary: Authorized<SecretaryOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
    JsonBody(payload): JsonBody<UpdatePatientRequest>,
) -> AppResult<Json<MessageResponse>> {
    patient_service::update_patient(&state, id, payload).await?;
    Ok(ok("Patient updated successfully."))
}

#[utoipa::path(
    delete,
    path = "/patients/delete/{id}",
    params(("id" = i32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient deleted with its appointments and tooth work", body = MessageResponse),
        (status = 404, description = "Patient not found"),
    ),
    tag = "Patients"
)]
pub async fn delete_patient(
    _admin: Authorized<AdminOnly>,
    State(state): State<AppState>,
    IdPath(id): IdPath<i32>,
) -> AppResult<Json<MessageResponse>> {
    patient_service::delete_patient(&state, id).await?;
    Ok(ok("Patient deleted successfully."))
}
