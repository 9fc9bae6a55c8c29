use axum::{
    Json, Router,
    extract::State,
    routing::{get, put},
};

use crate::{
    dto::teeth::ToothWorkRequest,
    error::AppResult,
    middleware::auth::{Authorized, DoctorOnly},
    models::ToothWork,
    response::{MessageResponse, ok},
    routes::params::{IdPath, JsonBody},
    services::teeth_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/patients/{id}/teeth", get(list_tooth_work))
        .route("/patients/{id}/teeth/{toothNumber}", put(upsert_tooth_work))
}

#[utoipa::path(
    put,
    path = "/teeth/patients/{id}/teeth/{toothNumber}",
    params(
        ("id" = i32, Path, description = "Patient id"),
        ("toothNumber" = i32, Path, description = "Tooth number, 1 to 32"),
    ),
    request_body = ToothWorkRequest,
    responses(
        (status = 200, description = "Tooth work recorded", body = MessageResponse),
        (status = 400, description = "Tooth number out of range or no fields provided"),
        (status = 404, description = "Patient not found"),
    ),
    tag = "Teeth"
)]
pub async fn upsert_tooth_work(
    _doctor: Authorized<DoctorOnly>,
    State(state): State<AppState>,
    IdPath((patient_id, tooth_number)): IdPath<(i32, i32)>,
    JsonBody(payload): JsonBody<ToothWorkRequest>,
) -> AppResult<Json<MessageResponse>> {
    let changes = payload.validate(tooth_number)?;
    teeth_service::upsert_tooth_work(&state, patient_id, tooth_number, changes).await?;
    Ok(ok(format!("Tooth {tooth_number} updated successfully.")))
}

#[utoipa::path(
    get,
    path = "/teeth/patients/{id}/teeth",
    params(("id" = i32, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Tooth work ordered by tooth number", body = Vec<ToothWork>),
    ),
    tag = "Teeth"
)]
pub async fn list_tooth_work(
    _doctor: Authorized<DoctorOnly>,
    State(state): State<AppState>,
    IdPath(patient_id): IdPath<i32>,
) -> AppResult<Json<Vec<ToothWork>>> {
    Ok(Json(teeth_service::list_tooth_work(&state, patient_id).await?))
}
