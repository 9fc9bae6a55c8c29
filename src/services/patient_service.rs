use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, EntityTrait, QueryOrder, Set};

use crate::{
    db::{bounded, update::PartialUpdate},
    dto::patients::{NewPatient, UpdatePatientRequest},
    entity::{
        Patients,
        patients::{ActiveModel, Column, Model as PatientModel},
    },
    error::{AppError, AppResult},
    models::Patient,
    services::ensure_found,
    state::AppState,
};

pub async fn create_patient(state: &AppState, payload: NewPatient) -> AppResult<Patient> {
    let active = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        contact: Set(payload.contact),
        medical_history: Set(payload.medical_history),
        created_at: Set(Utc::now().into()),
    };
    let patient = bounded(state.store_timeout, active.insert(&state.orm)).await?;
    tracing::info!(patient_id = patient.id, "patient created");
    Ok(patient_from_entity(patient))
}

pub async fn list_patients(state: &AppState) -> AppResult<Vec<Patient>> {
    let patients = bounded(
        state.store_timeout,
        Patients::find().order_by_asc(Column::Id).all(&state.orm),
    )
    .await?;
    Ok(patients.into_iter().map(patient_from_entity).collect())
}

pub async fn get_patient(state: &AppState, id: i32) -> AppResult<Patient> {
    bounded(state.store_timeout, Patients::find_by_id(id).one(&state.orm))
        .await?
        .map(patient_from_entity)
        .ok_or(AppError::NotFound("Patient"))
}

pub async fn update_patient(
    state: &AppState,
    id: i32,
    payload: UpdatePatientRequest,
) -> AppResult<()> {
    let update = PartialUpdate::table("patients")
        .set("name", payload.name)
        .set("contact", payload.contact)
        .set("medical_history", payload.medical_history);
    let rows = bounded(state.store_timeout, update.execute(&state.pool, id)).await?;
    ensure_found(rows, "Patient")
}

/// Appointments and tooth work go with the patient (`ON DELETE CASCADE`).
pub async fn delete_patient(state: &AppState, id: i32) -> AppResult<()> {
    let result = bounded(
        state.store_timeout,
        Patients::delete_by_id(id).exec(&state.orm),
    )
    .await?;
    ensure_found(result.rows_affected, "Patient")
}

fn patient_from_entity(model: PatientModel) -> Patient {
    Patient {
        id: model.id,
        name: model.name,
        contact: model.contact,
        medical_history: model.medical_history,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
