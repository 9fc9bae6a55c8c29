use chrono::{Days, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::{
    db::{bounded, update::PartialUpdate},
    dto::appointments::{AppointmentChanges, NewAppointment},
    entity::{
        Appointments,
        appointments::{ActiveModel, Column, Model as AppointmentModel},
    },
    error::{AppError, AppResult},
    models::Appointment,
    services::{ensure_found, missing_patient},
    state::AppState,
};

pub async fn create_appointment(
    state: &AppState,
    payload: NewAppointment,
) -> AppResult<Appointment> {
    let active = ActiveModel {
        id: NotSet,
        patient_id: Set(payload.patient_id),
        date: Set(payload.date.into()),
        description: Set(payload.description),
    };
    let appointment = bounded(state.store_timeout, active.insert(&state.orm))
        .await
        .map_err(missing_patient)?;
    tracing::info!(
        appointment_id = appointment.id,
        patient_id = appointment.patient_id,
        "appointment created"
    );
    Ok(appointment_from_entity(appointment))
}

/// All appointments ordered by date, or only those falling on `day` (UTC).
pub async fn list_appointments(
    state: &AppState,
    day: Option<NaiveDate>,
) -> AppResult<Vec<Appointment>> {
    let mut condition = Condition::all();
    if let Some(day) = day {
        let start = day
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid day {day}")))?
            .and_utc();
        let end = start
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("day {day} out of range")))?;
        condition = condition
            .add(Column::Date.gte(start))
            .add(Column::Date.lt(end));
    }

    let appointments = bounded(
        state.store_timeout,
        Appointments::find()
            .filter(condition)
            .order_by_asc(Column::Date)
            .order_by_asc(Column::Id)
            .all(&state.orm),
    )
    .await?;
    Ok(appointments
        .into_iter()
        .map(appointment_from_entity)
        .collect())
}

pub async fn list_patient_appointments(
    state: &AppState,
    patient_id: i32,
) -> AppResult<Vec<Appointment>> {
    let appointments = bounded(
        state.store_timeout,
        Appointments::find()
            .filter(Column::PatientId.eq(patient_id))
            .order_by_asc(Column::Date)
            .all(&state.orm),
    )
    .await?;
    Ok(appointments
        .into_iter()
        .map(appointment_from_entity)
        .collect())
}

pub async fn update_appointment(
    state: &AppState,
    id: i32,
    changes: AppointmentChanges,
) -> AppResult<()> {
    let update = PartialUpdate::table("appointments")
        .set("date", changes.date)
        .set("description", changes.description);
    let rows = bounded(state.store_timeout, update.execute(&state.pool, id)).await?;
    ensure_found(rows, "Appointment")
}

pub async fn delete_appointment(state: &AppState, id: i32) -> AppResult<()> {
    let result = bounded(
        state.store_timeout,
        Appointments::delete_by_id(id).exec(&state.orm),
    )
    .await?;
    ensure_found(result.rows_affected, "Appointment")
}

fn appointment_from_entity(model: AppointmentModel) -> Appointment {
    Appointment {
        id: model.id,
        patient_id: model.patient_id,
        date: model.date.with_timezone(&Utc),
        description: model.description,
    }
}
