use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, sea_query::OnConflict};

use crate::{
    db::bounded,
    dto::teeth::ToothWorkChanges,
    entity::{
        TeethWork,
        teeth_work::{ActiveModel, Column, Model as ToothWorkModel},
    },
    error::AppResult,
    models::ToothWork,
    services::missing_patient,
    state::AppState,
};

/// Insert or overwrite the record for one tooth. Repeating the call leaves a
/// single row holding the latest values.
pub async fn upsert_tooth_work(
    state: &AppState,
    patient_id: i32,
    tooth_number: i32,
    changes: ToothWorkChanges,
) -> AppResult<()> {
    let active = ActiveModel {
        patient_id: Set(patient_id),
        tooth_number: Set(tooth_number),
        status: Set(changes.status),
        notes: Set(changes.notes),
        updated_at: Set(Utc::now().into()),
    };
    let upsert = TeethWork::insert(active)
        .on_conflict(
            OnConflict::columns([Column::PatientId, Column::ToothNumber])
                .update_columns([Column::Status, Column::Notes, Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(&state.orm);
    bounded(state.store_timeout, upsert)
        .await
        .map_err(missing_patient)?;

    tracing::info!(patient_id, tooth_number, "tooth work recorded");
    Ok(())
}

pub async fn list_tooth_work(state: &AppState, patient_id: i32) -> AppResult<Vec<ToothWork>> {
    let rows = bounded(
        state.store_timeout,
        TeethWork::find()
            .filter(Column::PatientId.eq(patient_id))
            .order_by_asc(Column::ToothNumber)
            .all(&state.orm),
    )
    .await?;
    Ok(rows.into_iter().map(tooth_work_from_entity).collect())
}

fn tooth_work_from_entity(model: ToothWorkModel) -> ToothWork {
    ToothWork {
        patient_id: model.patient_id,
        tooth_number: model.tooth_number,
        status: model.status,
        notes: model.notes,
        updated_at: model.updated_at.with_timezone(&Utc),
    }
}
