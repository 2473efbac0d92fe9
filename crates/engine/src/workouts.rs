//! Logged workout sessions.
//!
//! `total_sets`, `total_reps` and `total_weight` are derived from the stored
//! rows inside the same transaction that inserted them; they are never taken
//! from the request.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, Weight,
    util::parse_uuid,
    workout_log_rows::WorkoutRow,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Uuid,
    pub client_id: Uuid,
    pub logged_by: Uuid,
    pub title: String,
    pub date: DateTime<Utc>,
    pub duration_minutes: i64,
    pub intensity: i64,
    pub notes: Option<String>,
    pub total_sets: i64,
    pub total_reps: i64,
    /// Volume: sum of `reps * weight` over every row.
    pub total_weight: Weight,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    pub rows: Vec<WorkoutRow>,
}

/// Aggregates computed from a session's rows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorkoutTotals {
    pub sets: i64,
    pub reps: i64,
    pub weight: Weight,
}

impl WorkoutTotals {
    /// Fails with [`EngineError::InvalidAmount`] when a total leaves `i64`.
    pub fn from_rows<'a>(rows: impl IntoIterator<Item = &'a WorkoutRow>) -> ResultEngine<Self> {
        rows.into_iter().try_fold(Self::default(), |acc, row| {
            let too_large = || EngineError::InvalidAmount("workout totals too large".to_string());
            let volume = row
                .reps
                .checked_mul(row.weight.centi())
                .and_then(|v| v.checked_add(acc.weight.centi()))
                .ok_or_else(too_large)?;
            Ok(Self {
                sets: acc.sets.checked_add(1).ok_or_else(too_large)?,
                reps: acc.reps.checked_add(row.reps).ok_or_else(too_large)?,
                weight: Weight::from_centi(volume),
            })
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub logged_by: String,
    pub title: String,
    pub date: DateTimeUtc,
    pub duration_minutes: i64,
    pub intensity: i64,
    pub notes: Option<String>,
    pub total_sets: i64,
    pub total_reps: i64,
    pub total_weight_centi: i64,
    pub created_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workout_log_rows::Entity")]
    Rows,
}

impl Related<super::workout_log_rows::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rows.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Workout> for ActiveModel {
    fn from(workout: &Workout) -> Self {
        Self {
            id: ActiveValue::Set(workout.id.to_string()),
            client_id: ActiveValue::Set(workout.client_id.to_string()),
            logged_by: ActiveValue::Set(workout.logged_by.to_string()),
            title: ActiveValue::Set(workout.title.clone()),
            date: ActiveValue::Set(workout.date),
            duration_minutes: ActiveValue::Set(workout.duration_minutes),
            intensity: ActiveValue::Set(workout.intensity),
            notes: ActiveValue::Set(workout.notes.clone()),
            total_sets: ActiveValue::Set(workout.total_sets),
            total_reps: ActiveValue::Set(workout.total_reps),
            total_weight_centi: ActiveValue::Set(workout.total_weight.centi()),
            created_at: ActiveValue::Set(workout.created_at),
            deleted_at: ActiveValue::Set(workout.deleted_at),
        }
    }
}

impl TryFrom<Model> for Workout {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "workout")?,
            client_id: parse_uuid(&model.client_id, "client")?,
            logged_by: parse_uuid(&model.logged_by, "account")?,
            title: model.title,
            date: model.date,
            duration_minutes: model.duration_minutes,
            intensity: model.intensity,
            notes: model.notes,
            total_sets: model.total_sets,
            total_reps: model.total_reps,
            total_weight: Weight::from_centi(model.total_weight_centi),
            created_at: model.created_at,
            deleted_at: model.deleted_at,
            rows: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(reps: i64, weight: i64) -> WorkoutRow {
        WorkoutRow {
            id: Uuid::new_v4(),
            session_id: Uuid::nil(),
            exercise_id: None,
            exercise_name: "squat".to_string(),
            set_number: 1,
            reps,
            weight: Weight::from_centi(weight * 100),
            pain_level: None,
            body_region: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn totals_sum_volume() {
        let rows: Vec<_> = [10, 8, 6, 10, 8, 6].into_iter().map(|r| row(r, 100)).collect();
        let totals = WorkoutTotals::from_rows(&rows).unwrap();
        assert_eq!(totals.sets, 6);
        assert_eq!(totals.reps, 48);
        assert_eq!(totals.weight.as_units(), 4_800.0);
    }

    #[test]
    fn no_rows_means_zero_totals() {
        assert_eq!(WorkoutTotals::from_rows(&[]).unwrap(), WorkoutTotals::default());
    }

    #[test]
    fn volume_overflow_is_an_error() {
        let rows = [row(100_000_000_000_000_000, 100)];
        assert!(matches!(
            WorkoutTotals::from_rows(&rows),
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
