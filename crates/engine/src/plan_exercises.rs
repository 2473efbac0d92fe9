//! Exercises scheduled on a plan day. Every row references the library.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanExercise {
    pub id: Uuid,
    pub day_id: Uuid,
    pub exercise_id: Uuid,
    pub order_in_workout: i64,
    pub set_scheme: Option<String>,
    pub rep_goal: Option<String>,
    pub rest_period: Option<i64>,
    pub tempo: Option<String>,
    pub intensity_guideline: Option<String>,
    pub notes: Option<String>,
    pub is_optional: bool,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_plan_exercises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub day_id: String,
    pub exercise_id: String,
    pub order_in_workout: i64,
    pub set_scheme: Option<String>,
    pub rep_goal: Option<String>,
    pub rest_period: Option<i64>,
    pub tempo: Option<String>,
    pub intensity_guideline: Option<String>,
    pub notes: Option<String>,
    pub is_optional: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plan_days::Entity",
        from = "Column::DayId",
        to = "super::plan_days::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Day,
}

impl Related<super::plan_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Day.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PlanExercise> for ActiveModel {
    fn from(ex: &PlanExercise) -> Self {
        Self {
            id: ActiveValue::Set(ex.id.to_string()),
            day_id: ActiveValue::Set(ex.day_id.to_string()),
            exercise_id: ActiveValue::Set(ex.exercise_id.to_string()),
            order_in_workout: ActiveValue::Set(ex.order_in_workout),
            set_scheme: ActiveValue::Set(ex.set_scheme.clone()),
            rep_goal: ActiveValue::Set(ex.rep_goal.clone()),
            rest_period: ActiveValue::Set(ex.rest_period),
            tempo: ActiveValue::Set(ex.tempo.clone()),
            intensity_guideline: ActiveValue::Set(ex.intensity_guideline.clone()),
            notes: ActiveValue::Set(ex.notes.clone()),
            is_optional: ActiveValue::Set(ex.is_optional),
        }
    }
}

impl TryFrom<Model> for PlanExercise {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "plan exercise")?,
            day_id: parse_uuid(&model.day_id, "plan day")?,
            exercise_id: parse_uuid(&model.exercise_id, "exercise")?,
            order_in_workout: model.order_in_workout,
            set_scheme: model.set_scheme,
            rep_goal: model.rep_goal,
            rest_period: model.rest_period,
            tempo: model.tempo,
            intensity_guideline: model.intensity_guideline,
            notes: model.notes,
            is_optional: model.is_optional,
        })
    }
}
