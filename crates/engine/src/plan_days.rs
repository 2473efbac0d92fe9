//! Days of a workout plan.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{DayType, EngineError, OptPhase, plan_exercises::PlanExercise, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanDay {
    pub id: Uuid,
    pub plan_id: Uuid,
    pub day_number: i64,
    pub name: String,
    pub focus: Option<String>,
    pub day_type: DayType,
    pub opt_phase: Option<OptPhase>,
    pub estimated_duration: Option<i64>,
    pub exercises: Vec<PlanExercise>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_plan_days")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub plan_id: String,
    pub day_number: i64,
    pub name: String,
    pub focus: Option<String>,
    pub day_type: String,
    pub opt_phase: Option<String>,
    pub estimated_duration: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workout_plans::Entity",
        from = "Column::PlanId",
        to = "super::workout_plans::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Plan,
    #[sea_orm(has_many = "super::plan_exercises::Entity")]
    Exercises,
}

impl Related<super::workout_plans::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plan.def()
    }
}

impl Related<super::plan_exercises::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Exercises.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&PlanDay> for ActiveModel {
    fn from(day: &PlanDay) -> Self {
        Self {
            id: ActiveValue::Set(day.id.to_string()),
            plan_id: ActiveValue::Set(day.plan_id.to_string()),
            day_number: ActiveValue::Set(day.day_number),
            name: ActiveValue::Set(day.name.clone()),
            focus: ActiveValue::Set(day.focus.clone()),
            day_type: ActiveValue::Set(day.day_type.as_str().to_string()),
            opt_phase: ActiveValue::Set(day.opt_phase.map(|p| p.as_str().to_string())),
            estimated_duration: ActiveValue::Set(day.estimated_duration),
        }
    }
}

impl TryFrom<Model> for PlanDay {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "plan day")?,
            plan_id: parse_uuid(&model.plan_id, "workout plan")?,
            day_number: model.day_number,
            name: model.name,
            focus: model.focus,
            day_type: DayType::parse(&model.day_type).unwrap_or_default(),
            opt_phase: model.opt_phase.as_deref().and_then(OptPhase::parse),
            estimated_duration: model.estimated_duration,
            exercises: Vec::new(),
        })
    }
}
