//! Persisted workout plans.
//!
//! Plans arrive as loosely typed generator output. Their enumerations are
//! lenient: [`DayType`] and [`OptPhase`] never reject a value, they fall back
//! to `training` and `None`.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{EngineError, plan_days::PlanDay, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayType {
    #[default]
    Training,
    ActiveRecovery,
    Rest,
    Assessment,
    Specialization,
}

impl DayType {
    pub const ALL: [DayType; 5] = [
        Self::Training,
        Self::ActiveRecovery,
        Self::Rest,
        Self::Assessment,
        Self::Specialization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Training => "training",
            Self::ActiveRecovery => "active_recovery",
            Self::Rest => "rest",
            Self::Assessment => "assessment",
            Self::Specialization => "specialization",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == value)
    }

    /// Unknown or missing values become [`DayType::Training`].
    pub fn normalize(value: Option<&Value>) -> Self {
        value
            .and_then(Value::as_str)
            .and_then(Self::parse)
            .unwrap_or_default()
    }
}

/// Training phase of a plan day, numbered 1 to 5.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptPhase {
    StabilizationEndurance,
    StrengthEndurance,
    Hypertrophy,
    MaximalStrength,
    Power,
}

impl OptPhase {
    pub const ALL: [OptPhase; 5] = [
        Self::StabilizationEndurance,
        Self::StrengthEndurance,
        Self::Hypertrophy,
        Self::MaximalStrength,
        Self::Power,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::StabilizationEndurance => "stabilization_endurance",
            Self::StrengthEndurance => "strength_endurance",
            Self::Hypertrophy => "hypertrophy",
            Self::MaximalStrength => "maximal_strength",
            Self::Power => "power",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }

    pub fn from_number(phase: i64) -> Option<Self> {
        usize::try_from(phase)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Accepts a phase key, a phase number or `{"phase": n}`; anything else
    /// is `None`.
    pub fn normalize(value: Option<&Value>) -> Option<Self> {
        match value? {
            Value::String(s) => Self::parse(s),
            Value::Number(n) => n.as_i64().and_then(Self::from_number),
            Value::Object(obj) => obj
                .get("phase")
                .and_then(Value::as_i64)
                .and_then(Self::from_number),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutPlan {
    pub id: Uuid,
    pub client_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub summary: String,
    pub duration_weeks: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub days: Vec<PlanDay>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_plans")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub created_by: String,
    pub title: String,
    pub summary: String,
    pub duration_weeks: i64,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::plan_days::Entity")]
    Days,
}

impl Related<super::plan_days::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Days.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WorkoutPlan> for ActiveModel {
    fn from(plan: &WorkoutPlan) -> Self {
        Self {
            id: ActiveValue::Set(plan.id.to_string()),
            client_id: ActiveValue::Set(plan.client_id.to_string()),
            created_by: ActiveValue::Set(plan.created_by.to_string()),
            title: ActiveValue::Set(plan.title.clone()),
            summary: ActiveValue::Set(plan.summary.clone()),
            duration_weeks: ActiveValue::Set(plan.duration_weeks),
            status: ActiveValue::Set(plan.status.clone()),
            created_at: ActiveValue::Set(plan.created_at),
        }
    }
}

impl TryFrom<Model> for WorkoutPlan {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "workout plan")?,
            client_id: parse_uuid(&model.client_id, "client")?,
            created_by: parse_uuid(&model.created_by, "account")?,
            title: model.title,
            summary: model.summary,
            duration_weeks: model.duration_weeks,
            status: model.status,
            created_at: model.created_at,
            days: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn day_type_defaults_to_training() {
        assert_eq!(DayType::normalize(None), DayType::Training);
        assert_eq!(DayType::normalize(Some(&json!(3))), DayType::Training);
        assert_eq!(DayType::normalize(Some(&json!("rest"))), DayType::Rest);
    }

    #[test]
    fn opt_phase_accepts_numbers_and_objects() {
        assert_eq!(OptPhase::normalize(Some(&json!(1))), Some(OptPhase::StabilizationEndurance));
        assert_eq!(OptPhase::normalize(Some(&json!({"phase": 5}))), Some(OptPhase::Power));
        assert_eq!(OptPhase::normalize(Some(&json!(6))), None);
        assert_eq!(OptPhase::normalize(Some(&json!(0))), None);
        assert_eq!(OptPhase::normalize(Some(&json!("power"))), Some(OptPhase::Power));
    }
}
