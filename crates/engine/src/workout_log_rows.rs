//! Individual logged sets of a workout session.

use std::fmt;

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Serialize, Serializer};
use serde_json::Value;
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_opt_uuid, parse_uuid},
};

/// Load in hundredths of a unit (`100.5` is stored as `10050`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Weight(i64);

impl Weight {
    pub const ZERO: Weight = Weight(0);

    #[must_use]
    pub const fn from_centi(centi: i64) -> Self {
        Self(centi)
    }

    #[must_use]
    pub const fn centi(self) -> i64 {
        self.0
    }

    /// Reads a non-negative JSON number, rounding to the hundredth.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        if let Some(whole) = value.as_i64() {
            return (whole >= 0).then(|| whole.checked_mul(100).map(Self)).flatten();
        }
        let f = value.as_f64()?;
        if !f.is_finite() || f < 0.0 || f > (i64::MAX / 100) as f64 {
            return None;
        }
        Some(Self((f * 100.0).round() as i64))
    }

    #[must_use]
    pub fn as_units(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Weight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_units())
    }
}

/// Where an exercise is felt. Strict: unknown values are rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyRegion {
    UpperBody,
    LowerBody,
    Core,
    FullBody,
}

impl BodyRegion {
    pub const ALL: [BodyRegion; 4] = [Self::UpperBody, Self::LowerBody, Self::Core, Self::FullBody];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpperBody => "upper_body",
            Self::LowerBody => "lower_body",
            Self::Core => "core",
            Self::FullBody => "full_body",
        }
    }

    pub(crate) fn allowed_list() -> String {
        Self::ALL.map(Self::as_str).join(", ")
    }
}

impl TryFrom<&str> for BodyRegion {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|region| region.as_str() == value)
            .ok_or_else(|| {
                EngineError::field(
                    "bodyRegion",
                    format!("must be one of {}", Self::allowed_list()),
                )
            })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutRow {
    pub id: Uuid,
    pub session_id: Uuid,
    /// Library match, `None` when the name matched nothing.
    pub exercise_id: Option<Uuid>,
    pub exercise_name: String,
    pub set_number: i64,
    pub reps: i64,
    pub weight: Weight,
    pub pain_level: Option<i64>,
    pub body_region: Option<BodyRegion>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "workout_log_rows")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub session_id: String,
    /// Order of the row within its session.
    pub position: i64,
    pub exercise_id: Option<String>,
    pub exercise_name: String,
    pub set_number: i64,
    pub reps: i64,
    pub weight_centi: i64,
    pub pain_level: Option<i64>,
    pub body_region: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workouts::Entity",
        from = "Column::SessionId",
        to = "super::workouts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Session,
}

impl Related<super::workouts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Session.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&WorkoutRow> for ActiveModel {
    fn from(row: &WorkoutRow) -> Self {
        Self {
            id: ActiveValue::Set(row.id.to_string()),
            session_id: ActiveValue::Set(row.session_id.to_string()),
            position: ActiveValue::NotSet,
            exercise_id: ActiveValue::Set(row.exercise_id.map(|id| id.to_string())),
            exercise_name: ActiveValue::Set(row.exercise_name.clone()),
            set_number: ActiveValue::Set(row.set_number),
            reps: ActiveValue::Set(row.reps),
            weight_centi: ActiveValue::Set(row.weight.centi()),
            pain_level: ActiveValue::Set(row.pain_level),
            body_region: ActiveValue::Set(row.body_region.map(|r| r.as_str().to_string())),
            created_at: ActiveValue::Set(row.created_at),
        }
    }
}

impl TryFrom<Model> for WorkoutRow {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "workout row")?,
            session_id: parse_uuid(&model.session_id, "workout")?,
            exercise_id: parse_opt_uuid(model.exercise_id.as_deref(), "exercise")?,
            exercise_name: model.exercise_name,
            set_number: model.set_number,
            reps: model.reps,
            weight: Weight::from_centi(model.weight_centi),
            pain_level: model.pain_level,
            body_region: model
                .body_region
                .as_deref()
                .and_then(|r| BodyRegion::try_from(r).ok()),
            created_at: model.created_at,
        })
    }
}
