//! The exercise library workouts and plans are matched against.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    BodyRegion, EngineError, ResultEngine,
    util::{normalize_exercise_name, parse_uuid},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub normalized_name: String,
    pub body_region: Option<BodyRegion>,
    pub created_at: DateTime<Utc>,
}

impl Exercise {
    pub fn new(name: &str, body_region: Option<BodyRegion>) -> ResultEngine<Self> {
        let name = name.trim();
        let normalized_name = normalize_exercise_name(name);
        if normalized_name.is_empty() {
            return Err(EngineError::field("name", "must not be empty"));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            normalized_name,
            body_region,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "exercises")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    #[sea_orm(unique)]
    pub normalized_name: String,
    pub body_region: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Exercise> for ActiveModel {
    fn from(value: &Exercise) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            normalized_name: ActiveValue::Set(value.normalized_name.clone()),
            body_region: ActiveValue::Set(value.body_region.map(|r| r.as_str().to_string())),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Exercise {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "exercise")?,
            name: model.name,
            normalized_name: model.normalized_name,
            body_region: model
                .body_region
                .as_deref()
                .and_then(|r| BodyRegion::try_from(r).ok()),
            created_at: model.created_at,
        })
    }
}
