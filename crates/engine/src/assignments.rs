//! Client to trainer assignments.
//!
//! An assignment is what lets a trainer act on a client's account. At most
//! one `active` row exists per (client, trainer) pair; unassigning flips the
//! row to `inactive` instead of deleting it.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Active,
    Inactive,
}

impl AssignmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl TryFrom<&str> for AssignmentStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(EngineError::InvalidField {
                field: "status".to_string(),
                reason: format!("invalid assignment status: {other}"),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: Uuid,
    pub client_id: Uuid,
    pub trainer_id: Uuid,
    pub status: AssignmentStatus,
    pub assigned_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Assignment {
    pub fn new(client_id: Uuid, trainer_id: Uuid, assigned_by: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            client_id,
            trainer_id,
            status: AssignmentStatus::Active,
            assigned_by,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "client_trainer_assignments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub trainer_id: String,
    pub status: String,
    pub assigned_by: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::accounts::Entity",
        from = "Column::ClientId",
        to = "super::accounts::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Client,
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Assignment> for ActiveModel {
    fn from(value: &Assignment) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            client_id: ActiveValue::Set(value.client_id.to_string()),
            trainer_id: ActiveValue::Set(value.trainer_id.to_string()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            assigned_by: ActiveValue::Set(value.assigned_by.to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl TryFrom<Model> for Assignment {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "assignment")?,
            client_id: parse_uuid(&model.client_id, "client")?,
            trainer_id: parse_uuid(&model.trainer_id, "trainer")?,
            status: AssignmentStatus::try_from(model.status.as_str())?,
            assigned_by: parse_uuid(&model.assigned_by, "account")?,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
