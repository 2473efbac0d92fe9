//! Scheduled training appointments. Each completed one consumes a credit.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EngineError,
    util::{parse_opt_uuid, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl TryFrom<&str> for SessionStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidField {
                field: "status".to_string(),
                reason: format!("invalid session status: {other}"),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingSession {
    pub id: Uuid,
    pub client_id: Uuid,
    pub trainer_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub status: SessionStatus,
    pub deducted: bool,
    pub deducted_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TrainingSession {
    pub fn scheduled(
        client_id: Uuid,
        trainer_id: Option<Uuid>,
        scheduled_at: DateTime<Utc>,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            client_id,
            trainer_id,
            scheduled_at,
            status: SessionStatus::Scheduled,
            deducted: false,
            deducted_at: None,
            notes,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "training_sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub trainer_id: Option<String>,
    pub scheduled_at: DateTimeUtc,
    pub status: String,
    pub deducted: bool,
    pub deducted_at: Option<DateTimeUtc>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TrainingSession> for ActiveModel {
    fn from(session: &TrainingSession) -> Self {
        Self {
            id: ActiveValue::Set(session.id.to_string()),
            client_id: ActiveValue::Set(session.client_id.to_string()),
            trainer_id: ActiveValue::Set(session.trainer_id.map(|id| id.to_string())),
            scheduled_at: ActiveValue::Set(session.scheduled_at),
            status: ActiveValue::Set(session.status.as_str().to_string()),
            deducted: ActiveValue::Set(session.deducted),
            deducted_at: ActiveValue::Set(session.deducted_at),
            notes: ActiveValue::Set(session.notes.clone()),
            created_at: ActiveValue::Set(session.created_at),
        }
    }
}

impl TryFrom<Model> for TrainingSession {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "training session")?,
            client_id: parse_uuid(&model.client_id, "client")?,
            trainer_id: parse_opt_uuid(model.trainer_id.as_deref(), "trainer")?,
            scheduled_at: model.scheduled_at,
            status: SessionStatus::try_from(model.status.as_str())?,
            deducted: model.deducted,
            deducted_at: model.deducted_at,
            notes: model.notes,
            created_at: model.created_at,
        })
    }
}
