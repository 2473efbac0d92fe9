//! Platform accounts (clients, trainers and admins) and their credit balance.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, Role, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    /// `None` when the stored role is not supported.
    pub role: Option<Role>,
    pub sessions_remaining: i64,
    pub total_sessions_allocated: i64,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(display_name: String, email: String, role: Role) -> Self {
        Self {
            id: Uuid::new_v4(),
            display_name,
            email,
            role: Some(role),
            sessions_remaining: 0,
            total_sessions_allocated: 0,
            created_at: Utc::now(),
        }
    }
}

/// Credit balance snapshot returned after grants and by the balance read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditBalance {
    pub client_id: Uuid,
    pub sessions_remaining: i64,
    pub total_sessions_allocated: i64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub display_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: String,
    pub api_token_hash: Option<String>,
    pub sessions_remaining: i64,
    pub total_sessions_allocated: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn balance(&self) -> Result<CreditBalance, EngineError> {
        Ok(CreditBalance {
            client_id: parse_uuid(&self.id, "account")?,
            sessions_remaining: self.sessions_remaining,
            total_sessions_allocated: self.total_sessions_allocated,
        })
    }
}

impl From<&Account> for ActiveModel {
    fn from(value: &Account) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            display_name: ActiveValue::Set(value.display_name.clone()),
            email: ActiveValue::Set(value.email.clone()),
            role: ActiveValue::Set(value.role.map_or("client", Role::as_str).to_string()),
            api_token_hash: ActiveValue::NotSet,
            sessions_remaining: ActiveValue::Set(value.sessions_remaining),
            total_sessions_allocated: ActiveValue::Set(value.total_sessions_allocated),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "account")?,
            display_name: model.display_name,
            email: model.email,
            role: Role::try_from(model.role.as_str()).ok(),
            sessions_remaining: model.sessions_remaining,
            total_sessions_allocated: model.total_sessions_allocated,
            created_at: model.created_at,
        })
    }
}
