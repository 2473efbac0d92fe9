//! Session packages sold in the storefront.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontItem {
    pub id: Uuid,
    pub name: String,
    /// Sessions granted per unit sold.
    pub sessions: i64,
    /// Price of one unit.
    pub price: MoneyCents,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl StorefrontItem {
    pub fn new(name: &str, sessions: i64, price: MoneyCents) -> ResultEngine<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(EngineError::field("name", "must not be empty"));
        }
        if sessions <= 0 {
            return Err(EngineError::field("sessions", "must be > 0"));
        }
        if price.cents() <= 0 {
            return Err(EngineError::InvalidAmount("price must be > 0".to_string()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            sessions,
            price,
            active: true,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "storefront_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub sessions: i64,
    pub price_minor: i64,
    pub active: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&StorefrontItem> for ActiveModel {
    fn from(value: &StorefrontItem) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            sessions: ActiveValue::Set(value.sessions),
            price_minor: ActiveValue::Set(value.price.cents()),
            active: ActiveValue::Set(value.active),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}

impl TryFrom<Model> for StorefrontItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "storefront item")?,
            name: model.name,
            sessions: model.sessions,
            price: MoneyCents::new(model.price_minor),
            active: model.active,
            created_at: model.created_at,
        })
    }
}
