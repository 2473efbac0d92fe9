//! Line items of a purchase order.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine, storefront::StorefrontItem, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub storefront_item_id: Uuid,
    pub name: String,
    pub quantity: i64,
    pub unit_price: MoneyCents,
    pub sessions_per_unit: i64,
    /// `quantity * unit_price`.
    pub subtotal: MoneyCents,
}

impl OrderItem {
    /// Line for `quantity` units of a storefront package.
    pub fn for_package(order_id: Uuid, item: &StorefrontItem, quantity: i64) -> ResultEngine<Self> {
        if quantity < 1 {
            return Err(EngineError::field("quantity", "must be >= 1"));
        }
        let subtotal = item
            .price
            .checked_mul(quantity)
            .ok_or_else(|| EngineError::InvalidAmount("order amount too large".to_string()))?;
        let line = Self {
            id: Uuid::new_v4(),
            order_id,
            storefront_item_id: item.id,
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
            sessions_per_unit: item.sessions,
            subtotal,
        };
        line.sessions()?;
        Ok(line)
    }

    /// Sessions granted by the whole line.
    pub fn sessions(&self) -> ResultEngine<i64> {
        self.quantity
            .checked_mul(self.sessions_per_unit)
            .ok_or_else(|| EngineError::field("quantity", "grants too many sessions"))
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_line_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub order_id: String,
    pub storefront_item_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_minor: i64,
    pub sessions_per_unit: i64,
    pub subtotal_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::orders::Entity",
        from = "Column::OrderId",
        to = "super::orders::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Order,
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Order.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&OrderItem> for ActiveModel {
    fn from(item: &OrderItem) -> Self {
        Self {
            id: ActiveValue::Set(item.id.to_string()),
            order_id: ActiveValue::Set(item.order_id.to_string()),
            storefront_item_id: ActiveValue::Set(item.storefront_item_id.to_string()),
            name: ActiveValue::Set(item.name.clone()),
            quantity: ActiveValue::Set(item.quantity),
            unit_price_minor: ActiveValue::Set(item.unit_price.cents()),
            sessions_per_unit: ActiveValue::Set(item.sessions_per_unit),
            subtotal_minor: ActiveValue::Set(item.subtotal.cents()),
        }
    }
}

impl TryFrom<Model> for OrderItem {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "order item")?,
            order_id: parse_uuid(&model.order_id, "order")?,
            storefront_item_id: parse_uuid(&model.storefront_item_id, "storefront item")?,
            name: model.name,
            quantity: model.quantity,
            unit_price: MoneyCents::new(model.unit_price_minor),
            sessions_per_unit: model.sessions_per_unit,
            subtotal: MoneyCents::new(model.subtotal_minor),
        })
    }
}
