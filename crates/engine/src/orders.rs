//! Purchase orders.
//!
//! An order is created `pending_payment` with every amount already computed.
//! It then moves to `completed` (credits granted) or `cancelled`, and never
//! changes again.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    CommissionSplit, EngineError, LeadSource, MoneyCents, ResultEngine, TaxBreakdown,
    order_items::OrderItem,
    util::{parse_opt_uuid, parse_uuid},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    PendingPayment,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PendingPayment => "pending_payment",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Only pending orders move, and only forward.
    pub fn ensure_transition(self, next: OrderStatus) -> ResultEngine<()> {
        match (self, next) {
            (Self::PendingPayment, Self::Completed | Self::Cancelled) => Ok(()),
            (from, to) => Err(EngineError::Conflict(format!(
                "order is {}, cannot move to {}",
                from.as_str(),
                to.as_str()
            ))),
        }
    }
}

impl TryFrom<&str> for OrderStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending_payment" => Ok(Self::PendingPayment),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::InvalidField {
                field: "status".to_string(),
                reason: format!("invalid order status: {other}"),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub client_id: Uuid,
    pub trainer_id: Option<Uuid>,
    pub status: OrderStatus,
    pub lead_source: LeadSource,
    pub jurisdiction: Option<String>,
    pub absorb_tax: bool,
    /// Pre-tax gross.
    pub subtotal: MoneyCents,
    pub tax: MoneyCents,
    pub tax_rate_bps: i64,
    /// What the client is charged.
    pub total: MoneyCents,
    pub tax_charged_to_client: bool,
    pub business_cut: MoneyCents,
    pub trainer_cut: MoneyCents,
    pub business_rate_bps: i64,
    pub trainer_rate_bps: i64,
    pub loyalty_bump: bool,
    pub sessions_granted: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// The split computed at checkout.
    pub fn split(&self) -> CommissionSplit {
        CommissionSplit {
            business_cut: self.business_cut,
            trainer_cut: self.trainer_cut,
            business_rate_bps: self.business_rate_bps,
            trainer_rate_bps: self.trainer_rate_bps,
            loyalty_bump: self.loyalty_bump,
        }
    }

    /// Tax figures of the order.
    pub fn tax_details(&self) -> TaxBreakdown {
        TaxBreakdown {
            gross_amount: self.subtotal,
            tax_rate_bps: self.tax_rate_bps,
            tax_amount: self.tax,
            net_after_tax: self.total,
            tax_charged_to_client: self.tax_charged_to_client,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase_orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub client_id: String,
    pub trainer_id: Option<String>,
    pub status: String,
    pub lead_source: String,
    pub jurisdiction: Option<String>,
    pub absorb_tax: bool,
    pub subtotal_minor: i64,
    pub tax_minor: i64,
    pub tax_rate_bps: i64,
    pub total_minor: i64,
    pub tax_charged_to_client: bool,
    pub business_cut_minor: i64,
    pub trainer_cut_minor: i64,
    pub business_rate_bps: i64,
    pub trainer_rate_bps: i64,
    pub loyalty_bump: bool,
    pub sessions_granted: i64,
    pub created_by: String,
    pub created_at: DateTimeUtc,
    pub completed_at: Option<DateTimeUtc>,
    pub cancelled_at: Option<DateTimeUtc>,
    pub payment_reference: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    Items,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Order> for ActiveModel {
    fn from(order: &Order) -> Self {
        Self {
            id: ActiveValue::Set(order.id.to_string()),
            client_id: ActiveValue::Set(order.client_id.to_string()),
            trainer_id: ActiveValue::Set(order.trainer_id.map(|id| id.to_string())),
            status: ActiveValue::Set(order.status.as_str().to_string()),
            lead_source: ActiveValue::Set(order.lead_source.as_str().to_string()),
            jurisdiction: ActiveValue::Set(order.jurisdiction.clone()),
            absorb_tax: ActiveValue::Set(order.absorb_tax),
            subtotal_minor: ActiveValue::Set(order.subtotal.cents()),
            tax_minor: ActiveValue::Set(order.tax.cents()),
            tax_rate_bps: ActiveValue::Set(order.tax_rate_bps),
            total_minor: ActiveValue::Set(order.total.cents()),
            tax_charged_to_client: ActiveValue::Set(order.tax_charged_to_client),
            business_cut_minor: ActiveValue::Set(order.business_cut.cents()),
            trainer_cut_minor: ActiveValue::Set(order.trainer_cut.cents()),
            business_rate_bps: ActiveValue::Set(order.business_rate_bps),
            trainer_rate_bps: ActiveValue::Set(order.trainer_rate_bps),
            loyalty_bump: ActiveValue::Set(order.loyalty_bump),
            sessions_granted: ActiveValue::Set(order.sessions_granted),
            created_by: ActiveValue::Set(order.created_by.to_string()),
            created_at: ActiveValue::Set(order.created_at),
            completed_at: ActiveValue::Set(order.completed_at),
            cancelled_at: ActiveValue::Set(order.cancelled_at),
            payment_reference: ActiveValue::Set(order.payment_reference.clone()),
        }
    }
}

impl TryFrom<Model> for Order {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "order")?,
            client_id: parse_uuid(&model.client_id, "client")?,
            trainer_id: parse_opt_uuid(model.trainer_id.as_deref(), "trainer")?,
            status: OrderStatus::try_from(model.status.as_str())?,
            lead_source: LeadSource::try_from(model.lead_source.as_str())?,
            jurisdiction: model.jurisdiction,
            absorb_tax: model.absorb_tax,
            subtotal: MoneyCents::new(model.subtotal_minor),
            tax: MoneyCents::new(model.tax_minor),
            tax_rate_bps: model.tax_rate_bps,
            total: MoneyCents::new(model.total_minor),
            tax_charged_to_client: model.tax_charged_to_client,
            business_cut: MoneyCents::new(model.business_cut_minor),
            trainer_cut: MoneyCents::new(model.trainer_cut_minor),
            business_rate_bps: model.business_rate_bps,
            trainer_rate_bps: model.trainer_rate_bps,
            loyalty_bump: model.loyalty_bump,
            sessions_granted: model.sessions_granted,
            created_by: parse_uuid(&model.created_by, "account")?,
            created_at: model.created_at,
            completed_at: model.completed_at,
            cancelled_at: model.cancelled_at,
            payment_reference: model.payment_reference,
            items: Vec::new(),
        })
    }
}
