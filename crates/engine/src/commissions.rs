//! Commission records, one per order with an attributed trainer.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    CommissionSplit, EngineError, LeadSource, MoneyCents, TaxBreakdown, util::parse_uuid,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionRecord {
    pub id: Uuid,
    pub order_id: Uuid,
    pub trainer_id: Uuid,
    pub lead_source: LeadSource,
    pub gross_amount: MoneyCents,
    pub tax_amount: MoneyCents,
    pub net_after_tax: MoneyCents,
    pub business_cut: MoneyCents,
    pub trainer_cut: MoneyCents,
    pub business_rate_bps: i64,
    pub trainer_rate_bps: i64,
    pub is_loyalty_bump: bool,
    pub sessions_granted: i64,
    pub created_at: DateTime<Utc>,
}

impl CommissionRecord {
    pub fn new(
        order_id: Uuid,
        trainer_id: Uuid,
        lead_source: LeadSource,
        split: &CommissionSplit,
        tax: &TaxBreakdown,
        sessions_granted: i64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            trainer_id,
            lead_source,
            gross_amount: tax.gross_amount,
            tax_amount: tax.tax_amount,
            net_after_tax: tax.net_after_tax,
            business_cut: split.business_cut,
            trainer_cut: split.trainer_cut,
            business_rate_bps: split.business_rate_bps,
            trainer_rate_bps: split.trainer_rate_bps,
            is_loyalty_bump: split.loyalty_bump,
            sessions_granted,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "commission_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub order_id: String,
    pub trainer_id: String,
    pub lead_source: String,
    pub gross_minor: i64,
    pub tax_minor: i64,
    pub net_after_tax_minor: i64,
    pub business_cut_minor: i64,
    pub trainer_cut_minor: i64,
    pub business_rate_bps: i64,
    pub trainer_rate_bps: i64,
    pub is_loyalty_bump: bool,
    pub sessions_granted: i64,
    pub created_at: DateTimeUtc,
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

impl ActiveModelBehavior for ActiveModel {}

impl From<&CommissionRecord> for ActiveModel {
    fn from(record: &CommissionRecord) -> Self {
        Self {
            id: ActiveValue::Set(record.id.to_string()),
            order_id: ActiveValue::Set(record.order_id.to_string()),
            trainer_id: ActiveValue::Set(record.trainer_id.to_string()),
            lead_source: ActiveValue::Set(record.lead_source.as_str().to_string()),
            gross_minor: ActiveValue::Set(record.gross_amount.cents()),
            tax_minor: ActiveValue::Set(record.tax_amount.cents()),
            net_after_tax_minor: ActiveValue::Set(record.net_after_tax.cents()),
            business_cut_minor: ActiveValue::Set(record.business_cut.cents()),
            trainer_cut_minor: ActiveValue::Set(record.trainer_cut.cents()),
            business_rate_bps: ActiveValue::Set(record.business_rate_bps),
            trainer_rate_bps: ActiveValue::Set(record.trainer_rate_bps),
            is_loyalty_bump: ActiveValue::Set(record.is_loyalty_bump),
            sessions_granted: ActiveValue::Set(record.sessions_granted),
            created_at: ActiveValue::Set(record.created_at),
        }
    }
}

impl TryFrom<Model> for CommissionRecord {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "commission")?,
            order_id: parse_uuid(&model.order_id, "order")?,
            trainer_id: parse_uuid(&model.trainer_id, "trainer")?,
            lead_source: LeadSource::try_from(model.lead_source.as_str())?,
            gross_amount: MoneyCents::new(model.gross_minor),
            tax_amount: MoneyCents::new(model.tax_minor),
            net_after_tax: MoneyCents::new(model.net_after_tax_minor),
            business_cut: MoneyCents::new(model.business_cut_minor),
            trainer_cut: MoneyCents::new(model.trainer_cut_minor),
            business_rate_bps: model.business_rate_bps,
            trainer_rate_bps: model.trainer_rate_bps,
            is_loyalty_bump: model.is_loyalty_bump,
            sessions_granted: model.sessions_granted,
            created_at: model.created_at,
        })
    }
}
